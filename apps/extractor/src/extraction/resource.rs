//! The async resource slot: idle / pending / ready / failed.

use serde::Serialize;

use crate::extraction::error::ExtractionError;

/// Outcome of one finished computation. Ready and failed are exclusive by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Settled<T> {
    Ready(T),
    Failed(ExtractionError),
}

impl<T> From<Result<T, ExtractionError>> for Settled<T> {
    fn from(outcome: Result<T, ExtractionError>) -> Self {
        match outcome {
            Ok(value) => Settled::Ready(value),
            Err(error) => Settled::Failed(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum AsyncResource<T> {
    /// Never fetched.
    Idle,
    /// A computation is in flight. `previous` is the last settled outcome, kept
    /// so a view may show it while revalidating.
    Pending { previous: Option<Settled<T>> },
    Ready(T),
    Failed(ExtractionError),
}

/// What the rendering surface should show. Exactly one applies to any resource.
#[derive(Debug, PartialEq)]
pub enum ResourceView<'a, T> {
    Loading,
    Error(&'a str),
    NoData,
    Value(&'a T),
}

impl<T> Default for AsyncResource<T> {
    fn default() -> Self {
        AsyncResource::Idle
    }
}

impl<T> AsyncResource<T> {
    /// Moves to `Pending`, carrying over whatever had settled before.
    /// Restarting while already pending keeps the older settled value.
    pub fn begin(self) -> Self {
        let previous = match self {
            AsyncResource::Idle => None,
            AsyncResource::Pending { previous } => previous,
            AsyncResource::Ready(value) => Some(Settled::Ready(value)),
            AsyncResource::Failed(error) => Some(Settled::Failed(error)),
        };
        AsyncResource::Pending { previous }
    }

    pub fn settle(outcome: Settled<T>) -> Self {
        match outcome {
            Settled::Ready(value) => AsyncResource::Ready(value),
            Settled::Failed(error) => AsyncResource::Failed(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncResource::Pending { .. })
    }

    /// True while a new computation runs and an older outcome is still around.
    pub fn is_stale(&self) -> bool {
        matches!(self, AsyncResource::Pending { previous: Some(_) })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            AsyncResource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ExtractionError> {
        match self {
            AsyncResource::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// The freshest value available, including a stale one behind `Pending`.
    pub fn latest_value(&self) -> Option<&T> {
        match self {
            AsyncResource::Pending {
                previous: Some(Settled::Ready(value)),
            } => Some(value),
            resource => resource.value(),
        }
    }

    pub fn view(&self) -> ResourceView<'_, T> {
        match self {
            AsyncResource::Idle => ResourceView::NoData,
            AsyncResource::Pending { .. } => ResourceView::Loading,
            AsyncResource::Ready(value) => ResourceView::Value(value),
            AsyncResource::Failed(error) => ResourceView::Error(error.message()),
        }
    }
}

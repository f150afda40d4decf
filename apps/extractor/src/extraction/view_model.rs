//! Extraction View Model — owns the input text, the trigger mode and the
//! resource slot, and reconciles extraction outcomes into that slot.
//!
//! The model runs as a single task that owns its state and processes
//! commands sequentially from a channel, so the state needs no locks.
//! `ViewModelHandle` is the cloneable client; readers get snapshots from a
//! `watch` channel without a round trip.
//!
//! Last trigger wins: every refetch gets a new generation number and only a
//! completion carrying the latest generation may commit. Superseded calls are
//! not cancelled; they run to completion and their results are dropped.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::extraction::gateway::ResumeExtractionGateway;
use crate::extraction::observer::{ExtractionEvent, ExtractionObserver};
use crate::extraction::resource::{AsyncResource, Settled};
use crate::models::resume::Resume;

/// Text the page starts with.
pub const SAMPLE_RESUME_TEXT: &str = "
      Vaibhav Gupta
      vbv@boundaryml.com

      Experience:
      - Founder at BoundaryML
      - CV Engineer at Google
      - CV Engineer at Microsoft

      Skills:
      - Rust
      - C++
    ";

const COMMAND_BUFFER: usize = 32;

/// Where the last refetch came from. Display only: both take the same call path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    #[default]
    ServerInitiated,
    ClientInitiated,
}

impl FetchMode {
    pub fn label(self) -> &'static str {
        match self {
            FetchMode::ServerInitiated => "Server-side",
            FetchMode::ClientInitiated => "Client-side",
        }
    }
}

/// Whether the model fetches once on its own at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitialLoad {
    /// Stay idle until the first explicit refetch.
    #[default]
    Deferred,
    /// Start a server-initiated refetch of the initial text as soon as the model runs.
    Immediate,
}

impl FromStr for InitialLoad {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deferred" => Ok(InitialLoad::Deferred),
            "immediate" => Ok(InitialLoad::Immediate),
            other => Err(format!(
                "unknown initial load policy '{other}' (expected 'deferred' or 'immediate')"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewModelOptions {
    pub initial_text: String,
    pub initial_load: InitialLoad,
}

impl Default for ViewModelOptions {
    fn default() -> Self {
        Self {
            initial_text: SAMPLE_RESUME_TEXT.to_string(),
            initial_load: InitialLoad::Deferred,
        }
    }
}

/// Everything the rendering surface needs, as of one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub input_text: String,
    pub fetch_mode: FetchMode,
    /// Generation of the most recent refetch; 0 before the first one.
    pub generation: u64,
    pub resource: AsyncResource<Resume>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ViewModelError {
    #[error("View model is not running")]
    Closed,

    #[error("View model dropped the request")]
    Dropped,
}

#[derive(Debug)]
enum Command {
    SetInputText {
        text: String,
        respond_to: oneshot::Sender<Snapshot>,
    },
    Refetch {
        mode: FetchMode,
        respond_to: oneshot::Sender<Snapshot>,
    },
}

#[derive(Debug)]
struct Completion {
    generation: u64,
    outcome: Settled<Resume>,
}

pub struct ExtractionViewModel {
    commands: mpsc::Receiver<Command>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<Snapshot>,
    gateway: ResumeExtractionGateway,
    observer: Arc<dyn ExtractionObserver>,
    initial_load: InitialLoad,
    input_text: String,
    fetch_mode: FetchMode,
    generation: u64,
    resource: AsyncResource<Resume>,
    status: String,
}

impl ExtractionViewModel {
    /// Creates the model and its handle. The model does nothing until `run` is polled.
    pub fn new(
        gateway: ResumeExtractionGateway,
        observer: Arc<dyn ExtractionObserver>,
        options: ViewModelOptions,
    ) -> (Self, ViewModelHandle) {
        let (sender, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions) = mpsc::unbounded_channel();

        let fetch_mode = FetchMode::default();
        let status = "No extraction requested yet".to_string();
        let (snapshots, receiver) = watch::channel(Snapshot {
            input_text: options.initial_text.clone(),
            fetch_mode,
            generation: 0,
            resource: AsyncResource::Idle,
            status: status.clone(),
            updated_at: Utc::now(),
        });

        let model = Self {
            commands,
            completions_tx,
            completions,
            snapshots,
            gateway,
            observer,
            initial_load: options.initial_load,
            input_text: options.initial_text,
            fetch_mode,
            generation: 0,
            resource: AsyncResource::Idle,
            status,
        };
        let handle = ViewModelHandle {
            sender,
            snapshots: receiver,
        };
        (model, handle)
    }

    /// Convenience for `new` followed by spawning `run` on the current runtime.
    pub fn spawn(
        gateway: ResumeExtractionGateway,
        observer: Arc<dyn ExtractionObserver>,
        options: ViewModelOptions,
    ) -> ViewModelHandle {
        let (model, handle) = Self::new(gateway, observer, options);
        tokio::spawn(model.run());
        handle
    }

    /// Processes commands and completions until every handle is dropped.
    pub async fn run(mut self) {
        info!(initial_load = ?self.initial_load, "View model started");

        if self.initial_load == InitialLoad::Immediate {
            self.start_refetch(FetchMode::ServerInitiated);
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
            }
        }

        info!(generation = self.generation, "View model stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetInputText { text, respond_to } => {
                self.observer.record(ExtractionEvent::InputChanged {
                    text_len: text.len(),
                });
                self.input_text = text;
                let _ = respond_to.send(self.publish());
            }
            Command::Refetch { mode, respond_to } => {
                let snapshot = self.start_refetch(mode);
                let _ = respond_to.send(snapshot);
            }
        }
    }

    fn start_refetch(&mut self, mode: FetchMode) -> Snapshot {
        self.generation += 1;
        self.fetch_mode = mode;
        self.resource = std::mem::take(&mut self.resource).begin();
        self.status = format!("Extracting... ({})", mode.label().to_lowercase());
        self.observer.record(ExtractionEvent::RefetchStarted {
            generation: self.generation,
            mode,
        });

        let generation = self.generation;
        let text = self.input_text.clone();
        let gateway = self.gateway.clone();
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.extract_resume(&text).await;
            // The model may have stopped meanwhile; nothing left to update then.
            let _ = completions.send(Completion {
                generation,
                outcome: outcome.into(),
            });
        });

        self.publish()
    }

    fn handle_completion(&mut self, completion: Completion) {
        if completion.generation != self.generation {
            debug!(
                generation = completion.generation,
                latest = self.generation,
                "Ignoring superseded completion"
            );
            self.observer.record(ExtractionEvent::Discarded {
                generation: completion.generation,
                latest: self.generation,
            });
            return;
        }

        let mode = self.fetch_mode.label().to_lowercase();
        let ready = matches!(completion.outcome, Settled::Ready(_));
        self.status = match &completion.outcome {
            Settled::Ready(_) => format!("Extraction succeeded ({mode})"),
            Settled::Failed(error) => format!("Extraction error: {error} ({mode})"),
        };
        self.resource = AsyncResource::settle(completion.outcome);
        self.observer.record(ExtractionEvent::Committed {
            generation: completion.generation,
            ready,
        });
        self.publish();
    }

    fn publish(&self) -> Snapshot {
        let snapshot = Snapshot {
            input_text: self.input_text.clone(),
            fetch_mode: self.fetch_mode,
            generation: self.generation,
            resource: self.resource.clone(),
            status: self.status.clone(),
            updated_at: Utc::now(),
        };
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}

/// Cloneable handle to a running `ExtractionViewModel`.
#[derive(Clone)]
pub struct ViewModelHandle {
    sender: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl ViewModelHandle {
    /// Updates the input text. Does not start an extraction.
    pub async fn set_input_text(&self, text: impl Into<String>) -> Result<Snapshot, ViewModelError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Command::SetInputText {
                text: text.into(),
                respond_to,
            })
            .await
            .map_err(|_| ViewModelError::Closed)?;
        response.await.map_err(|_| ViewModelError::Dropped)
    }

    /// Records `mode` and starts a new extraction of the current input text.
    /// Returns the snapshot taken right after the resource went `Pending`.
    pub async fn refetch(&self, mode: FetchMode) -> Result<Snapshot, ViewModelError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Command::Refetch { mode, respond_to })
            .await
            .map_err(|_| ViewModelError::Closed)?;
        response.await.map_err(|_| ViewModelError::Dropped)
    }

    /// The resource slot as last published by the model.
    pub fn current_resource(&self) -> AsyncResource<Resume> {
        self.snapshots.borrow().resource.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Resolves with the first snapshot whose resource is not pending.
    pub async fn settled(&self) -> Result<Snapshot, ViewModelError> {
        let mut receiver = self.subscribe();
        let snapshot = receiver
            .wait_for(|snapshot| !snapshot.resource.is_loading())
            .await
            .map_err(|_| ViewModelError::Closed)?;
        Ok(snapshot.clone())
    }
}

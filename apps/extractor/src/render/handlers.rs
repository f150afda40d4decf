//! Axum route handlers for the server-rendered page.

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::view_model::FetchMode;
use crate::render::render_page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefetchForm {
    pub mode: FetchMode,
    pub text: Option<String>,
}

/// GET /
pub async fn handle_page(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.view_model.snapshot()))
}

/// POST /refetch
///
/// Form post from the page: applies the edited text, starts a refetch and
/// sends the browser back to the page, which polls while loading.
pub async fn handle_refetch_form(
    State(state): State<AppState>,
    Form(form): Form<RefetchForm>,
) -> Result<Redirect, AppError> {
    if let Some(text) = form.text {
        if text != state.view_model.snapshot().input_text {
            state.view_model.set_input_text(text).await?;
        }
    }
    state.view_model.refetch(form.mode).await?;
    Ok(Redirect::to("/"))
}

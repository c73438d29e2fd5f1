// POST /gpt/chat: forwards one message to Gemini and returns the first answer.

use crate::{
    error::RelayError,
    gemini::{ChatRequest, ChatResult},
    server::AppState,
};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResult>, RelayError> {
    // Bodies that are not a JSON object are client errors, same as an empty message.
    let Json(request) = payload.map_err(|rejection| {
        info!("Rejecting chat request body: {rejection}");
        RelayError::InvalidInput(rejection.body_text())
    })?;

    let result = state.gemini.relay(request.message.as_deref()).await?;
    Ok(Json(result))
}

//! Chat endpoint

use axum::{Extension, Json, extract::State};
use medassist_core::{ChatRequest, ChatResponse};

use crate::AppState;
use crate::error::AppError;
use crate::middleware::RequestId;

/// POST /chat - Reply to a patient message
///
/// Runs the Gemini tool-calling loop against the hospital API and returns
/// the assistant's answer. Recent turns are kept per conversation id.
pub async fn chat(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let service = state.chat.ok_or_else(|| {
        AppError::ServiceUnavailable(
            "Missing GOOGLE_API_KEY environment variable. Set it before starting the application."
                .to_string(),
        )
    })?;

    tracing::info!(
        request_id = %request_id,
        conversation_id = body.conversation_id.as_deref().unwrap_or("-"),
        history_len = body.history.len(),
        message_len = body.user_message.len(),
        "Chat request"
    );

    let reply = service
        .generate_reply(
            &body.user_message,
            body.history,
            body.conversation_id.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Chat request failed");
            AppError::from(e)
        })?;

    Ok(Json(ChatResponse { reply }))
}

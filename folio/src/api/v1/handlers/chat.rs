//! v1 Chat handler.

use std::time::Duration;

use axum::extract::State;

use crate::api::v1::dto::{ChatRequest, ChatResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::{AppJson, AppState};
use crate::llm::COMPLETION_FAILURE_MESSAGE;
use crate::models::{ChatMessage, ChatReply, SessionContext};

const MAX_MESSAGE_CHARS: usize = 2000;

/// `POST /api/v1/chat`
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    tag = "chat",
    operation_id = "chat.send",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Composed reply", body = ChatResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> ApiResponse<ChatResponse> {
    let message = req.message.trim();
    if message.is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Message cannot be empty");
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            format!("Message cannot exceed {MAX_MESSAGE_CHARS} characters"),
        );
    }

    let session = SessionContext::from_client(req.session_id.as_deref());
    let budget = Duration::from_secs(state.config.retrieval.chat_timeout_secs);

    let reply = match tokio::time::timeout(budget, state.composer.respond(message)).await {
        Ok(reply) => reply,
        Err(_) => {
            tracing::warn!(
                session_id = %session.session_id,
                timeout_secs = budget.as_secs(),
                "Chat reply timed out"
            );
            ChatReply::conversation(COMPLETION_FAILURE_MESSAGE)
        }
    };

    state
        .prompt_log
        .record(&session, message, Some(reply.content()))
        .await;

    let bot_message = ChatMessage::from_reply(&reply);
    ApiResponse::success(ChatResponse {
        reply: reply.into(),
        message: bot_message.into(),
        session_id: session.session_id,
    })
}

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::bot::Reply;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Who sent the message; cooldowns are keyed by it
    pub author: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// `null` when the message is not a command
    pub reply: Option<Reply>,
}

pub async fn post_message(
    State(state): State<AppState>,
    Json(message): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let author = message.author.trim();
    if author.is_empty() {
        return Err(ApiError::BadRequest("author must not be empty".to_string()));
    }

    let reply = state
        .dispatcher()
        .handle(author, &message.content, Utc::now())
        .await;

    Ok(Json(MessageResponse { reply }))
}

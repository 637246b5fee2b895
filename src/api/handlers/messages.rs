use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::response::{Acknowledgement, ApiError, AppJson, Envelope};
use crate::registry::Message;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

pub async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Envelope<Vec<Message>>> {
    Envelope::success(state.messages.list().await)
}

pub async fn create_message(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    AppJson(req): AppJson<CreateMessageRequest>,
) -> Result<Json<Envelope<Message>>, ApiError> {
    let message = state
        .messages
        .append(
            &req.content,
            req.author.as_deref(),
            Some(addr.ip().to_string()),
        )
        .await?;

    tracing::debug!(message_id = message.id, "Posted message");
    Ok(Envelope::success(message))
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Acknowledgement>, ApiError> {
    state.messages.delete(id).await?;

    tracing::debug!(message_id = id, "Deleted message");
    Ok(Acknowledgement::success("Message deleted"))
}

pub async fn clear_messages(State(state): State<Arc<AppState>>) -> Json<Acknowledgement> {
    state.messages.clear().await;

    tracing::warn!("Cleared all messages");
    Acknowledgement::success("All messages cleared")
}

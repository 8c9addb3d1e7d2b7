use super::{delete_with_message, get_record};
use crate::models::{ContactMessage, ContactMessageInput, DeleteResponse, Record};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

/// Store a message from the public contact form
pub async fn send_message(
    State(state): State<AppState>,
    Json(input): Json<ContactMessageInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    input.validate()?;

    let message: ContactMessage = state.db.insert(&input).await?;
    info!(message_id = %message.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Message sent successfully",
            "data": { "id": message.id }
        })),
    ))
}

/// All messages, newest first
pub async fn list_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<ContactMessage>>> {
    let query = state
        .db
        .table(ContactMessage::TABLE)?
        .select("*")
        .order("created_at.desc");

    Ok(Json(state.db.fetch(query).await?))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactMessage>> {
    get_record(&state, &id).await
}

pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .update::<ContactMessage, _>(&id, &json!({ "is_read": true }))
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Message marked as read"
    })))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_with_message::<ContactMessage>(&state, &id).await
}

pub mod auth;
pub mod contact;
pub mod education;
pub mod hobbies;
pub mod projects;
pub mod resumes;
pub mod skills;
pub mod testimonials;
pub mod upload;
pub mod work_experience;

use crate::models::{DeleteResponse, Record};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

/// Fetch one row by id
pub(crate) async fn get_record<T: Record>(state: &AppState, id: &str) -> ApiResult<Json<T>> {
    Ok(Json(state.db.find::<T>(id).await?))
}

/// Validate and insert, answering 201 with the stored row
pub(crate) async fn create_record<T, B>(state: &AppState, body: &B) -> ApiResult<(StatusCode, Json<T>)>
where
    T: Record,
    B: Validate + serde::Serialize,
{
    body.validate()?;
    let row = state.db.insert::<T, B>(body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Validate and apply `body` to the row with `id`
pub(crate) async fn update_record<T, B>(state: &AppState, id: &str, body: &B) -> ApiResult<Json<T>>
where
    T: Record,
    B: Validate + serde::Serialize,
{
    body.validate()?;
    Ok(Json(state.db.update::<T, B>(id, body).await?))
}

/// Delete answering `{success, message}`
pub(crate) async fn delete_with_message<T: Record>(
    state: &AppState,
    id: &str,
) -> ApiResult<Json<DeleteResponse>> {
    state.db.delete::<T>(id).await?;
    Ok(Json(DeleteResponse::for_record::<T>()))
}

/// Delete answering 204 without a body
pub(crate) async fn delete_no_content<T: Record>(state: &AppState, id: &str) -> ApiResult<StatusCode> {
    state.db.delete::<T>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

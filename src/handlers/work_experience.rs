use super::{create_record, delete_with_message, get_record, update_record};
use crate::models::{DeleteResponse, Record, WorkExperience, WorkExperienceInput};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Active positions, most recent first
pub async fn list_work_experience(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<WorkExperience>>> {
    let query = state
        .db
        .table(WorkExperience::TABLE)?
        .select("*")
        .eq("is_active", "true")
        .order("start_date.desc");

    Ok(Json(state.db.fetch(query).await?))
}

pub async fn get_work_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkExperience>> {
    get_record(&state, &id).await
}

pub async fn create_work_experience(
    State(state): State<AppState>,
    Json(input): Json<WorkExperienceInput>,
) -> ApiResult<(StatusCode, Json<WorkExperience>)> {
    create_record(&state, &input).await
}

pub async fn update_work_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<WorkExperienceInput>,
) -> ApiResult<Json<WorkExperience>> {
    update_record(&state, &id, &input).await
}

pub async fn delete_work_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_with_message::<WorkExperience>(&state, &id).await
}

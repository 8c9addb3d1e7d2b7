use super::{create_record, delete_with_message, get_record, update_record};
use crate::models::{DeleteResponse, Education, EducationInput, Record};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_education(State(state): State<AppState>) -> ApiResult<Json<Vec<Education>>> {
    let query = state
        .db
        .table(Education::TABLE)?
        .select("*")
        .eq("is_active", "true")
        .order("start_date.desc");

    Ok(Json(state.db.fetch(query).await?))
}

pub async fn get_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Education>> {
    get_record(&state, &id).await
}

pub async fn create_education(
    State(state): State<AppState>,
    Json(input): Json<EducationInput>,
) -> ApiResult<(StatusCode, Json<Education>)> {
    create_record(&state, &input).await
}

pub async fn update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EducationInput>,
) -> ApiResult<Json<Education>> {
    update_record(&state, &id, &input).await
}

pub async fn delete_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_with_message::<Education>(&state, &id).await
}

use super::{create_record, delete_with_message, get_record, update_record};
use crate::models::{DeleteResponse, Project, ProjectInput, Record};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    let query = state
        .db
        .table(Project::TABLE)?
        .select("*")
        .eq("is_active", "true")
        .order("display_order.asc");

    Ok(Json(state.db.fetch(query).await?))
}

/// Active projects flagged as featured
pub async fn list_featured_projects(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Project>>> {
    let query = state
        .db
        .table(Project::TABLE)?
        .select("*")
        .eq("is_active", "true")
        .eq("is_featured", "true")
        .order("display_order.asc");

    Ok(Json(state.db.fetch(query).await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    get_record(&state, &id).await
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    create_record(&state, &input).await
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<Json<Project>> {
    update_record(&state, &id, &input).await
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_with_message::<Project>(&state, &id).await
}

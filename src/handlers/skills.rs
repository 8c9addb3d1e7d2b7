use super::{create_record, delete_with_message, get_record, update_record};
use crate::models::{DeleteResponse, Record, Skill, SkillInput};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Active skills in display order
pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Json<Vec<Skill>>> {
    let query = state
        .db
        .table(Skill::TABLE)?
        .select("*")
        .eq("is_active", "true")
        .order("display_order.asc");

    Ok(Json(state.db.fetch(query).await?))
}

/// Every skill including inactive ones
pub async fn list_all_skills(State(state): State<AppState>) -> ApiResult<Json<Vec<Skill>>> {
    let query = state
        .db
        .table(Skill::TABLE)?
        .select("*")
        .order("display_order.asc");

    Ok(Json(state.db.fetch(query).await?))
}

pub async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Skill>> {
    get_record(&state, &id).await
}

pub async fn create_skill(
    State(state): State<AppState>,
    Json(input): Json<SkillInput>,
) -> ApiResult<(StatusCode, Json<Skill>)> {
    create_record(&state, &input).await
}

pub async fn update_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SkillInput>,
) -> ApiResult<Json<Skill>> {
    update_record(&state, &id, &input).await
}

pub async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_with_message::<Skill>(&state, &id).await
}

use super::{create_record, delete_no_content, get_record, update_record};
use crate::models::{Hobby, HobbyInput, HobbyUpdate, Pagination, Record};
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub active_only: Option<bool>,
}

pub async fn list_hobbies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Hobby>>> {
    let (from, to) = Pagination {
        skip: query.skip,
        limit: query.limit,
    }
    .range();

    let mut builder = state.db.table(Hobby::TABLE)?.select("*");
    if query.active_only.unwrap_or(true) {
        builder = builder.eq("is_active", "true");
    }
    let builder = builder.order("display_order.asc").range(from, to);

    Ok(Json(state.db.fetch(builder).await?))
}

pub async fn get_hobby(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Hobby>> {
    get_record(&state, &id).await
}

pub async fn create_hobby(
    State(state): State<AppState>,
    Json(input): Json<HobbyInput>,
) -> ApiResult<(StatusCode, Json<Hobby>)> {
    create_record(&state, &input).await
}

pub async fn update_hobby(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<HobbyUpdate>,
) -> ApiResult<Json<Hobby>> {
    update_record(&state, &id, &update).await
}

pub async fn delete_hobby(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_no_content::<Hobby>(&state, &id).await
}

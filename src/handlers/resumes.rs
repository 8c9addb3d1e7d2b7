use super::{create_record, delete_no_content, get_record, update_record};
use crate::models::{Language, Pagination, Record, Resume, ResumeInput, ResumeUpdate};
use crate::state::AppState;
use crate::utils::{ApiError, ApiResult};
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
    pub language: Option<String>,
}

pub async fn list_resumes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Resume>>> {
    let (from, to) = Pagination {
        skip: query.skip,
        limit: query.limit,
    }
    .range();

    let mut builder = state.db.table(Resume::TABLE)?.select("*");
    if query.active_only.unwrap_or(true) {
        builder = builder.eq("is_active", "true");
    }
    if let Some(language) = query.language.as_deref().filter(|l| !l.is_empty()) {
        let language: Language = language.parse()?;
        builder = builder.eq("language", language.as_str());
    }
    let builder = builder.order("created_at.desc").range(from, to);

    Ok(Json(state.db.fetch(builder).await?))
}

/// The active resume for one language
pub async fn get_active_resume(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> ApiResult<Json<Resume>> {
    let language: Language = language.parse()?;

    let query = state
        .db
        .table(Resume::TABLE)?
        .select("*")
        .eq("language", language.as_str())
        .eq("is_active", "true")
        .order("created_at.desc")
        .limit(1);

    let resumes: Vec<Resume> = state.db.fetch(query).await?;
    resumes.into_iter().next().map(Json).ok_or_else(|| {
        ApiError::not_found_error(format!("No active resume found for language: {language}"))
    })
}

pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Resume>> {
    get_record(&state, &id).await
}

pub async fn create_resume(
    State(state): State<AppState>,
    Json(input): Json<ResumeInput>,
) -> ApiResult<(StatusCode, Json<Resume>)> {
    create_record(&state, &input).await
}

pub async fn update_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ResumeUpdate>,
) -> ApiResult<Json<Resume>> {
    update_record(&state, &id, &update).await
}

pub async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_no_content::<Resume>(&state, &id).await
}

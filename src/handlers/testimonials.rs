use super::{create_record, delete_no_content, get_record, update_record};
use crate::models::{
    Pagination, Record, Testimonial, TestimonialInput, TestimonialStatus, TestimonialSubmission,
    TestimonialUpdate,
};
use crate::state::AppState;
use crate::utils::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct PublicListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub approved_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub status_filter: Option<String>,
}

/// Approved testimonials unless `approved_only=false`
pub async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<PublicListQuery>,
) -> ApiResult<Json<Vec<Testimonial>>> {
    let page = Pagination {
        skip: query.skip,
        limit: query.limit,
    };
    let (from, to) = page.range();

    let mut builder = state.db.table(Testimonial::TABLE)?.select("*");
    if query.approved_only.unwrap_or(true) {
        builder = builder.eq("status", TestimonialStatus::Approved.as_str());
    }
    let builder = builder
        .order("display_order.asc,created_at.desc")
        .range(from, to);

    Ok(Json(state.db.fetch(builder).await?))
}

/// Every testimonial, optionally filtered by moderation status
pub async fn list_all_testimonials(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> ApiResult<Json<Vec<Testimonial>>> {
    let page = Pagination {
        skip: query.skip,
        limit: query.limit,
    };
    let (from, to) = page.range();

    let mut builder = state.db.table(Testimonial::TABLE)?.select("*");
    if let Some(status) = query.status_filter.as_deref().filter(|s| !s.is_empty()) {
        let status: TestimonialStatus = status.parse().map_err(ApiError::validation_error)?;
        builder = builder.eq("status", status.as_str());
    }
    let builder = builder.order("created_at.desc").range(from, to);

    Ok(Json(state.db.fetch(builder).await?))
}

pub async fn get_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Testimonial>> {
    get_record(&state, &id).await
}

/// Public submission, held for moderation
pub async fn submit_testimonial(
    State(state): State<AppState>,
    Json(submission): Json<TestimonialSubmission>,
) -> ApiResult<(StatusCode, Json<Testimonial>)> {
    submission.validate()?;

    let pending = TestimonialInput {
        submission,
        status: TestimonialStatus::Pending,
        display_order: 0,
    };
    let testimonial: Testimonial = state.db.insert(&pending).await?;
    info!(testimonial_id = %testimonial.id, "Testimonial submitted for review");

    Ok((StatusCode::CREATED, Json(testimonial)))
}

pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(input): Json<TestimonialInput>,
) -> ApiResult<(StatusCode, Json<Testimonial>)> {
    create_record(&state, &input).await
}

pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<TestimonialUpdate>,
) -> ApiResult<Json<Testimonial>> {
    update_record(&state, &id, &update).await
}

pub async fn approve_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Testimonial>> {
    review(&state, &id, TestimonialStatus::Approved).await
}

pub async fn reject_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Testimonial>> {
    review(&state, &id, TestimonialStatus::Rejected).await
}

async fn review(
    state: &AppState,
    id: &str,
    status: TestimonialStatus,
) -> ApiResult<Json<Testimonial>> {
    let decision = TestimonialUpdate::review(status, Utc::now());
    let testimonial: Testimonial = state.db.update(id, &decision).await?;
    info!(testimonial_id = %testimonial.id, %status, "Testimonial reviewed");
    Ok(Json(testimonial))
}

pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    delete_no_content::<Testimonial>(&state, &id).await
}

use crate::state::AppState;
use crate::utils::{ApiError, Config};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Reject requests whose declared length exceeds the upload limit
pub async fn validate_request_size(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(length) = declared {
        if length > config.upload.body_limit() {
            return Err(ApiError::payload_too_large());
        }
    }

    Ok(next.run(request).await)
}

/// CORS middleware configuration
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Credentials cannot be combined with a wildcard origin
    if config.server.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Request ID middleware
pub fn request_id_layer() -> tower_http::request_id::SetRequestIdLayer<tower_http::request_id::MakeRequestUuid> {
    tower_http::request_id::SetRequestIdLayer::x_request_id(tower_http::request_id::MakeRequestUuid)
}

/// Tracing middleware
pub fn trace_layer() -> tower_http::trace::TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
> {
    tower_http::trace::TraceLayer::new_for_http()
        .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
        .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Portfolio API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api/health"
    }))
}

/// Health check with the verification and storage capabilities in effect
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let keys = state.verifier.keys();
    let storage_credential = match state.credentials.current() {
        Ok(credential) => json!(credential.source),
        Err(_) => json!("unavailable"),
    };

    Json(json!({
        "status": "healthy",
        "message": "Portfolio API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
        "capabilities": {
            "asymmetric": keys.asymmetric().is_some(),
            "symmetric": keys.shared_secret().is_some(),
            "storage_credential": storage_credential,
        }
    }))
}

pub mod keys;
pub mod supabase;
pub mod verifier;

pub use keys::{JwksCache, KeySource, NoUsableKeySource, SharedSecret};
pub use supabase::SupabaseAuth;
pub use verifier::{AuthError, SigningScheme, TokenVerifier};

use crate::utils::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Authenticated principal for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
}

/// Extract the bearer token from the `Authorization` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Rejects requests without a valid bearer token and stores the
/// [`Identity`] in the request extensions for handlers.
pub async fn require_identity(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| ApiError::authentication_error("Not authenticated"))?;

    let identity = verifier.verify(&token).await.map_err(|e| {
        debug!(error = %e, path = %request.uri().path(), "Rejected bearer token");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

use crate::auth::supabase::Session;
use crate::auth::Identity;
use crate::state::AppState;
use crate::utils::ApiResult;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Password login through the auth provider
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<Session>> {
    credentials.validate()?;

    let session = state
        .supabase_auth
        .sign_in(&credentials.email, &credentials.password)
        .await?;

    info!(user_id = %session.user.id, "User logged in");
    Ok(Json(session))
}

pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<Value>> {
    credentials.validate()?;

    let user = state
        .supabase_auth
        .sign_up(&credentials.email, &credentials.password)
        .await?;

    info!(user_id = %user.id, "User registered");
    Ok(Json(json!({
        "message": "Registration successful. Please check your email for verification.",
        "user": { "id": user.id, "email": user.email }
    })))
}

/// The caller's verified identity
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// Tokens are discarded client side; nothing to revoke here
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logout successful" }))
}

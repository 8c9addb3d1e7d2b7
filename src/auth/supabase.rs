//! Password login and sign-up, delegated to Supabase Auth.

use crate::utils::config::SupabaseConfig;
use crate::utils::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

/// User summary returned by login and sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Session issued by a successful password login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Clone)]
pub struct SupabaseAuth {
    http: reqwest::Client,
    auth_url: String,
    anon_key: Option<String>,
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            auth_url: config.auth_url(),
            anon_key: config.anon_key.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.anon_key.is_some()
    }

    /// Exchange email and password for a session
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Session> {
        let url = format!("{}/token?grant_type=password", self.auth_url);
        let (ok, body) = self.post(&url, json!({ "email": email, "password": password })).await?;

        if !ok {
            return Err(ApiError::authentication_error(provider_message(
                &body,
                "Invalid email or password",
            )));
        }

        serde_json::from_value(body).map_err(|e| {
            error!(error = %e, "Unexpected login response from auth provider");
            ApiError::authentication_error("Invalid email or password")
        })
    }

    /// Register a new account; the provider may require email confirmation
    pub async fn sign_up(&self, email: &str, password: &str) -> ApiResult<AuthUser> {
        let url = format!("{}/signup", self.auth_url);
        let (ok, body) = self.post(&url, json!({ "email": email, "password": password })).await?;

        if !ok {
            return Err(ApiError::validation_error(provider_message(
                &body,
                "Registration failed",
            )));
        }

        // Either a bare user object or a session wrapping one
        let user = body.get("user").cloned().unwrap_or(body);
        serde_json::from_value(user)
            .map_err(|_| ApiError::validation_error("Registration failed"))
    }

    async fn post(&self, url: &str, payload: Value) -> ApiResult<(bool, Value)> {
        let anon_key = self.anon_key.as_deref().ok_or_else(|| {
            ApiError::service_unavailable("Authentication service is currently unavailable")
        })?;

        let response = self
            .http
            .post(url)
            .header("apikey", anon_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Auth provider request failed");
                ApiError::service_unavailable("Authentication service is currently unavailable")
            })?;

        let ok = response.status().is_success();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((ok, body))
    }
}

fn provider_message(body: &Value, fallback: &str) -> String {
    ["error_description", "msg", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .unwrap_or(fallback)
        .to_string()
}

pub mod credentials;

pub use credentials::{CredentialError, CredentialSelector, CredentialSource, StorageCredential};

use crate::utils::config::{SupabaseConfig, UploadConfig};
use crate::utils::{ApiError, ApiResult};
use bytes::Bytes;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        error!("Storage credential error: {}", err);
        ApiError::service_unavailable("Storage service is currently unavailable")
    }
}

/// Object storage client for the configured bucket
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    storage_url: String,
    bucket: String,
    credentials: Arc<CredentialSelector>,
}

impl StorageClient {
    pub fn new(
        supabase: &SupabaseConfig,
        upload: &UploadConfig,
        http: reqwest::Client,
        credentials: Arc<CredentialSelector>,
    ) -> Self {
        Self {
            http,
            storage_url: supabase.storage_url(),
            bucket: upload.storage_bucket.clone(),
            credentials,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload `body` to `path`, overwriting any existing object
    pub async fn upload(&self, path: &str, body: Bytes, content_type: &str) -> ApiResult<()> {
        let url = format!("{}/object/{}/{}", self.storage_url, self.bucket, encode_path(path));
        let request = self
            .authorized(self.http.post(&url))?
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(body);

        self.send(request, "upload", path).await
    }

    /// Remove the object at `path`
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = format!("{}/object/{}", self.storage_url, self.bucket);
        let request = self
            .authorized(self.http.delete(&url))?
            .json(&json!({ "prefixes": [path] }));

        self.send(request, "delete", path).await
    }

    /// Public download URL of an object
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.storage_url,
            self.bucket,
            encode_path(path)
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> ApiResult<reqwest::RequestBuilder> {
        let credential = self.credentials.current()?;
        if credential.is_degraded() {
            warn!("Storage request is using the anon key; bucket policies may reject it");
        }

        let api_key = self
            .credentials
            .api_key()
            .unwrap_or(credential.token.as_str())
            .to_string();

        Ok(builder
            .header("apikey", api_key)
            .header("Authorization", format!("Bearer {}", credential.token)))
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str, path: &str) -> ApiResult<()> {
        let response = request.send().await.map_err(|e| {
            error!(action, path, error = %e, "Storage request failed");
            ApiError::service_unavailable("Storage service is currently unavailable")
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(action, path, %status, body = %body, "Storage backend rejected request");
            return Err(ApiError::service_unavailable(format!(
                "Storage {action} failed with status {}",
                status.as_u16()
            )));
        }

        debug!(action, path, "Storage request succeeded");
        Ok(())
    }
}

/// Percent-encode each segment of an object path, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

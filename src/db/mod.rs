use crate::models::Record;
use crate::storage::CredentialSelector;
use crate::utils::config::SupabaseConfig;
use crate::utils::{ApiError, ApiResult};
use postgrest::{Builder, Postgrest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// PostgREST client for the portfolio tables
#[derive(Clone)]
pub struct Database {
    client: Postgrest,
    credentials: Arc<CredentialSelector>,
}

impl Database {
    pub fn new(config: &SupabaseConfig, credentials: Arc<CredentialSelector>) -> Self {
        Self {
            client: Postgrest::new(config.rest_url()),
            credentials,
        }
    }

    /// Query builder for `table`, authorized with the current credential
    pub fn table(&self, table: &str) -> ApiResult<Builder> {
        let credential = self.credentials.current()?;
        let api_key = self.credentials.api_key().unwrap_or(credential.token.as_str());

        Ok(self
            .client
            .clone()
            .insert_header("apikey", api_key)
            .from(table)
            .auth(&credential.token))
    }

    /// Run a read query and decode every returned row
    pub async fn fetch<T: DeserializeOwned>(&self, query: Builder) -> ApiResult<Vec<T>> {
        let body = execute(query).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Unexpected row shape from database");
            ApiError::internal_error("Database returned malformed data")
        })
    }

    pub async fn find<T: Record>(&self, id: &str) -> ApiResult<T> {
        let id = record_id::<T>(id)?;
        let query = self.table(T::TABLE)?.select("*").eq("id", &id);
        first_row::<T, _>(self.fetch(query).await?)
    }

    pub async fn insert<T: Record, B: Serialize>(&self, body: &B) -> ApiResult<T> {
        let query = self.table(T::TABLE)?.insert(serde_json::to_string(body)?);
        let row = first_row::<T, _>(self.fetch(query).await?)?;
        debug!(table = T::TABLE, "Inserted row");
        Ok(row)
    }

    /// Apply the non-null fields of `body` to the row with `id`
    pub async fn update<T: Record, B: Serialize>(&self, id: &str, body: &B) -> ApiResult<T> {
        let changes = serde_json::to_value(body)?;
        if changes.as_object().is_some_and(|fields| fields.is_empty()) {
            return self.find(id).await;
        }

        let id = record_id::<T>(id)?;
        let query = self
            .table(T::TABLE)?
            .eq("id", &id)
            .update(changes.to_string());
        first_row::<T, _>(self.fetch(query).await?)
    }

    pub async fn delete<T: Record>(&self, id: &str) -> ApiResult<()> {
        let id = record_id::<T>(id)?;
        let query = self.table(T::TABLE)?.eq("id", &id).delete();
        first_row::<T, Value>(self.fetch(query).await?)?;
        debug!(table = T::TABLE, %id, "Deleted row");
        Ok(())
    }
}

async fn execute(query: Builder) -> ApiResult<String> {
    let response = query.execute().await.map_err(|e| {
        error!(error = %e, "Database request failed");
        ApiError::service_unavailable("Database is currently unavailable")
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        error!(error = %e, "Failed to read database response");
        ApiError::service_unavailable("Database is currently unavailable")
    })?;

    if status.is_success() {
        return Ok(body);
    }

    error!(status = status.as_u16(), body = %body, "Database rejected request");
    Err(match status.as_u16() {
        400 | 409 | 422 => ApiError::validation_error(postgrest_message(&body)),
        401 | 403 => ApiError::service_unavailable("Database credentials were rejected"),
        _ => ApiError::internal_error("Database error"),
    })
}

fn postgrest_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// Ids are UUIDs; anything else cannot match a row
fn record_id<R: Record>(id: &str) -> ApiResult<String> {
    Uuid::parse_str(id)
        .map(|id| id.to_string())
        .map_err(|_| not_found::<R>())
}

fn first_row<R: Record, T>(rows: Vec<T>) -> ApiResult<T> {
    rows.into_iter().next().ok_or_else(not_found::<R>)
}

fn not_found<R: Record>() -> ApiError {
    ApiError::not_found_error(format!("{} not found", R::NAME))
}

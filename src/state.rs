use crate::auth::{KeySource, SupabaseAuth, TokenVerifier};
use crate::db::Database;
use crate::storage::{CredentialSelector, StorageClient};
use crate::utils::Config;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub storage: StorageClient,
    pub verifier: Arc<TokenVerifier>,
    pub supabase_auth: SupabaseAuth,
    pub credentials: Arc<CredentialSelector>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Resolve key material and build every backend client.
    ///
    /// Missing keys or credentials degrade capability; they never abort startup.
    pub async fn from_config(config: Arc<Config>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.auth.request_timeout)
            .build()?;

        let keys = KeySource::resolve(&config.supabase, &http).await;
        if let Err(e) = keys.require_any() {
            warn!("{}; protected routes will reject every request", e);
        }
        Ok(Self::with_keys(config, keys, http))
    }

    /// Build state around already resolved key material
    pub fn with_keys(config: Arc<Config>, keys: KeySource, http: reqwest::Client) -> Self {
        let credentials = Arc::new(CredentialSelector::new(&config.supabase));
        match credentials.current() {
            Ok(credential) if credential.is_degraded() => {
                warn!("Storage and database calls will run with anon privileges")
            }
            Ok(credential) => info!(source = ?credential.source, "Storage credential ready"),
            Err(e) => warn!("{}; storage and database calls will fail", e),
        }

        if config.supabase.anon_key.is_none() {
            warn!("SUPABASE_ANON_KEY is not set; login and registration are unavailable");
        }

        Self {
            db: Database::new(&config.supabase, credentials.clone()),
            storage: StorageClient::new(
                &config.supabase,
                &config.upload,
                http.clone(),
                credentials.clone(),
            ),
            verifier: Arc::new(TokenVerifier::new(keys, &config.auth)),
            supabase_auth: SupabaseAuth::new(&config.supabase, http),
            credentials,
            config,
        }
    }
}

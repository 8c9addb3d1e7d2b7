//! Key material used to verify inbound tokens.
//!
//! Two independent capabilities, each either present or absent:
//!
//! - a public key set fetched from the provider's well-known JWKS endpoint,
//!   used for asymmetrically signed tokens
//! - the legacy shared secret, used for HS* tokens
//!
//! Neither is required for the process to start. A failed key-set fetch at
//! startup only disables asymmetric verification.

use crate::auth::verifier::AuthError;
use crate::utils::config::SupabaseConfig;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
#[error("no usable key source: neither a public key set nor a shared secret is configured")]
pub struct NoUsableKeySource;

/// Minimum time between two refetches triggered by unknown key ids
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct PublicKey {
    kid: Option<String>,
    key: DecodingKey,
}

/// Public keys from a JWKS endpoint, addressable by key id.
///
/// An unknown key id triggers a refetch of the set before the lookup
/// fails, which picks up keys rotated in after startup. Refetches are
/// spaced at least `REFRESH_INTERVAL` apart whatever the key id.
pub struct JwksCache {
    url: String,
    client: reqwest::Client,
    keys: RwLock<Vec<PublicKey>>,
    last_refresh: Mutex<Option<Instant>>,
}

impl JwksCache {
    /// Fetch the key set at `url`
    pub async fn fetch(url: impl Into<String>, client: reqwest::Client) -> Result<Self, AuthError> {
        let url = url.into();
        let keys = fetch_keys(&client, &url).await?;
        Ok(Self {
            url,
            client,
            keys: RwLock::new(keys),
            last_refresh: Mutex::new(None),
        })
    }

    /// Build a cache from an already parsed key set
    pub fn from_jwk_set(url: impl Into<String>, client: reqwest::Client, set: &JwkSet) -> Self {
        Self {
            url: url.into(),
            client,
            keys: RwLock::new(convert_keys(set)),
            last_refresh: Mutex::new(None),
        }
    }

    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Resolve the key for a token header's `kid`.
    ///
    /// A header without `kid` only resolves when the set holds exactly one key.
    pub async fn key_for(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.lookup(kid).await {
            return Ok(key);
        }

        let Some(kid) = kid else {
            return Err(AuthError::InvalidToken(
                "token header has no key id and the key set is ambiguous".to_string(),
            ));
        };

        // Held across the refetch so concurrent misses share one request
        let mut last_refresh = self.last_refresh.lock().await;
        if let Some(key) = self.lookup(Some(kid)).await {
            return Ok(key);
        }
        if (*last_refresh).is_some_and(|at| at.elapsed() < REFRESH_INTERVAL) {
            debug!(kid, "Unknown key id, key set was refreshed recently");
            return Err(unknown_kid(kid));
        }

        debug!(kid, "Unknown key id, refreshing key set");
        *last_refresh = Some(Instant::now());
        let refreshed = fetch_keys(&self.client, &self.url).await?;
        *self.keys.write().await = refreshed;

        self.lookup(Some(kid)).await.ok_or_else(|| unknown_kid(kid))
    }

    async fn lookup(&self, kid: Option<&str>) -> Option<DecodingKey> {
        let keys = self.keys.read().await;
        match kid {
            Some(kid) => keys
                .iter()
                .find(|k| k.kid.as_deref() == Some(kid))
                .map(|k| k.key.clone()),
            None if keys.len() == 1 => Some(keys[0].key.clone()),
            None => None,
        }
    }
}

fn unknown_kid(kid: &str) -> AuthError {
    AuthError::InvalidToken(format!("no public key matches key id '{kid}'"))
}

async fn fetch_keys(client: &reqwest::Client, url: &str) -> Result<Vec<PublicKey>, AuthError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AuthError::KeySourceUnavailable(format!("key set request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::KeySourceUnavailable(format!(
            "key set endpoint returned {status}"
        )));
    }

    let set: JwkSet = response
        .json()
        .await
        .map_err(|e| AuthError::KeySourceUnavailable(format!("malformed key set: {e}")))?;

    let keys = convert_keys(&set);
    debug!(url, count = keys.len(), "Fetched public key set");
    Ok(keys)
}

fn convert_keys(set: &JwkSet) -> Vec<PublicKey> {
    set.keys
        .iter()
        .filter_map(|jwk| match DecodingKey::from_jwk(jwk) {
            Ok(key) => Some(PublicKey {
                kid: jwk.common.key_id.clone(),
                key,
            }),
            Err(e) => {
                warn!(kid = ?jwk.common.key_id, error = %e, "Skipping unusable key in key set");
                None
            }
        })
        .collect()
}

/// Legacy symmetric secret
pub struct SharedSecret {
    key: DecodingKey,
}

impl SharedSecret {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn key(&self) -> &DecodingKey {
        &self.key
    }
}

/// Everything the verifier may use, fixed after startup
#[derive(Default)]
pub struct KeySource {
    jwks: Option<JwksCache>,
    shared_secret: Option<SharedSecret>,
}

impl KeySource {
    pub fn new(jwks: Option<JwksCache>, shared_secret: Option<&str>) -> Self {
        Self {
            jwks,
            shared_secret: shared_secret.map(SharedSecret::new),
        }
    }

    /// Resolve key material from configuration.
    ///
    /// Fetches the public key set once. A fetch failure or an empty set
    /// leaves asymmetric verification unavailable.
    pub async fn resolve(config: &SupabaseConfig, client: &reqwest::Client) -> Self {
        let url = config.jwks_url();
        let jwks = match JwksCache::fetch(url.as_str(), client.clone()).await {
            Ok(cache) => {
                let count = cache.len().await;
                if count == 0 {
                    info!(url = %url, "Public key set is empty, asymmetric verification disabled");
                    None
                } else {
                    info!(url = %url, keys = count, "Asymmetric verification enabled");
                    Some(cache)
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Could not load public key set, asymmetric verification disabled");
                None
            }
        };

        if config.jwt_secret.is_some() {
            info!("Symmetric verification enabled");
        }

        Self::new(jwks, config.jwt_secret.as_deref())
    }

    pub fn asymmetric(&self) -> Option<&JwksCache> {
        self.jwks.as_ref()
    }

    pub fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }

    pub fn require_any(&self) -> Result<(), NoUsableKeySource> {
        if self.jwks.is_none() && self.shared_secret.is_none() {
            return Err(NoUsableKeySource);
        }
        Ok(())
    }
}

//! Outbound credential selection for the storage and database backends.
//!
//! The privileged Supabase credential can be deployed either as a
//! pre-signed service-role token or as the raw signing secret. Selection
//! order is:
//!
//! 1. a pre-signed service token, used as is
//! 2. a raw secret, from which a one-hour `service_role` token is minted
//! 3. the anon key, which works but only with anon privileges
//!
//! If none of these is configured the selector reports
//! [`CredentialError::Unavailable`].

use crate::utils::config::SupabaseConfig;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Validity window of a minted credential, in seconds
pub const MINTED_TTL_SECS: i64 = 3600;

/// Role claim carried by minted credentials
pub const MINTED_ROLE: &str = "service_role";

/// Issuer claim carried by minted credentials
pub const MINTED_ISSUER: &str = "supabase";

/// Minted credentials are replaced this long before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// Base64url of `{"`, the start of every JSON-headed JWT
const SIGNED_TOKEN_PREFIX: &str = "eyJ";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no storage credential is configured")]
    Unavailable,
    #[error("failed to mint service credential: {0}")]
    Mint(String),
}

/// How `SUPABASE_SERVICE_KEY` should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialForm {
    /// Already a signed token
    Token,
    /// Raw signing secret
    Secret,
    /// Guess from the value's shape
    #[default]
    Auto,
}

impl FromStr for CredentialForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" | "jwt" => Ok(Self::Token),
            "secret" | "raw" => Ok(Self::Secret),
            "auto" | "" => Ok(Self::Auto),
            other => Err(format!(
                "unknown credential form '{other}', expected token, secret or auto"
            )),
        }
    }
}

/// The privileged credential in whichever form it was deployed
#[derive(Clone, PartialEq, Eq)]
pub enum ServiceCredential {
    Token(String),
    Secret(String),
}

impl ServiceCredential {
    /// Classify a raw configuration value. Returns `None` for blank input.
    pub fn classify(raw: &str, form: CredentialForm) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let credential = match form {
            CredentialForm::Token => Self::Token(raw.to_string()),
            CredentialForm::Secret => Self::Secret(raw.to_string()),
            CredentialForm::Auto if looks_like_signed_token(raw) => Self::Token(raw.to_string()),
            CredentialForm::Auto => Self::Secret(raw.to_string()),
        };
        Some(credential)
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("ServiceCredential::Token(<redacted>)"),
            Self::Secret(_) => f.write_str("ServiceCredential::Secret(<redacted>)"),
        }
    }
}

/// Best-effort check for a compact JWS: JSON header prefix and three segments.
///
/// This is a heuristic; it says nothing about whether the signature is valid.
pub fn looks_like_signed_token(value: &str) -> bool {
    value.starts_with(SIGNED_TOKEN_PREFIX)
        && value.split('.').count() == 3
        && value.split('.').all(|segment| !segment.is_empty())
}

/// Where the selected credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    PreSigned,
    Minted,
    Anon,
}

/// Credential presented to the storage backend
#[derive(Clone)]
pub struct StorageCredential {
    pub token: String,
    pub source: CredentialSource,
    /// Only set for minted credentials
    pub expires_at: Option<DateTime<Utc>>,
}

impl StorageCredential {
    /// True when only the anon key was available
    pub fn is_degraded(&self) -> bool {
        self.source == CredentialSource::Anon
    }

    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - Duration::seconds(REFRESH_MARGIN_SECS) <= now)
            .unwrap_or(false)
    }
}

impl fmt::Debug for StorageCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Claims of a minted service credential
#[derive(Debug, Serialize, Deserialize)]
pub struct MintedClaims {
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a short-lived `service_role` token with the raw secret.
///
/// Returns the token and its expiry, which is exactly `issued_at + 1h`.
pub fn mint_service_token(
    secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<(String, DateTime<Utc>), CredentialError> {
    let expires_at = issued_at + Duration::seconds(MINTED_TTL_SECS);
    let claims = MintedClaims {
        role: MINTED_ROLE.to_string(),
        iss: MINTED_ISSUER.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CredentialError::Mint(e.to_string()))?;

    Ok((token, expires_at))
}

/// Pick the best available outbound credential at `now`
pub fn select_credential(
    config: &SupabaseConfig,
    now: DateTime<Utc>,
) -> Result<StorageCredential, CredentialError> {
    match &config.service_credential {
        Some(ServiceCredential::Token(token)) => Ok(StorageCredential {
            token: token.clone(),
            source: CredentialSource::PreSigned,
            expires_at: None,
        }),
        Some(ServiceCredential::Secret(secret)) => {
            let (token, expires_at) = mint_service_token(secret, now)?;
            Ok(StorageCredential {
                token,
                source: CredentialSource::Minted,
                expires_at: Some(expires_at),
            })
        }
        None => match &config.anon_key {
            Some(anon_key) => Ok(StorageCredential {
                token: anon_key.clone(),
                source: CredentialSource::Anon,
                expires_at: None,
            }),
            None => Err(CredentialError::Unavailable),
        },
    }
}

/// Resolves the outbound credential once and reuses it.
///
/// A minted credential is re-minted shortly before it expires; the other
/// forms never change for the life of the process.
pub struct CredentialSelector {
    config: SupabaseConfig,
    cached: Mutex<Option<StorageCredential>>,
}

impl CredentialSelector {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            config: config.clone(),
            cached: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Result<StorageCredential, CredentialError> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Result<StorageCredential, CredentialError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(credential) = cached.as_ref().filter(|c| !c.needs_refresh(now)) {
            return Ok(credential.clone());
        }

        let credential = select_credential(&self.config, now)?;
        if credential.is_degraded() {
            warn!("No service credential configured, falling back to the anon key");
        } else {
            info!(source = ?credential.source, expires_at = ?credential.expires_at, "Selected storage credential");
        }

        *cached = Some(credential.clone());
        Ok(credential)
    }

    /// Key sent in the `apikey` header alongside the bearer credential
    pub fn api_key(&self) -> Option<&str> {
        self.config.anon_key.as_deref()
    }
}

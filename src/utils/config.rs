use crate::storage::credentials::{CredentialForm, ServiceCredential};
use anyhow::{anyhow, Context};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000,http://localhost:4200";

/// Application configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Supabase project configuration
    pub supabase: SupabaseConfig,
    /// Inbound token verification
    pub auth: AuthConfig,
    /// File upload configuration
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Supabase endpoints and key material
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL without trailing slash
    pub url: String,
    pub anon_key: Option<String>,
    pub service_credential: Option<ServiceCredential>,
    /// Legacy shared secret for HS* tokens
    pub jwt_secret: Option<String>,
    pub jwks_url: Option<String>,
}

impl SupabaseConfig {
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.url)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    /// Well-known key set location, unless overridden
    pub fn jwks_url(&self) -> String {
        self.jwks_url
            .clone()
            .unwrap_or_else(|| format!("{}/.well-known/jwks.json", self.auth_url()))
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<set>"))
            .field("service_credential", &self.service_credential)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<set>"))
            .field("jwks_url", &self.jwks_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Required `aud` claim; `None` disables the audience check
    pub audience: Option<String>,
    pub leeway_secs: u64,
    /// Role reported when a token carries no `role` claim
    pub default_role: String,
    /// Upper bound for calls to the key provider, auth and storage
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub storage_bucket: String,
}

/// Room for multipart boundaries and headers on top of the file itself
pub const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

impl UploadConfig {
    /// Largest request body accepted on any route
    pub fn body_limit(&self) -> u64 {
        self.max_file_size.saturating_add(MULTIPART_OVERHEAD)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let url = var("SUPABASE_URL").ok_or_else(|| anyhow!("SUPABASE_URL is required"))?;
        url::Url::parse(&url).with_context(|| format!("SUPABASE_URL is not a valid URL: {url}"))?;

        let form: CredentialForm = var("SUPABASE_SERVICE_KEY_FORM")
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| anyhow!("Invalid SUPABASE_SERVICE_KEY_FORM: {e}"))?;
        let service_credential = var("SUPABASE_SERVICE_KEY")
            .or_else(|| var("SUPABASE_SERVICE_ROLE_KEY"))
            .and_then(|raw| ServiceCredential::classify(&raw, form));

        let config = Self {
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(var("PORT"), "PORT", 8000)?,
                cors_origins: var("CORS_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            supabase: SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key: var("SUPABASE_ANON_KEY"),
                service_credential,
                jwt_secret: var("SUPABASE_JWT_SECRET"),
                jwks_url: var("SUPABASE_JWKS_URL"),
            },
            auth: AuthConfig {
                audience: Some(var("JWT_AUDIENCE").unwrap_or_else(|| "authenticated".to_string()))
                    .filter(|aud| aud != "none"),
                leeway_secs: parse_or(var("JWT_LEEWAY_SECS"), "JWT_LEEWAY_SECS", 0)?,
                default_role: "user".to_string(),
                request_timeout: Duration::from_secs(parse_or(
                    var("KEY_FETCH_TIMEOUT_SECS"),
                    "KEY_FETCH_TIMEOUT_SECS",
                    10,
                )?),
            },
            upload: UploadConfig {
                max_file_size: parse_or(var("MAX_FILE_SIZE"), "MAX_FILE_SIZE", 50 * 1024 * 1024)?,
                storage_bucket: var("STORAGE_BUCKET").unwrap_or_else(|| "portfolio".to_string()),
            },
        };

        Ok(config)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow!("Invalid {key} value: {raw}")),
        None => Ok(default),
    }
}

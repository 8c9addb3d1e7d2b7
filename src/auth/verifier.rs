use crate::auth::keys::KeySource;
use crate::auth::Identity;
use crate::utils::config::AuthConfig;
use crate::utils::ApiError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

/// Why a bearer token was rejected
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Invalid authentication token")]
    MissingSubject,
    #[error("No verification method available for algorithm {0:?}")]
    NoVerificationMethod(Algorithm),
    /// The key provider could not be reached; says nothing about the token
    #[error("Key source unavailable: {0}")]
    KeySourceUnavailable(String),
    #[error("Authentication error: {0}")]
    Other(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::InvalidToken(err.to_string()),
            _ => Self::Other(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::KeySourceUnavailable(_) => ApiError::service_unavailable(err.to_string()),
            _ => ApiError::authentication_error(err.to_string()),
        }
    }
}

/// Verification strategy selected by a token's declared algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// HMAC with the shared secret
    Symmetric,
    /// Public key from the key set
    Asymmetric,
}

impl SigningScheme {
    pub fn of(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Self::Symmetric,
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
            | Algorithm::ES256
            | Algorithm::ES384
            | Algorithm::EdDSA => Self::Asymmetric,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Checks bearer tokens and extracts the caller's identity.
///
/// The header is read unverified only to choose a strategy; claims are
/// never used before the signature, expiry and audience checks pass.
pub struct TokenVerifier {
    keys: KeySource,
    audience: Option<String>,
    leeway_secs: u64,
    default_role: String,
}

impl TokenVerifier {
    pub fn new(keys: KeySource, config: &AuthConfig) -> Self {
        Self {
            keys,
            audience: config.audience.clone(),
            leeway_secs: config.leeway_secs,
            default_role: config.default_role.clone(),
        }
    }

    pub fn keys(&self) -> &KeySource {
        &self.keys
    }

    pub async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken("token is empty".to_string()));
        }

        let header = decode_header(token)?;
        let algorithm = header.alg;

        let claims = match SigningScheme::of(algorithm) {
            SigningScheme::Asymmetric => {
                let jwks = self
                    .keys
                    .asymmetric()
                    .ok_or(AuthError::NoVerificationMethod(algorithm))?;
                let key = jwks.key_for(header.kid.as_deref()).await?;
                self.decode_claims(token, &key, algorithm)?
            }
            SigningScheme::Symmetric => {
                let secret = self
                    .keys
                    .shared_secret()
                    .ok_or(AuthError::NoVerificationMethod(algorithm))?;
                self.decode_claims(token, secret.key(), algorithm)?
            }
        };

        let id = claims
            .sub
            .filter(|sub| !sub.trim().is_empty())
            .ok_or(AuthError::MissingSubject)?;

        debug!(?algorithm, user_id = %id, "Verified bearer token");

        Ok(Identity {
            id,
            email: claims.email,
            role: claims.role.unwrap_or_else(|| self.default_role.clone()),
        })
    }

    fn decode_claims(
        &self,
        token: &str,
        key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = true;
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(decode::<TokenClaims>(token, key, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-jwt-secret-for-verifier-unit-tests";
    const RSA_PEM: &str = include_str!("../../tests/fixtures/rsa_primary.pem");

    fn auth_config() -> AuthConfig {
        AuthConfig {
            audience: Some("authenticated".to_string()),
            leeway_secs: 0,
            default_role: "user".to_string(),
            request_timeout: std::time::Duration::from_secs(1),
        }
    }

    fn symmetric_verifier() -> TokenVerifier {
        TokenVerifier::new(KeySource::new(None, Some(SECRET)), &auth_config())
    }

    fn sign_hs256(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> serde_json::Value {
        json!({
            "sub": "8f14e45f-ceea-4e7a-9c1b-2a3b4c5d6e7f",
            "aud": "authenticated",
            "email": "admin@example.com",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "iat": Utc::now().timestamp(),
        })
    }

    #[test]
    fn test_signing_scheme_classification() {
        assert_eq!(SigningScheme::of(Algorithm::HS256), SigningScheme::Symmetric);
        assert_eq!(SigningScheme::of(Algorithm::HS512), SigningScheme::Symmetric);
        assert_eq!(SigningScheme::of(Algorithm::RS256), SigningScheme::Asymmetric);
        assert_eq!(SigningScheme::of(Algorithm::ES256), SigningScheme::Asymmetric);
        assert_eq!(SigningScheme::of(Algorithm::EdDSA), SigningScheme::Asymmetric);
    }

    #[tokio::test]
    async fn test_valid_symmetric_token_defaults_role() {
        let token = sign_hs256(valid_claims(), SECRET);

        let identity = symmetric_verifier().verify(&token).await.unwrap();
        assert_eq!(identity.id, "8f14e45f-ceea-4e7a-9c1b-2a3b4c5d6e7f");
        assert_eq!(identity.email.as_deref(), Some("admin@example.com"));
        assert_eq!(identity.role, "user");
    }

    #[tokio::test]
    async fn test_role_claim_is_kept() {
        let mut claims = valid_claims();
        claims["role"] = json!("authenticated");
        let token = sign_hs256(claims, SECRET);

        let identity = symmetric_verifier().verify(&token).await.unwrap();
        assert_eq!(identity.role, "authenticated");
    }

    #[tokio::test]
    async fn test_empty_token_fails_fast() {
        let err = symmetric_verifier().verify("   ").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let err = symmetric_verifier().verify("not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert!(err.to_string().starts_with("Invalid token: "));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let mut claims = valid_claims();
        claims["exp"] = json!((Utc::now() - Duration::hours(1)).timestamp());
        let token = sign_hs256(claims, SECRET);

        let err = symmetric_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Expired));
        assert_eq!(err.to_string(), "Token has expired");
    }

    #[tokio::test]
    async fn test_missing_subject() {
        let mut claims = valid_claims();
        claims.as_object_mut().unwrap().remove("sub");
        let token = sign_hs256(claims, SECRET);

        let err = symmetric_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingSubject));
        assert_eq!(err.to_string(), "Invalid authentication token");

        let mut claims = valid_claims();
        claims["sub"] = json!("");
        let token = sign_hs256(claims, SECRET);
        assert!(matches!(
            symmetric_verifier().verify(&token).await,
            Err(AuthError::MissingSubject)
        ));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_invalid_signature() {
        let token = sign_hs256(valid_claims(), "a-completely-different-secret");

        let err = symmetric_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_wrong_audience_is_invalid() {
        let mut claims = valid_claims();
        claims["aud"] = json!("anon");
        let token = sign_hs256(claims, SECRET);

        let err = symmetric_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_asymmetric_token_without_key_set_does_not_fall_back() {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some("test-key-primary".to_string());
        let token = encode(
            &header,
            &valid_claims(),
            &EncodingKey::from_rsa_pem(RSA_PEM.as_bytes()).unwrap(),
        )
        .unwrap();

        let err = symmetric_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::NoVerificationMethod(Algorithm::RS256)
        ));
    }

    #[tokio::test]
    async fn test_symmetric_token_without_secret() {
        let verifier = TokenVerifier::new(KeySource::default(), &auth_config());
        let token = sign_hs256(valid_claims(), SECRET);

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::NoVerificationMethod(Algorithm::HS256)
        ));
    }

    #[test]
    fn test_errors_map_to_api_errors() {
        let api: ApiError = AuthError::Expired.into();
        assert_eq!(api.error, "AuthenticationError");
        assert_eq!(api.message, "Token has expired");

        let api: ApiError = AuthError::KeySourceUnavailable("timeout".to_string()).into();
        assert_eq!(api.error, "ServiceUnavailable");
    }
}

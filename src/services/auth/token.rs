use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::AccessTokenKey;
use crate::services::auth::IdentityRecord;

/// Why a bearer token could not be read.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("access token expired")]
    Expired,
    #[error("invalid access token signature")]
    InvalidSignature,
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("jwt verification failed: {0}")]
    Jwt(jsonwebtoken::errors::Error),
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Jwt(e),
        }
    }
}

/// Reads and checks bearer tokens for the authentication gate.
///
/// Implementations are shared by every in-flight request.
pub trait TokenService: Send + Sync {
    /// Verify `token` and return the subject it was issued for.
    fn extract_subject(&self, token: &str) -> Result<String, TokenError>;

    /// Whether `token` is intact, unexpired and issued for exactly `identity`.
    fn is_valid(&self, token: &str, identity: &IdentityRecord) -> bool;
}

#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    // `exp` is enforced by `Validation`; only the subject is read back.
    sub: String,
}

/// JWT access-token verifier (HS256 shared secret or EdDSA public key).
#[derive(Clone)]
pub struct JwtTokenService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtTokenService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtTokenService {
    pub fn new(
        key: &AccessTokenKey,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, TokenError> {
        let (decoding_key, algorithm) = match key {
            AccessTokenKey::Ed25519PublicPem(pem) => (
                DecodingKey::from_ed_pem(pem.as_bytes())
                    .map_err(|e| TokenError::InvalidKey(e.to_string()))?,
                Algorithm::EdDSA,
            ),
            AccessTokenKey::HmacSecret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = leeway_seconds;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }

        Ok(data.claims)
    }
}

impl TokenService for JwtTokenService {
    fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|claims| claims.sub)
    }

    fn is_valid(&self, token: &str, identity: &IdentityRecord) -> bool {
        match self.verify(token) {
            Ok(claims) if claims.sub == identity.subject => true,
            Ok(claims) => {
                debug!(
                    token_subject = %claims.sub,
                    identity_subject = %identity.subject,
                    "token subject does not match resolved identity"
                );
                false
            }
            Err(err) => {
                debug!(error = %err, "token failed re-verification");
                false
            }
        }
    }
}

//! Test doubles shared by the auth unit tests.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::config::AccessTokenKey;
use crate::middleware::auth::AuthGate;
use crate::repos::error::RepoError;
use crate::services::auth::identity::{IdentityLookup, IdentityRecord, LookupError};
use crate::services::auth::{JwtTokenService, PublicPaths};

pub const SECRET: &str = "rota-test-secret";

/// HS256 verifier for tokens minted with `SECRET`, no leeway.
pub fn token_service() -> Arc<JwtTokenService> {
    Arc::new(
        JwtTokenService::new(&AccessTokenKey::HmacSecret(SECRET.into()), None, None, 0).unwrap(),
    )
}

/// Gate with the default public prefix `/auth`.
pub fn auth_gate(identities: Arc<dyn IdentityLookup>) -> AuthGate {
    AuthGate::new(token_service(), identities, PublicPaths::new(["/auth"]))
}

/// HS256 token for `sub`, valid for ten minutes.
pub fn mint(sub: &str) -> String {
    mint_with(
        SECRET,
        serde_json::json!({
            "sub": sub,
            "iat": chrono::Utc::now().timestamp(),
            "exp": chrono::Utc::now().timestamp() + 600,
        }),
    )
}

pub fn mint_with(secret: &str, claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// In-memory identity lookup that counts how often it was asked.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    records: HashMap<String, IdentityRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(self, record: IdentityRecord) -> Self {
        let key = record.subject.clone();
        self.with_entry(&key, record)
    }

    /// Answer lookups for `subject` with `record`, whatever its own subject is.
    pub fn with_entry(mut self, subject: &str, record: IdentityRecord) -> Self {
        self.records.insert(subject.to_string(), record);
        self
    }

    /// Every lookup fails as if the database were down.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for StaticDirectory {
    async fn resolve(&self, subject: &str) -> Result<IdentityRecord, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(LookupError::Repo(RepoError::Db(sqlx::Error::PoolTimedOut)));
        }

        self.records
            .get(subject)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(subject.to_string()))
    }
}

//! Identity lookup: token subject → identity record with granted authorities.
use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::repos::{error::RepoError, user_repo};

/// An identity the gate can authenticate as.
///
/// Loaded fresh for every request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub subject: String,
    pub authorities: BTreeSet<String>,
}

impl IdentityRecord {
    pub fn new<I, A>(subject: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            subject: subject.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unknown subject: {0}")]
    NotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Resolves a token subject to its identity record.
///
/// Must be safe to call from many requests at once.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn resolve(&self, subject: &str) -> Result<IdentityRecord, LookupError>;
}

/// Identity lookup backed by the `users` table.
#[derive(Clone, Debug)]
pub struct UserDirectory {
    db: PgPool,
}

impl UserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityLookup for UserDirectory {
    async fn resolve(&self, subject: &str) -> Result<IdentityRecord, LookupError> {
        let row = user_repo::find_by_email(&self.db, subject)
            .await?
            .ok_or_else(|| LookupError::NotFound(subject.to_string()))?;

        Ok(IdentityRecord::new(row.email, [role_authority(&row.role)]))
    }
}

// Role column value → granted authority label, e.g. `manager` → `ROLE_MANAGER`.
pub fn role_authority(role: &str) -> String {
    format!("ROLE_{}", role.trim().to_ascii_uppercase())
}

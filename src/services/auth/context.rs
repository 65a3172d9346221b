//! Per-request security context.
//!
//! The authenticated principal lives in the request's own `Extensions`, so it
//! is never shared between requests and needs no locking. It is written at
//! most once; absence means the request is anonymous.
use std::collections::BTreeSet;
use std::net::SocketAddr;

use axum::http::Extensions;
use chrono::{DateTime, Utc};

use crate::services::auth::IdentityRecord;

/// Where the authenticated request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    pub remote_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
}

/// The identity the current request is authenticated as.
#[derive(Debug, Clone)]
pub struct Principal {
    pub identity: IdentityRecord,
    pub authenticated_at: DateTime<Utc>,
    pub details: RequestDetails,
}

impl Principal {
    pub fn new(identity: IdentityRecord, details: RequestDetails) -> Self {
        Self {
            identity,
            authenticated_at: Utc::now(),
            details,
        }
    }

    pub fn subject(&self) -> &str {
        &self.identity.subject
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.identity.authorities
    }
}

/// Principal already attached to the request, if any.
pub fn current(extensions: &Extensions) -> Option<&Principal> {
    extensions.get::<Principal>()
}

/// Attach `principal` to the request unless one is already there.
///
/// Returns the rejected principal when the slot was taken.
pub fn establish(extensions: &mut Extensions, principal: Principal) -> Result<(), Principal> {
    if extensions.get::<Principal>().is_some() {
        return Err(principal);
    }
    extensions.insert(principal);
    Ok(())
}

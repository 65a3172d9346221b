//! Request authentication gate.
//!
//! Runs once per request, before any handler:
//! 1. public path → forward untouched
//! 2. `Authorization: Bearer <token>` → subject → identity → validity check
//! 3. on success, attach a `Principal` to the request extensions
//!
//! Every failure degrades to "anonymous". The gate never answers a request
//! itself; rejecting anonymous callers is up to the `CurrentUser` extractor.
//!
//! Apply it to the top-level router so it sees the full request path.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::services::auth::{
    IdentityLookup, LookupError, Principal, PublicPaths, RequestDetails, TokenService, context,
};

const BEARER_PREFIX: &str = "Bearer ";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Why a request went through without a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousReason {
    /// No `Authorization` header, or `Bearer ` with nothing after it.
    NoCredentials,
    /// Some other scheme, or a header that is not visible ASCII.
    NotBearer,
    /// The token could not be decoded or verified.
    InvalidToken,
    UnknownSubject,
    LookupFailed,
    /// Decodable token that does not hold for the resolved identity.
    TokenRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    PublicPath,
    Anonymous(AnonymousReason),
    AlreadyAuthenticated,
    Authenticated,
}

#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<dyn TokenService>,
    identities: Arc<dyn IdentityLookup>,
    public_paths: Arc<PublicPaths>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("public_paths", &self.public_paths)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(
        tokens: Arc<dyn TokenService>,
        identities: Arc<dyn IdentityLookup>,
        public_paths: PublicPaths,
    ) -> Self {
        Self {
            tokens,
            identities,
            public_paths: Arc::new(public_paths),
        }
    }

    /// Decide whether `req` gets a principal, and attach it if so.
    pub async fn authenticate(&self, req: &mut Request<Body>) -> GateOutcome {
        let path = req.uri().path();

        if self.public_paths.matches(path) {
            debug!(path, "public path, authentication skipped");
            return GateOutcome::PublicPath;
        }

        let token = match bearer_token(req.headers()) {
            Ok(token) => token.to_owned(),
            Err(reason) => {
                debug!(path, ?reason, "no bearer credentials");
                return GateOutcome::Anonymous(reason);
            }
        };
        debug!(path, "bearer token present");

        let subject = match self.tokens.extract_subject(&token) {
            Ok(subject) => subject,
            Err(err) => {
                debug!(path, error = %err, "bearer token rejected");
                return GateOutcome::Anonymous(AnonymousReason::InvalidToken);
            }
        };
        debug!(path, subject = %subject, "subject extracted");

        if context::current(req.extensions()).is_some() {
            debug!(subject = %subject, "request already authenticated");
            return GateOutcome::AlreadyAuthenticated;
        }

        let identity = match self.identities.resolve(&subject).await {
            Ok(identity) => identity,
            Err(LookupError::NotFound(_)) => {
                debug!(subject = %subject, "subject does not resolve to an identity");
                return GateOutcome::Anonymous(AnonymousReason::UnknownSubject);
            }
            Err(err) => {
                warn!(subject = %subject, error = %err, "identity lookup failed");
                return GateOutcome::Anonymous(AnonymousReason::LookupFailed);
            }
        };

        if !self.tokens.is_valid(&token, &identity) {
            debug!(subject = %subject, "token not valid for resolved identity");
            return GateOutcome::Anonymous(AnonymousReason::TokenRejected);
        }

        let principal = Principal::new(identity, request_details(&*req));
        let remote_addr = principal.details.remote_addr;
        let request_id = principal.details.request_id.clone();
        match context::establish(req.extensions_mut(), principal) {
            Ok(()) => {
                debug!(
                    subject = %subject,
                    ?remote_addr,
                    request_id = request_id.as_deref().unwrap_or("-"),
                    "request authenticated"
                );
                GateOutcome::Authenticated
            }
            Err(_) => GateOutcome::AlreadyAuthenticated,
        }
    }
}

/// Token part of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AnonymousReason> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AnonymousReason::NoCredentials)?;

    let value = value.to_str().map_err(|_| AnonymousReason::NotBearer)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AnonymousReason::NotBearer)?;

    if token.is_empty() {
        return Err(AnonymousReason::NoCredentials);
    }

    Ok(token)
}

fn request_details(req: &Request<Body>) -> RequestDetails {
    RequestDetails {
        remote_addr: req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
        request_id: req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}

/// Put the gate in front of every route of `router`.
pub fn apply<S>(router: Router<S>, gate: AuthGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, gate_middleware))
}

async fn gate_middleware(
    State(gate): State<AuthGate>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = gate.authenticate(&mut req).await;
    tracing::trace!(?outcome, "authentication gate finished");

    next.run(req).await
}

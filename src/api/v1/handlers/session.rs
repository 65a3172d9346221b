/*
 * Responsibility
 * - GET /api/v1/session: whether the caller's credentials were accepted
 * - Never rejects; anonymous callers get `authenticated: false`
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::MaybeCurrentUser;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub subject: Option<String>,
}

pub async fn session(MaybeCurrentUser(principal): MaybeCurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: principal.is_some(),
        subject: principal.map(|p| p.identity.subject),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::auth::gate;
    use crate::services::auth::IdentityRecord;
    use crate::services::auth::testing::{StaticDirectory, auth_gate, mint};

    fn app() -> Router {
        let directory =
            StaticDirectory::new().with_identity(IdentityRecord::new("user@x.com", ["ROLE_STAFF"]));
        let router = Router::new().route("/session", get(session));
        gate::apply(router, auth_gate(Arc::new(directory)))
    }

    async fn call(authorization: Option<String>) -> serde_json::Value {
        let mut builder = Request::builder().uri("/session");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let res = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn anonymous_caller_is_reported_not_rejected() {
        let body = call(None).await;

        assert_eq!(body["authenticated"], false);
        assert!(body["subject"].is_null());
    }

    #[tokio::test]
    async fn authenticated_caller_sees_own_subject() {
        let body = call(Some(format!("Bearer {}", mint("user@x.com")))).await;

        assert_eq!(body["authenticated"], true);
        assert_eq!(body["subject"], "user@x.com");
    }
}

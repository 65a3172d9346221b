/*
 * Responsibility
 * - URL layout of v1
 * - Authentication is applied once at the top-level router (see app.rs);
 *   handlers that need a user ask for it through `CurrentUser`,
 *   handlers that merely look use `MaybeCurrentUser`
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{me::me, session::session};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/session", get(session))
}

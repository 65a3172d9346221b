/*
 * Responsibility
 * - GET /api/v1/me: the staff account behind the current principal
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{dto::users::CurrentUserResponse, extractors::CurrentUser},
    error::AppError,
    repos::user_repo,
    state::AppState,
};

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<CurrentUserResponse>, AppError> {
    // The row can disappear between authentication and this read.
    let row = user_repo::find_by_email(&state.db, principal.subject())
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(CurrentUserResponse::new(row, &principal)))
}

/*
 * Responsibility
 * - Users response DTOs
 * - Mapping from the repo row (internal columns stay internal)
 * - /me adds what the authentication gate established for this request
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repos::user_repo::UserRow;
use crate::services::auth::Principal;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role.trim().to_ascii_uppercase(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub authorities: Vec<String>,
    pub authenticated_at: DateTime<Utc>,
}

impl CurrentUserResponse {
    pub fn new(row: UserRow, principal: &Principal) -> Self {
        Self {
            user: row.into(),
            authorities: principal.authorities().iter().cloned().collect(),
            authenticated_at: principal.authenticated_at,
        }
    }
}

/*
 * Responsibility
 * - Read access to the users table (staff accounts) via SQLx
 * - Lookups are keyed by email, which is also the token subject
 */
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
    #[sqlx(rename = "firstName")]
    pub first_name: String,
    #[sqlx(rename = "lastName")]
    pub last_name: String,
    pub role: String,
}

pub async fn find_by_email(db: &PgPool, email: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", email, "firstName", "lastName", role
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

#[cfg(test)]
pub async fn insert(
    db: &PgPool,
    email: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, "firstName", "lastName", role)
        VALUES ($1, $2, $3, $4)
        RETURNING "userId", email, "firstName", "lastName", role
        "#,
    )
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .fetch_one(db)
    .await?;

    Ok(row)
}

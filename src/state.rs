/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone (PgPool is Arc inside)
 */
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
}

impl AppState {
    pub fn new(db: sqlx::PgPool) -> Self {
        Self { db }
    }
}

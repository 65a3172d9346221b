/// Factory: build the authentication collaborators from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::{
    IdentityLookup, JwtTokenService, PublicPaths, TokenError, TokenService, UserDirectory,
};

pub fn build_token_service(config: &Config) -> Result<Arc<dyn TokenService>, TokenError> {
    let service = JwtTokenService::new(
        &config.access_token_key,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(service))
}

pub fn build_identity_lookup(db: PgPool) -> Arc<dyn IdentityLookup> {
    Arc::new(UserDirectory::new(db))
}

pub fn build_public_paths(config: &Config) -> PublicPaths {
    PublicPaths::new(config.public_path_prefixes.iter().cloned())
}

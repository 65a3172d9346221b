/*
 * Responsibility
 * - Tracing + panic hook setup
 * - Config → collaborators (pool, token service, identity lookup) → Router
 * - Middleware order: http (outermost) → authentication gate → routes
 * - axum::serve() with peer addresses for the gate
 */
use std::net::SocketAddr;
use std::{panic, process};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware::{self, auth::AuthGate};
use crate::services::auth::factory;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,rota_api=trace
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,rota_api=debug,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    let gate = build_gate(&config, db.clone())?;
    let app = build_router(AppState::new(db), gate, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_gate(config: &Config, db: sqlx::PgPool) -> Result<AuthGate> {
    let tokens =
        factory::build_token_service(config).context("failed to build the token service")?;
    let identities = factory::build_identity_lookup(db);
    let public_paths = factory::build_public_paths(config);

    tracing::info!(?public_paths, "authentication gate configured");

    Ok(AuthGate::new(tokens, identities, public_paths))
}

fn build_router(state: AppState, gate: AuthGate, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::auth::gate::apply(router, gate);
    middleware::http::apply(router, config)
}

//! # Taskflow API Server
//!
//! Multi-tenant project and task tracker: users own projects, invite
//! members by email, and collaborate on tasks and comments.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskflow JWT_SECRET=... cargo run -p taskflow-api
//! DATABASE_URL=memory:// JWT_SECRET=... cargo run -p taskflow-api
//! ```
//!
//! Set `LOG_FORMAT=json` for one JSON object per log line.

use std::sync::Arc;

use taskflow_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskflow_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{MemoryStore, PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskflow_api=debug,taskflow_shared=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(
        "Taskflow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let (store, pg): (Arc<dyn Store>, Option<Arc<PgStore>>) = if config.database.is_memory() {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        (Arc::new(MemoryStore::new()) as Arc<dyn Store>, None)
    } else {
        ensure_database_exists(&config.database.url).await?;

        let pool = create_pool(DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..DatabaseConfig::default()
        })
        .await?;

        run_migrations(&pool).await?;

        let pg = Arc::new(PgStore::new(pool));
        (pg.clone() as Arc<dyn Store>, Some(pg))
    };

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = pg {
        close_pool(pg.pool().clone()).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

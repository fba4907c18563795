//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, click worker lifecycle, and the Axum
//! server with graceful shutdown.

use crate::config::Config;
use crate::domain::click_queue::ClickQueue;
use crate::domain::click_worker::ClickWorkerPool;
use crate::domain::repositories::{ClickSink, LinkStore};
use crate::infrastructure::persistence::{
    InMemoryClickSink, InMemoryLinkStore, PgClickSink, PgLinkStore,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Link store and click sink selected at startup.
pub struct Stores {
    pub links: Arc<dyn LinkStore>,
    pub clicks: Arc<dyn ClickSink>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            links: Arc::new(InMemoryLinkStore::new()),
            clicks: Arc::new(InMemoryClickSink::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            links: Arc::new(PgLinkStore::new(pool.clone())),
            clicks: Arc::new(PgClickSink::new(pool)),
        }
    }
}

/// Opens a PostgreSQL pool sized by the configuration.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Selects PostgreSQL stores when `DATABASE_URL` is set, in-memory otherwise.
async fn init_stores(config: &Config) -> Result<Stores> {
    match config.database_url {
        Some(ref database_url) => {
            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            run_migrations(&pool).await?;
            tracing::info!("Migrations applied");

            Ok(Stores::postgres(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores; data is lost on restart");
            Ok(Stores::in_memory())
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store and click sink (PostgreSQL or in-memory)
/// - Click queue and worker pool
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, in-flight
/// requests finish, then the click queue is closed and drained within
/// `CLICK_DRAIN_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = init_stores(&config).await?;

    let click_queue = ClickQueue::new(config.click_queue_capacity);
    let workers = ClickWorkerPool::start(
        config.click_worker_count,
        click_queue.clone(),
        stores.clicks.clone(),
    );

    let state = AppState::new(
        stores.links,
        stores.clicks,
        click_queue,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    let report = workers.shutdown(config.click_drain_timeout()).await;
    if report.timed_out {
        tracing::warn!(
            abandoned = report.abandoned,
            "Shutdown finished with unsaved clicks"
        );
    }

    served.context("Server error")?;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on CTRL+C or SIGTERM.
///
/// If a handler cannot be installed, that signal is ignored and the other
/// one still triggers shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

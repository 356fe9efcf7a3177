/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → Storage 選択 (Postgres / in-memory) → Handlers 生成
 * - REST Router (+ /metrics) と RPC Router の組み立て、middleware の適用
 * - 2 つの listener を起動し、シグナルで揃って graceful shutdown
 */
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StorageBackend};
use crate::metrics::RequestMetrics;
use crate::repos::{InMemoryStorage, PgStorage, Storage};
use crate::services::TodoService;
use crate::services::auth::{CredentialHasher, build_token_codec};
use crate::state::AppState;
use crate::{api, middleware, rpc};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,todo_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
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

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {} (rpc on {}, storage {:?})",
        config.app_env,
        config.addr,
        config.rpc_addr,
        config.storage_backend
    );

    let storage = build_storage(&config).await?;
    let state = build_state(&config, storage)?;

    let http_app = build_router(state.clone(), &config);
    let rpc_app = build_rpc_router(state, &config);

    let http_listener = TcpListener::bind(config.addr).await?;
    let rpc_listener = TcpListener::bind(config.rpc_addr).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let http = axum::serve(http_listener, http_app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
    let rpc = axum::serve(rpc_listener, rpc_app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx));

    tokio::try_join!(http.into_future(), rpc.into_future())?;

    tracing::info!("server stopped");
    Ok(())
}

pub async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match (config.storage_backend, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(url)) => {
            let pg = PgStorage::connect(url, config.database_max_connections).await?;
            Ok(Arc::new(pg))
        }
        (StorageBackend::Postgres, None) => anyhow::bail!("DATABASE_URL is required for postgres"),
        (StorageBackend::Memory, _) => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryStorage::new()))
        }
    }
}

/// Build process-level services and inject them into the shared application state.
pub fn build_state(config: &Config, storage: Arc<dyn Storage>) -> Result<AppState> {
    let service = TodoService::new(
        storage,
        CredentialHasher::new(),
        build_token_codec(config),
        config.user_scope,
    );

    Ok(AppState::new(Arc::new(service), RequestMetrics::new()?))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let metrics = state.metrics.clone();
    let router = Router::new()
        .route("/metrics", get(api::metrics::scrape))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::metrics::apply(router, metrics, "http");
    let router = middleware::cors::apply(router, config.app_env, &config.cors_allowed_origins);
    middleware::http::apply(router, request_timeout(config))
}

pub fn build_rpc_router(state: AppState, config: &Config) -> Router {
    let metrics = state.metrics.clone();
    let router = middleware::metrics::apply(rpc::routes(state), metrics, "rpc");
    middleware::http::apply(router, request_timeout(config))
}

fn request_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.request_timeout_seconds)
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

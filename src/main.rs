use std::net::SocketAddr;

use drowsiness_api::config::Config;
use drowsiness_api::logging::{init_tracing, LogConfig};
use drowsiness_api::model::load_pool;
use drowsiness_api::routes::build_router;
use drowsiness_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig::from(&config));
    tracing::info!(?config, "Starting drowsiness-api");

    // 模型加载失败时服务无法工作，直接退出
    let pool = match load_pool(&config.model) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load landmark models");
            std::process::exit(1);
        }
    };
    tracing::info!(pool_size = pool.size(), "Landmark models loaded");

    let state = AppState::new(pool, &config);
    let app = match build_router(state) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(origin = %config.cors_origin, error = %e, "Invalid CORS_ORIGIN");
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, debug = config.debug, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}

//! Awards portal server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use awards_api::{AppState, auth_middleware, router as api_router};
use awards_common::{Config, StorageConfig, build_storage};
use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "awards=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting awards portal server...");

    let config = Config::load()?;

    let db = awards_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    awards_db::migrate(&db).await?;
    info!("Migrations completed");

    let storage = build_storage(&config.storage).await?;
    let state = AppState::new(Arc::new(db), storage, &config);
    info!(
        admins = state.admin_directory.len(),
        "Review access configured"
    );

    let mut app = Router::new().nest("/api", api_router());

    // Local uploads are served by this process; S3 serves its own.
    if let StorageConfig::Local {
        base_path,
        base_url,
    } = &config.storage
        && base_url.starts_with('/')
    {
        info!(path = %base_path.display(), url = %base_url, "Serving local uploads");
        app = app.nest_service(base_url, ServeDir::new(base_path));
    }

    let app = app
        .layer(middleware::from_fn(auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

use clap::Parser;
use comments::{DefaultCommentService, PgCommentRepository};
use common::Config;
use database::Database;
use films::{DefaultFilmService, PgFilmRepository};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;
mod router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 1. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Load Config from CLI args / environment
    let config = Config::parse();

    // 3. Initialize Database
    let db_config = config.database();
    let db = Database::new(&db_config).await.inspect_err(|e| {
        tracing::error!(error = %e, host = %db_config.host, port = db_config.port, "Failed to connect to database");
    })?;
    db.ping().await?;
    tracing::info!("Successfully connected to database");

    db.run_migrations().await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to run database migrations");
    })?;

    // 4. Wire repositories -> services
    let film_repository = Arc::new(PgFilmRepository::new(db.clone()));
    let comment_repository = Arc::new(PgCommentRepository::new(db.clone()));

    let film_service = Arc::new(DefaultFilmService::new(film_repository.clone()));
    let comment_service = Arc::new(DefaultCommentService::new(comment_repository, film_repository));

    // 5. Routing
    let app = router::build_router(film_service, comment_service, config.request_timeout());

    // 6. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting Mockbuster Movie API server on {}", addr);
    tracing::info!("API Base URL: http://localhost:{}/api/v1", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}

use anyhow::Context;
use tokio::net::TcpListener;

use crate::app::{app, AppState};
use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, DrinkRepository};

pub async fn handle(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::ensure_schema(&pool).await?;

    let verifier = TokenVerifier::from_config(&config.auth)?;
    let state = AppState::new(DrinkRepository::new(pool.clone()), verifier);
    let router = app(state, &config.security);

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Drinks API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

//! rental-server 启动入口

use std::time::Duration;

use rental_server::{AppState, Config, build_app, init_logger, orders};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        database = %config.database_url,
        "Starting rental-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if config.is_development() {
        tracing::warn!("Development mode: unset secrets fall back to built-in defaults");
    }

    let state = AppState::new(config.clone()).await?;

    if config.temp_order_cleanup_secs > 0 {
        spawn_temp_order_cleanup(state.clone(), config.temp_order_cleanup_secs);
    }

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("rental-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("rental-server stopped");
    Ok(())
}

/// 定期清理过期预订单
fn spawn_temp_order_cleanup(state: AppState, period_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(period_secs));
        loop {
            interval.tick().await;
            if let Err(e) = orders::cleanup_expired(&state.pool).await {
                tracing::error!(error = ?e, "Periodic pre-order cleanup failed");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

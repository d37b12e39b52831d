use anyhow::Context;
use todo_service::{HttpTransport, ServerConfig, SqliteStorage, TodoStorage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "tracing")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
            .init();
    }

    let config = ServerConfig::from_env()?;
    let storage = SqliteStorage::new(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let storage = Arc::new(storage);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to listen on {}", config.bind_addr()))?;
    println!("Server started on http://{}", config.bind_addr());

    let http_transport = HttpTransport::new(storage.clone(), config.http());
    let served = http_transport.serve_with_shutdown(listener, shutdown_signal()).await;
    storage.close().await;
    served.context("received error from running server")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    #[cfg(feature = "tracing")]
    tracing::info!("Shutdown signal received");
}

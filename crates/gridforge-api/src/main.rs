use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use gridforge_api::{router, AppState};
use gridforge_store::{Store, StoreConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_root = std::env::var("GRIDFORGE_DATA_ROOT").unwrap_or_else(|_| "data".to_string());
    let bind_addr =
        std::env::var("GRIDFORGE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());

    let store = Store::open(StoreConfig::at(&data_root))
        .with_context(|| format!("opening store at {data_root}"))?;
    let app = router(AppState::new(store));

    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("parsing GRIDFORGE_BIND_ADDR: {bind_addr}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %data_root, "gridforge-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

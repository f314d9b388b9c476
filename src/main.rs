use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
mod app;
mod config;
mod error;
mod models;
mod receiver;
mod relay;
mod routes;
mod store;

use receiver::DatagramReceiver;
use relay::RelayClient;
use store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_thread_names(true).init();

    // Load configuration
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;
    info!(base_dir = %cfg.base_dir.display(), "Starting form relay");

    // Datagram receiver owns the record store for the lifetime of the process
    let receiver = DatagramReceiver::bind(&cfg.udp_addr(), cfg.datagram_buffer_size).await?;
    let store = RecordStore::new(cfg.storage_file());
    info!(
        addr = %receiver.local_addr()?,
        store = %store.path().display(),
        "Datagram receiver listening"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let receiver_task = tokio::spawn(async move {
        if let Err(e) = receiver.run(store, shutdown_rx).await {
            error!(error = %e, "Datagram receiver failed");
        }
    });

    let relay = RelayClient::new(cfg.udp_addr());
    let app = app::build_router(cfg.clone(), relay);

    let listener = TcpListener::bind((cfg.http_host.as_str(), cfg.http_port))
        .await
        .with_context(|| format!("failed to bind HTTP on {}:{}", cfg.http_host, cfg.http_port))?;
    info!(addr = %listener.local_addr()?, "Listening on");

    // Server with graceful shutdown
    let server = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!(error = %e, "Server error");
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = receiver_task.await {
        error!(error = %e, "Datagram receiver task panicked");
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#![doc = include_str!("../README.md")]

mod server;

use anyhow::Context;
use clap::Parser;
use flakebatch::{AtomicSnowflakeGenerator, Backoff, IdSource, MonotonicClock, SnowflakeSource};
use server::config::{CliArgs, ServerConfig};
use server::service::{AppState, router};
use server::telemetry::{init_telemetry, shutdown_telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;

    // The one generator for the whole process. Every request shares it
    // through `AppState`.
    let clock = MonotonicClock::new()?;
    let generator = AtomicSnowflakeGenerator::new(config.machine_id, clock)?;
    let source: Arc<dyn IdSource> = Arc::new(
        SnowflakeSource::new(generator, Backoff::Yield).with_max_attempts(config.max_attempts),
    );
    let app = router(AppState::new(source, config.max_count));

    let listener = TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?;
    log_startup_info(listener.local_addr()?, &config);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            // The server stopped on its own, which only happens on error.
            shutdown_telemetry(providers);
            joined??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(config.shutdown_timeout, server).await {
        Ok(joined) => joined??,
        Err(_) => tracing::warn!(
            "Graceful drain timed out after {:?}, exiting",
            config.shutdown_timeout
        ),
    }

    tracing::info!("Service shut down successfully");
    shutdown_telemetry(providers);
    Ok(())
}

fn log_startup_info(addr: SocketAddr, config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting ID service on {} with full config: {:#?}",
            addr,
            config
        );
    } else {
        tracing::info!(
            "Starting ID service on {} (machine id {}, max count {})",
            addr,
            config.machine_id,
            config.max_count
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }
}

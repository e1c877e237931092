//! Long-running exporter mode.
//!
//! Runs the collector loop and the scrape server side by side. On SIGINT or
//! SIGTERM both are told to stop; the server gets `shutdown_grace` seconds to
//! finish in-flight scrapes before it is aborted.

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use borgmon_core::ExporterConfig;
use borgmon_metrics::{TransactionCollector, TransactionGauges};

pub async fn run_serve(config: ExporterConfig) -> anyhow::Result<()> {
    // ── Sink + collector ───────────────────────────────────────

    let gauges = TransactionGauges::new();
    let collector =
        TransactionCollector::new(config.repos.clone(), config.poll_interval(), gauges.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut server_shutdown = shutdown_tx.subscribe();

    let collector_handle = tokio::spawn(async move {
        collector.run(shutdown_rx).await;
    });

    // ── Scrape server ──────────────────────────────────────────

    let router = borgmon_api::build_router(gauges, &config.endpoint);
    let (host, port) = config.listen_target();
    let listener = bind_listener(host, port).await?;
    let addr = listener.local_addr()?;
    info!(%addr, endpoint = %config.endpoint, "starting Prometheus exporter");

    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.wait_for(|stop| *stop).await;
            })
            .await
    });

    // ── Wait for shutdown ──────────────────────────────────────

    tokio::select! {
        signal = shutdown_signal() => {
            signal?;
            info!("received termination signal, shutting down");
        }
        result = &mut server => {
            // The server only returns on its own after a fatal error.
            let _ = shutdown_tx.send(true);
            let _ = collector_handle.await;
            result??;
            return Ok(());
        }
    }

    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(config.grace_period(), &mut server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!(error = %e, "HTTP server error"),
        Ok(Err(e)) => error!(error = %e, "HTTP server task failed"),
        Err(_) => {
            warn!(
                grace_secs = config.shutdown_grace,
                "HTTP server did not drain in time, aborting"
            );
            server.abort();
        }
    }

    let _ = collector_handle.await;

    info!("exporter stopped");
    Ok(())
}

/// Bind the scrape listener. `host` may be a name; it is resolved here.
async fn bind_listener(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to listen on {host}:{port}"))
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

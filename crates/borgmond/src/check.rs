//! One-shot sweep for ad-hoc inspection and cron-style checks.

use tokio::sync::watch;
use tracing::info;

use borgmon_core::ExporterConfig;
use borgmon_metrics::{render_prometheus, TransactionCollector, TransactionGauges};

pub async fn run_check(config: ExporterConfig) -> anyhow::Result<()> {
    let gauges = TransactionGauges::new();
    let collector =
        TransactionCollector::new(config.repos.clone(), config.poll_interval(), gauges.clone());

    // Never signalled; the sweep always runs to completion.
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let report = collector.sweep(&shutdown_rx).await;
    info!(updated = report.updated, failed = report.failed, "check sweep finished");

    print!("{}", render_prometheus(&gauges.snapshot().await));

    if report.failed > 0 {
        anyhow::bail!(
            "{} of {} repositories could not be read",
            report.failed,
            config.repos.len()
        );
    }
    Ok(())
}

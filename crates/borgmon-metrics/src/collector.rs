//! Transaction collector — periodically sweeps repositories and publishes
//! their last transaction into the gauge sink.
//!
//! Repositories are processed one at a time in configuration order. A
//! failing repository is logged and skipped; it never blocks the others and
//! never clears a value published by an earlier sweep.

use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use borgmon_core::{parse_transaction_line, ParseError, TransactionRecord, TRANSACTIONS_FILE};

use crate::error::CollectError;
use crate::sink::TransactionGauges;

/// Outcome of one sweep over all repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Repositories whose gauges were written.
    pub updated: usize,
    /// Repositories skipped because of an error.
    pub failed: usize,
    /// The sweep stopped early on shutdown.
    pub cancelled: bool,
}

/// Polls a fixed set of repositories and writes results into a
/// [`TransactionGauges`] sink.
pub struct TransactionCollector {
    repos: Vec<String>,
    interval: Duration,
    sink: TransactionGauges,
}

impl TransactionCollector {
    /// Create a collector. A zero interval is raised to one millisecond.
    pub fn new(repos: Vec<String>, interval: Duration, sink: TransactionGauges) -> Self {
        Self {
            repos,
            interval: interval.max(Duration::from_millis(1)),
            sink,
        }
    }

    pub fn sink(&self) -> &TransactionGauges {
        &self.sink
    }

    /// Read the last transaction of a single repository.
    ///
    /// Streams `<repo>/transactions` keeping only the last non-empty line,
    /// closes the file, then parses that line. Does not touch the sink.
    pub async fn collect_repository(repo: &str) -> Result<TransactionRecord, CollectError> {
        let path = Path::new(repo).join(TRANSACTIONS_FILE);
        let file = File::open(&path).await.map_err(|source| CollectError::Open {
            repo: repo.to_string(),
            source,
        })?;

        // Raw bytes: only the last line has to be valid UTF-8.
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut last_line = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if !buf.trim_ascii().is_empty() {
                        std::mem::swap(&mut last_line, &mut buf);
                    }
                }
                Err(source) => {
                    return Err(CollectError::Read {
                        repo: repo.to_string(),
                        source,
                    });
                }
            }
        }
        // Release the descriptor before parsing.
        drop(reader);

        let parse_error = |source: ParseError| CollectError::Parse {
            repo: repo.to_string(),
            source,
        };
        let line = std::str::from_utf8(last_line.trim_ascii_end()).map_err(|_| {
            parse_error(ParseError::Malformed {
                line: String::from_utf8_lossy(&last_line).into_owned(),
            })
        })?;
        parse_transaction_line(line).map_err(parse_error)
    }

    /// Run one pass over every repository.
    ///
    /// Shutdown is checked before each repository; entries written before
    /// cancellation are kept.
    pub async fn sweep(&self, shutdown: &watch::Receiver<bool>) -> SweepReport {
        let mut report = SweepReport::default();

        for repo in &self.repos {
            if is_shutdown(shutdown) {
                report.cancelled = true;
                break;
            }

            match Self::collect_repository(repo).await {
                Ok(record) => {
                    self.sink.record(repo, &record).await;
                    report.updated += 1;
                    debug!(
                        %repo,
                        sequence_number = record.sequence_number,
                        timestamp = record.timestamp,
                        "repository metrics updated"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(repo = %e.repo(), error = %e, "skipping repository this sweep");
                }
            }
        }

        report
    }

    /// Sweep immediately, then once per interval until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            repos = self.repos.len(),
            interval_secs = self.interval.as_secs(),
            "transaction collector started"
        );

        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if is_shutdown(&shutdown) {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.sweep(&shutdown).await;
                    debug!(
                        updated = report.updated,
                        failed = report.failed,
                        cancelled = report.cancelled,
                        "sweep finished"
                    );
                    if report.cancelled {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender also ends the loop.
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("transaction collector stopped");
    }
}

fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

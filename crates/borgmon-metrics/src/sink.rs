//! Shared gauge store keyed by repository path.
//!
//! Last write wins per repository and no history is kept. The collector is
//! the only writer; scrape handlers read concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

use borgmon_core::TransactionRecord;

/// Current gauge values for one repository.
///
/// A field stays `None` until the first successful write for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryGauges {
    pub last_timestamp: Option<i64>,
    pub last_sequence_number: Option<u64>,
}

/// Handle to the gauge store. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct TransactionGauges {
    gauges: Arc<RwLock<BTreeMap<String, RepositoryGauges>>>,
}

impl TransactionGauges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the last-transaction timestamp gauge for a repository.
    pub async fn set_timestamp(&self, repo: &str, timestamp: i64) {
        let mut gauges = self.gauges.write().await;
        gauges.entry(repo.to_string()).or_default().last_timestamp = Some(timestamp);
    }

    /// Set the last-transaction number gauge for a repository.
    pub async fn set_sequence_number(&self, repo: &str, sequence_number: u64) {
        let mut gauges = self.gauges.write().await;
        gauges
            .entry(repo.to_string())
            .or_default()
            .last_sequence_number = Some(sequence_number);
    }

    /// Write both gauges from a record under a single lock, so readers
    /// never see one value updated without the other.
    pub async fn record(&self, repo: &str, record: &TransactionRecord) {
        let mut gauges = self.gauges.write().await;
        let entry = gauges.entry(repo.to_string()).or_default();
        entry.last_timestamp = Some(record.timestamp);
        entry.last_sequence_number = Some(record.sequence_number);
        trace!(
            %repo,
            sequence_number = record.sequence_number,
            timestamp = record.timestamp,
            "gauges updated"
        );
    }

    pub async fn get(&self, repo: &str) -> Option<RepositoryGauges> {
        self.gauges.read().await.get(repo).copied()
    }

    /// Copy of every entry, ordered by repository path.
    pub async fn snapshot(&self) -> Vec<(String, RepositoryGauges)> {
        let gauges = self.gauges.read().await;
        gauges.iter().map(|(repo, g)| (repo.clone(), *g)).collect()
    }

    pub async fn len(&self) -> usize {
        self.gauges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.gauges.read().await.is_empty()
    }
}

//! Domain types shared across borgmon crates.

/// Name of the append-only log inside every repository directory.
pub const TRANSACTIONS_FILE: &str = "transactions";

/// The most recent committed transaction of a repository.
///
/// Recomputed on every sweep from the last line of the log; never merged
/// with earlier values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Monotonic transaction number written by borg.
    pub sequence_number: u64,
    /// Commit time in whole seconds since the Unix epoch (UTC).
    pub timestamp: i64,
}

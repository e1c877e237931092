//! borgmon-metrics — transaction metrics for BorgBackup repositories.
//!
//! Sweeps a fixed list of repositories on an interval, reads the last line
//! of each `transactions` log, and publishes the parsed record into a
//! shared gauge sink that the HTTP layer renders for Prometheus.
//!
//! # Architecture
//!
//! ```text
//! TransactionCollector
//!   ├── collect_repository() ← open, stream, keep last line, parse
//!   ├── sweep() → writes successes into TransactionGauges
//!   └── run() → immediate sweep, then one per tick until shutdown
//!
//! TransactionGauges (shared, RwLock)
//!   └── render_prometheus() → text/plain for the scrape endpoint
//! ```

pub mod collector;
pub mod error;
pub mod prometheus;
pub mod sink;

pub use collector::{SweepReport, TransactionCollector};
pub use error::CollectError;
pub use prometheus::render_prometheus;
pub use sink::{RepositoryGauges, TransactionGauges};

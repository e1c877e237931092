//! Prometheus text exposition format.
//!
//! Renders the gauge store for scraping by a Prometheus server or
//! compatible agent.

use crate::sink::RepositoryGauges;

/// Content type for text exposition format 0.0.4.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render gauge entries into Prometheus text format.
///
/// Produces two GAUGE families with a `repo` label. HELP and TYPE lines are
/// emitted even when there are no entries.
pub fn render_prometheus(entries: &[(String, RepositoryGauges)]) -> String {
    let mut out = String::new();

    out.push_str("# HELP borgbackup_last_transaction_timestamp Unix timestamp of the last transaction in the BorgBackup repository\n");
    out.push_str("# TYPE borgbackup_last_transaction_timestamp gauge\n");
    for (repo, g) in entries {
        if let Some(ts) = g.last_timestamp {
            out.push_str(&format!(
                "borgbackup_last_transaction_timestamp{{repo=\"{}\"}} {}\n",
                escape_label_value(repo),
                ts
            ));
        }
    }

    out.push_str("# HELP borgbackup_last_transaction_number Number of the last transaction in the BorgBackup repository\n");
    out.push_str("# TYPE borgbackup_last_transaction_number gauge\n");
    for (repo, g) in entries {
        if let Some(n) = g.last_sequence_number {
            out.push_str(&format!(
                "borgbackup_last_transaction_number{{repo=\"{}\"}} {}\n",
                escape_label_value(repo),
                n
            ));
        }
    }

    out
}

/// Escape `\`, `"` and newlines inside a label value.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

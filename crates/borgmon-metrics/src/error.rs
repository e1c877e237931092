//! Per-repository collection errors.

use borgmon_core::ParseError;
use thiserror::Error;

/// Why a repository produced no record during a sweep.
///
/// Always recovered inside the sweep: logged, then the next repository is
/// processed.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to open transactions file for repo {repo}: {source}")]
    Open {
        repo: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading transactions file for repo {repo}: {source}")]
    Read {
        repo: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse transactions file for repo {repo}: {source}")]
    Parse {
        repo: String,
        #[source]
        source: ParseError,
    },
}

impl CollectError {
    pub fn repo(&self) -> &str {
        match self {
            CollectError::Open { repo, .. }
            | CollectError::Read { repo, .. }
            | CollectError::Parse { repo, .. } => repo,
        }
    }
}

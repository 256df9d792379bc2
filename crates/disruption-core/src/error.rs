use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisruptionError {
    #[error("missing or unreadable marker {}: {reason}", path.display())]
    MissingMarker { path: PathBuf, reason: String },

    #[error("malformed artifact {}: {source}", path.display())]
    MalformedArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt timing in {}: finished {finished} precedes started {started}", run.display())]
    CorruptTiming {
        run: PathBuf,
        started: DateTime<Utc>,
        finished: DateTime<Utc>,
    },

    #[error("unreadable entry name {:?} in {}", name, dir.display())]
    UnreadableEntry { dir: PathBuf, name: OsString },

    #[error("job not cached: {0} (fetch its artifacts first)")]
    JobNotCached(String),

    #[error("job not processed: {0}")]
    JobNotProcessed(String),

    #[error("unknown job {0}: not in the known job list")]
    UnknownJob(String),

    #[error("invalid job name '{0}': must be a single path segment")]
    InvalidJobName(String),

    #[error("processing of job {0} was cancelled")]
    Cancelled(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DisruptionError {
    /// True for the kinds raised while assembling a single run.
    pub fn is_run_level(&self) -> bool {
        matches!(
            self,
            DisruptionError::MissingMarker { .. }
                | DisruptionError::MalformedArtifact { .. }
                | DisruptionError::CorruptTiming { .. }
                | DisruptionError::UnreadableEntry { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DisruptionError>;

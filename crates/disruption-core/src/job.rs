use crate::cancel::CancelFlag;
use crate::error::{DisruptionError, Result};
use crate::event::EventFilter;
use crate::paths;
use crate::run::{assemble_run, Run};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Every run of one periodic CI job, in run directory listing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub runs: Vec<Run>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runs: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Load the snapshot written by the last successful processing pass.
    pub fn load(workdir: &Path, name: &str) -> Result<Self> {
        paths::validate_job_name(name)?;
        let path = paths::snapshot_path(workdir, name);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DisruptionError::JobNotProcessed(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let job: Job = serde_json::from_slice(&data)?;
        Ok(job)
    }

    /// Replace the snapshot for this job in one atomic step.
    pub fn save(&self, workdir: &Path) -> Result<()> {
        paths::validate_job_name(&self.name)?;
        let path = paths::snapshot_path(workdir, &self.name);
        let data = serde_json::to_vec_pretty(self)?;
        crate::io::atomic_write(&path, &data)
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn overlap_count(&self) -> usize {
        self.runs.iter().map(Run::overlap_count).sum()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Assemble every run of `name` found under `raw_root`.
///
/// All or nothing: the first failing run aborts the whole job. `cancel` is
/// checked before each run is started.
pub fn aggregate_job(
    raw_root: &Path,
    name: &str,
    filter: &EventFilter,
    cancel: &CancelFlag,
) -> Result<Job> {
    paths::validate_job_name(name)?;
    let job_dir = paths::raw_job_dir(raw_root, name);
    match std::fs::metadata(&job_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(DisruptionError::JobNotCached(name.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DisruptionError::JobNotCached(name.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let mut job = Job::new(name);
    for id in crate::io::sorted_entries(&job_dir, |t| t.is_dir())? {
        if cancel.is_cancelled() {
            tracing::info!(job = name, completed = job.runs.len(), "aggregation cancelled");
            return Err(DisruptionError::Cancelled(name.to_string()));
        }
        let run = assemble_run(&job_dir.join(&id), &id, filter).inspect_err(|e| {
            tracing::warn!(job = name, run = %id, error = %e, "run assembly failed");
        })?;
        job.runs.push(run);
    }
    Ok(job)
}

/// Aggregate `name` from the workdir's raw tree and persist the snapshot.
///
/// On any error the previous snapshot is left as it was.
pub fn process_job(
    workdir: &Path,
    name: &str,
    filter: &EventFilter,
    cancel: &CancelFlag,
) -> Result<Job> {
    let job = aggregate_job(&paths::raw_root(workdir), name, filter, cancel)?;
    job.save(workdir)?;
    tracing::info!(
        job = name,
        runs = job.runs.len(),
        overlaps = job.overlap_count(),
        "processed job"
    );
    Ok(job)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

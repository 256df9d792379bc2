use crate::error::{DisruptionError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Job names known to exist upstream, as last recorded by job discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownJobs {
    #[serde(alias = "Refresh")]
    pub refresh: DateTime<Utc>,
    #[serde(default, alias = "Jobs")]
    pub jobs: Vec<String>,
}

impl KnownJobs {
    pub fn new(jobs: impl IntoIterator<Item = String>) -> Self {
        let mut known = Self {
            refresh: Utc::now(),
            jobs: Vec::new(),
        };
        known.add(jobs);
        known
    }

    /// Returns `Ok(None)` when no list has been recorded yet.
    pub fn load(workdir: &Path) -> Result<Option<Self>> {
        let path = paths::known_jobs_path(workdir);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    pub fn save(&self, workdir: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        crate::io::atomic_write(&paths::known_jobs_path(workdir), &data)
    }

    /// Merge `names` into the list, keeping it sorted and free of duplicates.
    /// Returns how many names were new.
    pub fn add(&mut self, names: impl IntoIterator<Item = String>) -> usize {
        let mut added = 0;
        for name in names {
            if !self.contains(&name) {
                self.jobs.push(name);
                added += 1;
            }
        }
        // A list written by job discovery may carry its own duplicates.
        self.jobs.sort();
        self.jobs.dedup();
        self.refresh = Utc::now();
        added
    }

    pub fn contains(&self, name: &str) -> bool {
        self.jobs.iter().any(|j| j == name)
    }

    /// Fails with `UnknownJob` when `name` is not in the list.
    pub fn require(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(DisruptionError::UnknownJob(name.to_string()))
        }
    }
}

use crate::error::{DisruptionError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Workdir layout
// ---------------------------------------------------------------------------

/// Raw artifacts cached by the fetch stage: `orig/<job>/<run>/`.
pub const RAW_DIR: &str = "orig";
/// Persisted job snapshots: `processed/<job>.json`.
pub const PROCESSED_DIR: &str = "processed";

pub const CONFIG_FILE: &str = "config.yaml";
pub const KNOWN_JOBS_FILE: &str = "jobs.json";

pub const STARTED_MARKER: &str = "started";
pub const FINISHED_MARKER: &str = "finished";
pub const BATCH_EXTENSION: &str = ".json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn raw_root(workdir: &Path) -> PathBuf {
    workdir.join(RAW_DIR)
}

pub fn raw_job_dir(raw_root: &Path, job: &str) -> PathBuf {
    raw_root.join(job)
}

pub fn processed_dir(workdir: &Path) -> PathBuf {
    workdir.join(PROCESSED_DIR)
}

pub fn snapshot_path(workdir: &Path, job: &str) -> PathBuf {
    processed_dir(workdir).join(format!("{job}.json"))
}

pub fn config_path(workdir: &Path) -> PathBuf {
    workdir.join(CONFIG_FILE)
}

pub fn known_jobs_path(workdir: &Path) -> PathBuf {
    workdir.join(KNOWN_JOBS_FILE)
}

// ---------------------------------------------------------------------------
// Job name validation
// ---------------------------------------------------------------------------

static JOB_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn job_name_re() -> &'static Regex {
    JOB_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap())
}

/// Job names become path segments under both the raw and processed trees.
pub fn validate_job_name(name: &str) -> Result<()> {
    if name.len() > 255 || !job_name_re().is_match(name) {
        return Err(DisruptionError::InvalidJobName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_job_names() {
        for name in [
            "periodic-ci-openshift-release-master-ci-4.11-e2e-aws-upgrade-ovn-single-node",
            "a",
            "job_1.x",
        ] {
            validate_job_name(name).unwrap_or_else(|_| panic!("expected valid: {name}"));
        }
    }

    #[test]
    fn invalid_job_names() {
        for name in ["", ".", "..", "../etc", "a/b", "-dash", "has space", ".hidden"] {
            assert!(validate_job_name(name).is_err(), "expected invalid: {name}");
        }
    }

    #[test]
    fn path_helpers() {
        let workdir = Path::new("/tmp/wd");
        assert_eq!(
            snapshot_path(workdir, "job-a"),
            PathBuf::from("/tmp/wd/processed/job-a.json")
        );
        assert_eq!(
            raw_job_dir(&raw_root(workdir), "job-a"),
            PathBuf::from("/tmp/wd/orig/job-a")
        );
        assert_eq!(known_jobs_path(workdir), PathBuf::from("/tmp/wd/jobs.json"));
    }
}

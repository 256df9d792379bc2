use crate::error::Result;
use crate::job::Job;
use crate::merge::Interval;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One run's intervals for a single metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetric {
    pub run_id: String,
    pub started: DateTime<Utc>,
    pub total_run_duration_sec: f64,
    /// Empty when the run never reported this metric.
    pub intervals: Vec<Interval>,
}

impl RunMetric {
    pub fn disruption_sec(&self) -> f64 {
        self.intervals.iter().map(|i| i.duration_sec).sum()
    }
}

/// Cross-run history of one metric, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetric {
    pub name: String,
    pub metric: String,
    pub runs: Vec<RunMetric>,
}

/// Sorted, duplicate-free locators observed across every run of `job`.
pub fn metric_names(job: &Job) -> Vec<String> {
    job.runs
        .iter()
        .flat_map(|r| r.events.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reshape `job` around a single metric, one entry per run in stored order.
pub fn project_metric(job: &Job, metric: &str) -> JobMetric {
    let runs = job
        .runs
        .iter()
        .map(|r| RunMetric {
            run_id: r.id.clone(),
            started: r.started,
            total_run_duration_sec: r.duration_sec,
            intervals: r
                .events
                .get(metric)
                .map(|e| e.intervals.clone())
                .unwrap_or_default(),
        })
        .collect();

    JobMetric {
        name: job.name.clone(),
        metric: metric.to_string(),
        runs,
    }
}

pub fn load_metric_names(workdir: &Path, job: &str) -> Result<Vec<String>> {
    Ok(metric_names(&Job::load(workdir, job)?))
}

pub fn load_job_metric(workdir: &Path, job: &str, metric: &str) -> Result<JobMetric> {
    Ok(project_metric(&Job::load(workdir, job)?, metric))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

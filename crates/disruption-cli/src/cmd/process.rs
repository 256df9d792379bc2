use crate::output::{print_json, print_table};
use anyhow::Context;
use disruption_core::{
    cancel::CancelFlag, config::Config, job::process_job, metric::metric_names, paths,
};
use std::path::Path;

#[derive(serde::Serialize)]
struct ProcessSummary {
    job: String,
    runs: usize,
    metrics: usize,
    overlaps: usize,
    snapshot: String,
}

pub fn run(workdir: &Path, jobs: Vec<String>, all: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(workdir).context("failed to load config")?;
    let names = if all { config.jobs.clone() } else { jobs };
    if names.is_empty() {
        anyhow::bail!("no jobs to process: name them, or use --all with jobs listed in config.yaml");
    }

    // One-shot runs are never cancelled; the flag only matters for `serve`.
    let cancel = CancelFlag::new();
    let mut summaries = Vec::with_capacity(names.len());
    for name in &names {
        let job = process_job(workdir, name, &config.filter, &cancel)
            .with_context(|| format!("failed to process job '{name}'"))?;
        summaries.push(ProcessSummary {
            job: job.name.clone(),
            runs: job.runs.len(),
            metrics: metric_names(&job).len(),
            overlaps: job.overlap_count(),
            snapshot: paths::snapshot_path(workdir, name).display().to_string(),
        });
    }

    if json {
        return print_json(&summaries);
    }

    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.job.clone(),
                s.runs.to_string(),
                s.metrics.to_string(),
                s.overlaps.to_string(),
            ]
        })
        .collect();
    print_table(&["JOB", "RUNS", "METRICS", "OVERLAPS"], &rows);
    Ok(())
}

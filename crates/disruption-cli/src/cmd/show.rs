use crate::output::{format_secs, print_json, print_table};
use anyhow::Context;
use disruption_core::job::Job;
use std::path::Path;

pub fn run(workdir: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let job = Job::load(workdir, name).with_context(|| format!("failed to load job '{name}'"))?;

    if json {
        return print_json(&job);
    }

    if job.runs.is_empty() {
        println!("{}: no runs.", job.name);
        return Ok(());
    }

    println!("{}", job.name);
    let rows: Vec<Vec<String>> = job
        .runs
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.started.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                format_secs(r.duration_sec),
                r.events.len().to_string(),
                format_secs(r.total_disruption_sec()),
            ]
        })
        .collect();
    print_table(&["RUN", "STARTED", "DURATION", "METRICS", "DISRUPTED"], &rows);
    Ok(())
}

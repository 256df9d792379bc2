use crate::output::{format_secs, print_json, print_table};
use anyhow::Context;
use disruption_core::metric::{load_job_metric, load_metric_names};
use std::path::Path;

pub fn list(workdir: &Path, job: &str, json: bool) -> anyhow::Result<()> {
    let metrics = load_metric_names(workdir, job)
        .with_context(|| format!("failed to load job '{job}'"))?;

    if json {
        return print_json(&serde_json::json!({ "name": job, "metrics": metrics }));
    }

    if metrics.is_empty() {
        println!("No disruption metrics recorded for {job}.");
    } else {
        for m in metrics {
            println!("{m}");
        }
    }
    Ok(())
}

pub fn show(workdir: &Path, job: &str, metric: &str, json: bool) -> anyhow::Result<()> {
    let projected = load_job_metric(workdir, job, metric)
        .with_context(|| format!("failed to load job '{job}'"))?;

    if json {
        return print_json(&projected);
    }

    println!("{} / {}", projected.name, projected.metric);
    let rows: Vec<Vec<String>> = projected
        .runs
        .iter()
        .map(|r| {
            let spans: Vec<String> = r
                .intervals
                .iter()
                .map(|i| format!("+{}..+{}", format_secs(i.start_offset_sec), format_secs(i.end_offset_sec)))
                .collect();
            vec![
                r.run_id.clone(),
                r.started.format("%Y-%m-%d %H:%M").to_string(),
                format_secs(r.total_run_duration_sec),
                format_secs(r.disruption_sec()),
                spans.join(" "),
            ]
        })
        .collect();
    print_table(&["RUN", "STARTED", "DURATION", "DISRUPTED", "INTERVALS"], &rows);
    Ok(())
}

use disruption_core::cancel::CancelFlag;
use disruption_core::config::Config;
use disruption_core::job::process_job;
use std::path::PathBuf;
use std::time::Duration;

/// One pass over every configured job. Failures are logged and the pass
/// moves on to the next job; a cancellation stops the pass.
pub async fn reprocess_all(workdir: PathBuf, config: Config, cancel: CancelFlag) {
    for name in config.jobs {
        if cancel.is_cancelled() {
            return;
        }
        let (wd, filter, flag, job) = (
            workdir.clone(),
            config.filter.clone(),
            cancel.clone(),
            name.clone(),
        );
        let result =
            tokio::task::spawn_blocking(move || process_job(&wd, &job, &filter, &flag)).await;
        match result {
            Ok(Ok(job)) => tracing::info!(job = %name, runs = job.runs.len(), "re-processed job"),
            Ok(Err(e)) => tracing::warn!(job = %name, error = %e, "re-processing failed"),
            Err(e) => tracing::error!(job = %name, error = %e, "re-processing task panicked"),
        }
    }
}

/// Re-process configured jobs every `server.reprocess_interval_secs`, starting
/// immediately. Returns `None` when no interval is configured.
pub fn spawn_reprocess_loop(
    workdir: PathBuf,
    config: Config,
    cancel: CancelFlag,
) -> Option<tokio::task::JoinHandle<()>> {
    let secs = config.server.reprocess_interval_secs.filter(|s| *s > 0)?;
    let period = Duration::from_secs(secs);
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if cancel.is_cancelled() {
                break;
            }
            reprocess_all(workdir.clone(), config.clone(), cancel.clone()).await;
        }
    }))
}

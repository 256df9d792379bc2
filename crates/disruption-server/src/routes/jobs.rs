use axum::extract::{Path, State};
use axum::Json;
use disruption_core::job::Job;
use disruption_core::known_jobs::KnownJobs;

use crate::error::AppError;
use crate::state::AppState;

/// When a known-job list has been recorded, `name` must be on it.
pub(crate) fn check_known(workdir: &std::path::Path, name: &str) -> disruption_core::Result<()> {
    match KnownJobs::load(workdir)? {
        Some(known) => known.require(name),
        None => Ok(()),
    }
}

/// GET /jobs: the persisted known-job list.
pub async fn list_jobs(State(app): State<AppState>) -> Result<Json<KnownJobs>, AppError> {
    let workdir = app.workdir.clone();
    let known = tokio::task::spawn_blocking(move || KnownJobs::load(&workdir))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    match known {
        Some(known) => Ok(Json(known)),
        None => Err(AppError::not_found("no job list recorded yet")),
    }
}

/// GET /job/{name}: the full processed snapshot of one job.
pub async fn get_job(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Job>, AppError> {
    let workdir = app.workdir.clone();
    let job = tokio::task::spawn_blocking(move || {
        check_known(&workdir, &name)?;
        Job::load(&workdir, &name)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(job))
}

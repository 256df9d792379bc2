use axum::extract::{Path, State};
use axum::Json;
use disruption_core::metric::{self, JobMetric};

use crate::error::AppError;
use crate::routes::jobs::check_known;
use crate::state::AppState;

/// GET /metrics/{name}: metric names observed across the job's runs.
pub async fn list_metrics(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let workdir = app.workdir.clone();
    let result = tokio::task::spawn_blocking(move || {
        check_known(&workdir, &name)?;
        let metrics = metric::load_metric_names(&workdir, &name)?;
        Ok::<_, disruption_core::DisruptionError>(serde_json::json!({
            "name": name,
            "metrics": metrics,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /job/{name}/{metric}: per-run intervals of one metric.
///
/// Locators contain slashes; clients percent-encode them into one segment.
pub async fn get_job_metric(
    State(app): State<AppState>,
    Path((name, metric)): Path<(String, String)>,
) -> Result<Json<JobMetric>, AppError> {
    let workdir = app.workdir.clone();
    let projected = tokio::task::spawn_blocking(move || {
        check_known(&workdir, &name)?;
        metric::load_job_metric(&workdir, &name, &metric)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(projected))
}

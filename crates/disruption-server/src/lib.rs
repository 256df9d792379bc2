pub mod error;
pub mod reprocess;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use disruption_core::config::Config;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all query routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(workdir: PathBuf) -> Router {
    router_with_state(state::AppState::new(workdir))
}

fn router_with_state(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/jobs", get(routes::jobs::list_jobs))
        .route("/job/{name}", get(routes::jobs::get_job))
        .route("/job/{name}/{metric}", get(routes::metrics::get_job_metric))
        .route("/metrics/{name}", get(routes::metrics::list_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the query API on a pre-bound listener until Ctrl-C.
///
/// When the config sets `server.reprocess_interval_secs`, configured jobs are
/// re-processed in the background. Shutdown cancels that work at the next run
/// boundary so no snapshot is left half-replaced.
pub async fn serve_on(
    workdir: PathBuf,
    listener: tokio::net::TcpListener,
    config: Config,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app_state = state::AppState::new(workdir.clone());
    let cancel = app_state.cancel.clone();

    let reprocess = reprocess::spawn_reprocess_loop(workdir, config, cancel.clone());

    tracing::info!("disruption history API listening on http://localhost:{actual_port}");

    axum::serve(listener, router_with_state(app_state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
            cancel.cancel();
        })
        .await?;

    if let Some(handle) = reprocess {
        handle.abort();
    }
    Ok(())
}

/// Bind `0.0.0.0:{port}` and serve.
pub async fn serve(workdir: PathBuf, port: u16, config: Config) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(workdir, listener, config).await
}

use disruption_core::cancel::CancelFlag;
use std::path::PathBuf;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub workdir: PathBuf,
    /// Set on shutdown; stops background re-processing at the next run boundary.
    pub cancel: CancelFlag,
}

impl AppState {
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            workdir,
            cancel: CancelFlag::new(),
        }
    }
}

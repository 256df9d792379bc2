use disruption_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the working directory.
///
/// Priority:
/// 1. `--workdir` flag / `DISRUPTION_WORKDIR` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for a directory holding `orig/` or `processed/`
/// 3. Fall back to `cwd`
pub fn resolve_workdir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd).unwrap_or(cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| is_workdir(dir))
        .map(Path::to_path_buf)
}

fn is_workdir(dir: &Path) -> bool {
    dir.join(paths::RAW_DIR).is_dir() || dir.join(paths::PROCESSED_DIR).is_dir()
}

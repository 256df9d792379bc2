use crate::error::{DisruptionError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Readers see either the previous content or the new content, never a mix.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Names of the entries in `dir` accepted by `keep`, in ascending name order.
///
/// `keep` sees the metadata of the symlink target, not of the link. A name
/// that is not valid UTF-8 fails the listing with `UnreadableEntry`.
pub fn sorted_entries(
    dir: &Path,
    keep: impl Fn(&std::fs::Metadata) -> bool,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !keep(&std::fs::metadata(entry.path())?) {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| DisruptionError::UnreadableEntry {
                dir: dir.to_path_buf(),
                name,
            })?;
        names.push(name);
    }
    names.sort();
    Ok(names)
}

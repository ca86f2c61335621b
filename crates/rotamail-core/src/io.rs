use crate::error::{Result, RotamailError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `data` to a fresh tempfile next to `path` and fsync it.
///
/// The tempfile lives in the same directory as `path` so the later rename
/// stays on one filesystem. Dropping the returned handle removes the file.
pub fn write_synced_temp(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = parent_dir(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(".rotamail-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(RotamailError::io(dir))?;
    tmp.write_all(data).map_err(RotamailError::io(tmp.path()))?;
    tmp.flush().map_err(RotamailError::io(tmp.path()))?;
    tmp.as_file()
        .sync_all()
        .map_err(RotamailError::io(tmp.path()))?;
    Ok(tmp)
}

/// Rename a synced tempfile over `path`, then sync the parent directory so the
/// rename itself survives a crash.
pub fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .map_err(|e| RotamailError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;
    sync_dir(parent_dir(path))
}

pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(RotamailError::io(path))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    std::fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(RotamailError::io(dir))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

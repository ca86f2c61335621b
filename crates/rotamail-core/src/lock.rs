//! Exclusive locks on rotation lists.
//!
//! The lock lives on a sidecar `<list>.lock` file rather than on the list
//! itself: committing a rotation renames a new file over the list, so a lock
//! on the list's inode would not be seen by the next reader.

use crate::error::{Result, RotamailError};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An exclusive OS-level lock on one rotation list, released on drop.
#[derive(Debug)]
pub struct ListLock {
    #[allow(dead_code)] // held open to keep the lock
    file: File,
    path: PathBuf,
}

impl ListLock {
    /// Try to lock `list_path` without blocking.
    ///
    /// Returns `StoreLocked` if another process holds the lock.
    pub fn acquire(list_path: &Path) -> Result<Self> {
        let path = lock_path(list_path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(RotamailError::io(&path))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "acquired list lock");
                Ok(Self { file, path })
            }
            Err(e) if is_contended(&e) => {
                Err(RotamailError::StoreLocked(list_path.to_path_buf()))
            }
            Err(e) => Err(RotamailError::Io { path, source: e }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sidecar lock path: `team1.txt` → `team1.txt.lock`.
pub fn lock_path(list_path: &Path) -> PathBuf {
    let mut name = list_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    list_path.with_file_name(name)
}

fn is_contended(e: &io::Error) -> bool {
    // EWOULDBLOCK/EAGAIN: 11 on Linux, 35 on macOS.
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
        || matches!(e.raw_os_error(), Some(11) | Some(35))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_path_appends_suffix() {
        assert_eq!(
            lock_path(Path::new("/srv/rota/team1.txt")),
            PathBuf::from("/srv/rota/team1.txt.lock")
        );
    }

    #[test]
    fn second_acquire_is_rejected_while_held() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("team.txt");
        std::fs::write(&list, "alice\n").unwrap();

        let held = ListLock::acquire(&list).unwrap();
        let err = ListLock::acquire(&list).unwrap_err();
        assert!(matches!(err, RotamailError::StoreLocked(ref p) if p == &list));

        drop(held);
        ListLock::acquire(&list).unwrap();
    }

    #[test]
    fn lock_does_not_touch_list_contents() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("team.txt");
        std::fs::write(&list, "alice\nbob\n").unwrap();

        let lock = ListLock::acquire(&list).unwrap();
        assert!(lock.path().exists());
        assert_eq!(std::fs::read_to_string(&list).unwrap(), "alice\nbob\n");
    }
}

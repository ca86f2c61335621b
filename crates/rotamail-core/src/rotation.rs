//! Durable round-robin rotation lists.
//!
//! A rotation list is a plain-text file with one identifier per line. The
//! first entry is the current head; rotating moves it to the end. Every
//! rotation goes through a synced tempfile and an atomic rename, so the file
//! on disk always holds either the old or the new ordering.

use crate::error::{Result, RotamailError};
use crate::io;
use crate::lock::ListLock;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationList {
    path: PathBuf,
    entries: Vec<String>,
}

impl RotationList {
    /// Read a list from disk without modifying it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = io::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries: parse(&text),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn head(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// The head and the ordering that follows it: `entries[1..] + [entries[0]]`.
    pub fn rotated(&self) -> Result<(String, Vec<String>)> {
        let Some((head, rest)) = self.entries.split_first() else {
            return Err(RotamailError::StoreEmpty(self.path.clone()));
        };
        let mut next = Vec::with_capacity(self.entries.len());
        next.extend(rest.iter().cloned());
        next.push(head.clone());
        Ok((head.clone(), next))
    }

    /// Lock the list, read it, and durably write the rotated ordering to a
    /// tempfile beside it. Nothing under the list's own name changes until
    /// [`StagedRotation::commit`].
    pub fn stage(path: &Path) -> Result<StagedRotation> {
        let lock = ListLock::acquire(path)?;
        let list = Self::load(path)?;
        let (head, next) = list.rotated()?;
        let tmp = io::write_synced_temp(path, render(&next).as_bytes())?;
        debug!(
            list = %path.display(),
            head = %head,
            entries = next.len(),
            "staged rotation"
        );
        Ok(StagedRotation {
            path: list.path,
            head,
            tmp,
            _lock: lock,
        })
    }
}

/// A rotation whose new contents are synced to disk but not yet renamed into
/// place. Dropping it discards the tempfile and releases the lock.
#[derive(Debug)]
pub struct StagedRotation {
    path: PathBuf,
    head: String,
    tmp: NamedTempFile,
    _lock: ListLock,
}

impl StagedRotation {
    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the list with the rotated ordering and return the
    /// head that was rotated out.
    pub fn commit(self) -> Result<String> {
        io::persist(self.tmp, &self.path)?;
        info!(list = %self.path.display(), head = %self.head, "rotated list");
        Ok(self.head)
    }
}

/// Pop the head of the list at `path`, move it to the tail, persist, and
/// return it.
pub fn rotate(path: &Path) -> Result<String> {
    RotationList::stage(path)?.commit()
}

/// Split list text into entries. Surrounding whitespace (including `\r`) is
/// trimmed and blank lines are skipped.
pub fn parse(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// One entry per line, each newline-terminated.
pub fn render(entries: &[String]) -> String {
    let mut out = String::with_capacity(entries.iter().map(|e| e.len() + 1).sum());
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

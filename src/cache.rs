//! On-disk cache directory reset.
//!
//! `/resetcache` empties the configured directory. Only its children are
//! removed; symlinks are unlinked rather than followed, so nothing outside
//! the directory can be touched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The cache directory the gateway is allowed to wipe.
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Remove every entry inside the directory and return how many were removed.
    ///
    /// A missing directory counts as already empty.
    pub fn clear(&self) -> io::Result<usize> {
        let root = match fs::canonicalize(&self.root) {
            Ok(root) => root,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        if root.parent().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to clear filesystem root {}", root.display()),
            ));
        }
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        let mut removed = 0;
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.starts_with(&root) {
                continue;
            }

            // file_type() does not follow symlinks.
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            removed += 1;
        }

        tracing::info!(dir = %root.display(), removed, "Cache directory cleared");
        Ok(removed)
    }
}

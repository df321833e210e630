//! Recursive usage scan of a directory tree.
//!
//! The scanner answers one question: how many bytes of regular-file data
//! and how many filesystem entries live under a root path. It walks the
//! tree depth-first over fd-relative [`Dir`] handles, so the traversal
//! cannot escape the root once it has been opened.
//!
//! The walk is fail-fast: the first I/O error aborts the entire scan and
//! surfaces as [`UsageError::Traversal`]. A scan that cannot fully
//! enumerate the tree is considered unreliable rather than approximate,
//! so no partial aggregate is ever returned. The caller's cancellation
//! token is checked once per visited entry.

use std::path::Path;

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, UsageError};

/// Aggregate usage of a directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    /// Total size of all regular files, in bytes.
    pub bytes: u64,
    /// Number of entries visited, including the scan root.
    pub inodes: u64,
}

/// Scan the tree rooted at `root`, accumulating regular-file bytes and
/// entry counts.
///
/// The root itself counts as one entry; if it is a regular file its size
/// is the whole result. Entry types are whatever the platform directory
/// iterator reports without following symlinks: a symlink counts as one
/// entry and contributes no bytes.
///
/// # Errors
///
/// Returns [`UsageError::Traversal`] on the first I/O failure anywhere in
/// the tree, and [`UsageError::Cancelled`] if `cancel` is observed at a
/// checkpoint. In both cases no partial counts are returned.
pub fn scan(root: impl AsRef<Path>, cancel: &CancellationToken) -> Result<DiskUsage> {
    let root = root.as_ref();
    let meta =
        std::fs::symlink_metadata(root).map_err(|e| UsageError::traversal(root, e))?;

    let mut usage = DiskUsage { bytes: 0, inodes: 1 };
    if meta.is_dir() {
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|e| UsageError::traversal(root, e))?;
        scan_dir(&dir, root, cancel, &mut usage)?;
    } else if meta.is_file() {
        usage.bytes = meta.len();
    }
    Ok(usage)
}

/// Accumulate one directory's entries into `usage`, recursing into
/// subdirectories. `path` is carried only for error context.
fn scan_dir(
    dir: &Dir,
    path: &Path,
    cancel: &CancellationToken,
    usage: &mut DiskUsage,
) -> Result<()> {
    for entry in dir.entries().map_err(|e| UsageError::traversal(path, e))? {
        if cancel.is_cancelled() {
            return Err(UsageError::Cancelled);
        }

        let entry = entry.map_err(|e| UsageError::traversal(path, e))?;
        let entry_path = path.join(entry.file_name());
        let meta = entry
            .metadata()
            .map_err(|e| UsageError::traversal(&entry_path, e))?;

        usage.inodes += 1;
        if meta.is_file() {
            usage.bytes = usage.bytes.saturating_add(meta.len());
        } else if meta.is_dir() {
            let subdir = entry
                .open_dir()
                .map_err(|e| UsageError::traversal(&entry_path, e))?;
            scan_dir(&subdir, &entry_path, cancel, usage)?;
        }
    }
    Ok(())
}

//! Assembly of image filesystem usage reports.
//!
//! The reporter binds the three collaborators together: it resolves the
//! engine data root through an injected [`EngineInfo`] provider, runs the
//! [`scan`](crate::scan::scan) over the image area, and stamps the result
//! with an injected [`Clock`]. It holds no state between invocations and
//! performs no filesystem mutation.

use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::EngineInfo;
use crate::error::{Result, UsageError};
use crate::scan::{scan, DiskUsage};
use crate::usage::{FilesystemIdentifier, FilesystemUsage, ImageFsInfoResponse};

/// Fixed subdirectory of the engine data root holding pulled image
/// content, distinct from container-writable layers and other runtime
/// state.
pub const IMAGE_SUBDIR: &str = "image";

/// Reports filesystem usage of the engine's image store.
#[derive(Debug)]
pub struct UsageReporter<E, C> {
    engine: E,
    clock: C,
}

impl<E: EngineInfo, C: Clock> UsageReporter<E, C> {
    /// Create a reporter over the given configuration provider and clock.
    pub fn new(engine: E, clock: C) -> Self {
        UsageReporter { engine, clock }
    }

    /// Measure the image store and return its usage.
    ///
    /// The response carries one [`FilesystemUsage`] entry whose
    /// `mountpoint` is the engine data root and whose counts cover the
    /// `image` subdirectory beneath it. A data root whose image
    /// subdirectory does not exist yet (freshly initialized store) reports
    /// zero usage; a missing data root itself is a traversal error.
    ///
    /// The timestamp is captured after the scan completes, so it reflects
    /// when the measurement was finalized.
    ///
    /// # Errors
    ///
    /// Propagates [`UsageError::ConfigResolution`] from the provider,
    /// [`UsageError::Traversal`] from the scan, and
    /// [`UsageError::Cancelled`] when `cancel` is observed mid-scan. A
    /// failed report carries no usage entry: callers must treat failure as
    /// "unknown", never as zero usage.
    pub fn image_fs_info(&self, cancel: &CancellationToken) -> Result<ImageFsInfoResponse> {
        let data_root = match self.engine.data_root() {
            Ok(root) => root,
            Err(e) => {
                error!("failed to resolve engine data root: {e}");
                return Err(e);
            }
        };

        let image_root = data_root.join(IMAGE_SUBDIR);
        let usage = match scan(&image_root, cancel) {
            Ok(usage) => usage,
            Err(UsageError::Traversal { ref path, ref source })
                if source.kind() == ErrorKind::NotFound && path == &image_root =>
            {
                // Nothing pulled yet. The data root must still exist so a
                // misconfigured root never reads as an empty store.
                ensure_exists(&data_root)?;
                DiskUsage::default()
            }
            Err(e) => return Err(e),
        };

        let timestamp = self.clock.now_nanos();
        debug!(
            "image store {}: {} bytes in {} inodes",
            image_root.display(),
            usage.bytes,
            usage.inodes
        );

        Ok(ImageFsInfoResponse {
            image_filesystems: vec![FilesystemUsage {
                timestamp,
                fs_id: FilesystemIdentifier {
                    mountpoint: data_root,
                },
                used_bytes: usage.bytes,
                inodes_used: usage.inodes,
            }],
        })
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|e| UsageError::traversal(path, e))
}

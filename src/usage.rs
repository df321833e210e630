//! Response entities for image filesystem usage reports.
//!
//! These are plain value types: constructed fresh on every report, never
//! cached or mutated. Serialization to a wire format is the transport
//! layer's concern; the serde field names here use the camelCase spelling
//! that remote callers expect.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity of the filesystem a usage measurement describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemIdentifier {
    /// Root path of the measured filesystem.
    pub mountpoint: PathBuf,
}

/// Point-in-time usage of a single filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemUsage {
    /// When the measurement was finalized, in nanoseconds since the Unix
    /// epoch. Captured after the scan completes, not when it starts.
    pub timestamp: i64,

    /// Which filesystem the numbers describe.
    pub fs_id: FilesystemIdentifier,

    /// Total size of all regular files found under the measured area.
    pub used_bytes: u64,

    /// Count of all filesystem entries visited, including the scanned root
    /// itself. Directories, symlinks, and special files count here even
    /// though they contribute nothing to `used_bytes`.
    pub inodes_used: u64,
}

/// Response to an image filesystem info request.
///
/// Carries one [`FilesystemUsage`] per reported filesystem. Image storage
/// is the only filesystem reported today, but the collection shape allows
/// additional named filesystems later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFsInfoResponse {
    /// Usage entries, one per measured filesystem.
    pub image_filesystems: Vec<FilesystemUsage>,
}

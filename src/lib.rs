//! Filesystem usage accounting for container image stores.
//!
//! This library answers one question for an orchestrator: how much disk
//! space and how many filesystem entries does the engine's image store
//! occupy right now, and on which filesystem does it live. The answer is
//! a best-effort snapshot: a recursive walk over the image area with no
//! consistency guarantee against concurrent mutation.
//!
//! # Overview
//!
//! ```no_run
//! use imagefs::{EngineConfig, SystemClock, UsageReporter};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = EngineConfig::load()?;
//! let reporter = UsageReporter::new(config, SystemClock);
//! let response = reporter.image_fs_info(&CancellationToken::new())?;
//!
//! for usage in &response.image_filesystems {
//!     println!("{}: {} bytes", usage.fs_id.mountpoint.display(), usage.used_bytes);
//! }
//! # Ok::<(), imagefs::UsageError>(())
//! ```
//!
//! # Design
//!
//! The walk is all-or-nothing: the first I/O error or an observed
//! cancellation aborts the whole measurement, and a failed report carries
//! no numbers. Callers must treat failure as "unknown", never as "zero
//! usage". The reporter's collaborators (configuration provider and
//! clock) are injected traits, so tests run against fakes and never
//! touch global state.

pub mod clock;
pub mod config;
pub mod error;
pub mod report;
pub mod scan;
pub mod usage;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::{EngineConfig, EngineInfo};
pub use error::{Result, UsageError};
pub use report::{UsageReporter, IMAGE_SUBDIR};
pub use scan::{scan, DiskUsage};
pub use usage::{FilesystemIdentifier, FilesystemUsage, ImageFsInfoResponse};

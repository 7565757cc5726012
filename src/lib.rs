//! # replicr - Periodic One-Way Directory Mirroring
//!
//! replicr keeps a replica directory tree identical to a source tree. Each
//! cycle removes replica files missing from the source, creates files missing
//! from the replica and overwrites files whose content digest differs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use replicr::sync::sync_dirs;
//!
//! let result = sync_dirs("./source".as_ref(), "./replica".as_ref())?;
//! println!("Synced: {}", result);
//! ```
//!
//! ## Reporting events
//!
//! ```rust,ignore
//! use replicr::callbacks::CallbackBuilder;
//! use replicr::sync::{sync, SyncOptions};
//!
//! let callbacks = CallbackBuilder::new()
//!     .on_file_created(|p| println!("created {}", p.display()))
//!     .build();
//! let result = sync(src, repl, &SyncOptions::default(), callbacks.as_ref())?;
//! ```

pub mod callbacks;
pub mod cli;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod logging;
pub mod runner;
pub mod scanner;
pub mod signal;
pub mod sync;
pub mod types;
pub mod util;

// Re-export commonly used types and functions
pub use callbacks::{CallbackBuilder, NoCallbacks, SyncCallbacks, TracingCallbacks};
pub use config::Config;
pub use error::SyncError;
pub use sync::{sync, sync_dirs, SyncOptions};
pub use types::{FileEntry, SyncResult};

// vim: ts=4

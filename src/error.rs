//! Error types for replicr operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Main error type for mirroring operations
#[derive(Debug)]
pub enum SyncError {
	/// Filesystem operation failed on a path
	Io { path: PathBuf, source: io::Error },

	/// Directory walk failed (unreadable directory, vanished entry)
	Walk(ignore::Error),

	/// Source root is missing or not a directory
	SourceNotFound { path: PathBuf },

	/// Invalid configuration
	InvalidConfig { message: String },

	/// Exclusion pattern failed to compile
	InvalidPattern { pattern: String, message: String },

	/// Blocking sync task panicked or was cancelled
	Task { message: String },
}

impl SyncError {
	/// Wrap an I/O error with the path it happened on
	pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
		SyncError::Io { path: path.as_ref().to_path_buf(), source }
	}
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::Io { path, source } => {
				write!(f, "I/O error on {}: {}", path.display(), source)
			}
			SyncError::Walk(e) => write!(f, "Cannot scan directory tree: {}", e),
			SyncError::SourceNotFound { path } => {
				write!(f, "Source folder {} does not exist", path.display())
			}
			SyncError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			SyncError::InvalidPattern { pattern, message } => {
				write!(f, "Invalid exclude pattern '{}': {}", pattern, message)
			}
			SyncError::Task { message } => write!(f, "Sync task failed: {}", message),
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::Io { source, .. } => Some(source),
			SyncError::Walk(e) => Some(e),
			_ => None,
		}
	}
}

impl From<ignore::Error> for SyncError {
	fn from(e: ignore::Error) -> Self {
		SyncError::Walk(e)
	}
}

impl From<tokio::task::JoinError> for SyncError {
	fn from(e: tokio::task::JoinError) -> Self {
		SyncError::Task { message: e.to_string() }
	}
}

impl From<toml::de::Error> for SyncError {
	fn from(e: toml::de::Error) -> Self {
		SyncError::InvalidConfig { message: e.to_string() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_io_error_display_includes_path() {
		let err = SyncError::io("replica/a.txt", io::Error::new(io::ErrorKind::NotFound, "gone"));
		let msg = err.to_string();
		assert!(msg.contains("replica/a.txt"));
		assert!(msg.contains("gone"));
		assert!(err.source().is_some());
	}

	#[test]
	fn test_source_not_found_display() {
		let err = SyncError::SourceNotFound { path: PathBuf::from("missing") };
		assert_eq!(err.to_string(), "Source folder missing does not exist");
		assert!(err.source().is_none());
	}
}

// vim: ts=4

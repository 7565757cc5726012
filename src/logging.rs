//! Logging prelude module for convenient access to tracing macros.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("This is an info message");
//! warn!("This is a warning");
//! ```

pub use tracing::{debug, error, info, warn};

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the tracing subscriber with environment filter support.
///
/// Logs go to stderr and, when `log_file` is given, are appended to that file
/// as well. `RUST_LOG` takes precedence over `default_level`:
///
/// ```bash
/// RUST_LOG=debug replicr --src ./source --repl ./replica
/// RUST_LOG=replicr::sync=debug replicr
/// ```
pub fn init_tracing(log_file: Option<&Path>, default_level: &str) -> io::Result<()> {
	let file_layer = match log_file {
		Some(path) => {
			let file = OpenOptions::new().create(true).append(true).open(path)?;
			Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(env_filter(default_level))
		.with(fmt::layer().with_writer(io::stderr))
		.with(file_layer)
		.try_init()
		.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn test_init_writes_to_log_file_once() {
		let dir = TempDir::new().unwrap();
		let log = dir.path().join("log.txt");

		init_tracing(Some(&log), "info").unwrap();
		error!("hello from the log test");
		assert!(init_tracing(None, "info").is_err(), "a second subscriber must be rejected");

		let contents = std::fs::read_to_string(&log).unwrap();
		assert!(contents.contains("hello from the log test"));
	}
}

// vim: ts=4

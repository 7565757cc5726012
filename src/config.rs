//! Configuration for replicr
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (TOML, given with `--config`)
//! 3. Environment variables (REPLICR_* prefix)
//! 4. CLI flags (highest priority)

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::SyncError;
use crate::exclusion::PatternMatcher;

pub const ENV_SOURCE: &str = "REPLICR_SRC";
pub const ENV_REPLICA: &str = "REPLICR_REPL";
pub const ENV_LOG_FILE: &str = "REPLICR_LOGF";
pub const ENV_SYNC_TIME: &str = "REPLICR_SYNC_TIME";
pub const ENV_DRY_RUN: &str = "REPLICR_DRY_RUN";
pub const ENV_LOG_LEVEL: &str = "REPLICR_LOG_LEVEL";

/// Configuration for a mirroring run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	// ========================================================================
	// TREES
	// ========================================================================
	/// Authoritative tree mirrored from
	pub source: PathBuf,

	/// Tree kept identical to the source
	pub replica: PathBuf,

	/// Glob patterns (relative to each root) left out of the mirror
	pub exclude_patterns: Vec<String>,

	// ========================================================================
	// SYNC BEHAVIOR
	// ========================================================================
	/// Seconds to wait between cycles
	pub sync_interval_secs: u64,

	/// Plan changes without applying them
	pub dry_run: bool,

	/// Remove replica directories emptied by deletions
	pub prune_empty_dirs: bool,

	// ========================================================================
	// OUTPUT & LOGGING
	// ========================================================================
	pub log_file: PathBuf,

	/// Default filter when RUST_LOG is not set
	pub log_level: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			source: PathBuf::from("source"),
			replica: PathBuf::from("replica"),
			exclude_patterns: vec![],
			sync_interval_secs: 60,
			dry_run: false,
			prune_empty_dirs: false,
			log_file: PathBuf::from("log.txt"),
			log_level: "info".to_string(),
		}
	}
}

impl Config {
	/// Load a TOML config file; missing keys keep their defaults
	pub fn from_file(path: &Path) -> Result<Self, SyncError> {
		let contents = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
		Self::from_toml(&contents)
	}

	pub fn from_toml(contents: &str) -> Result<Self, SyncError> {
		Ok(toml::from_str(contents)?)
	}

	/// Apply REPLICR_* variables from the process environment
	pub fn apply_env(&mut self) -> Result<(), SyncError> {
		self.apply_env_from(|key| env::var(key).ok())
	}

	/// Apply REPLICR_* variables from an arbitrary lookup
	pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), SyncError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(v) = lookup(ENV_SOURCE) {
			self.source = PathBuf::from(v);
		}
		if let Some(v) = lookup(ENV_REPLICA) {
			self.replica = PathBuf::from(v);
		}
		if let Some(v) = lookup(ENV_LOG_FILE) {
			self.log_file = PathBuf::from(v);
		}
		if let Some(v) = lookup(ENV_SYNC_TIME) {
			self.sync_interval_secs = v.trim().parse().map_err(|e| SyncError::InvalidConfig {
				message: format!("{}='{}': {}", ENV_SYNC_TIME, v, e),
			})?;
		}
		if let Some(v) = lookup(ENV_DRY_RUN) {
			self.dry_run = parse_bool(&v).ok_or_else(|| SyncError::InvalidConfig {
				message: format!("{}='{}' is not a boolean", ENV_DRY_RUN, v),
			})?;
		}
		if let Some(v) = lookup(ENV_LOG_LEVEL) {
			self.log_level = v;
		}
		Ok(())
	}

	/// Reject settings the loop cannot run with
	pub fn validate(&self) -> Result<(), SyncError> {
		if self.sync_interval_secs == 0 {
			return Err(SyncError::InvalidConfig {
				message: "sync interval must be at least 1 second".to_string(),
			});
		}
		let source = resolve_root(&self.source)?;
		let replica = resolve_root(&self.replica)?;
		if source == replica {
			return Err(SyncError::InvalidConfig {
				message: format!("source and replica are the same path: {}", source.display()),
			});
		}
		// Either tree would otherwise scan the other as part of itself
		if replica.starts_with(&source) || source.starts_with(&replica) {
			return Err(SyncError::InvalidConfig {
				message: format!(
					"source {} and replica {} must not be nested",
					source.display(),
					replica.display()
				),
			});
		}
		PatternMatcher::new(&self.exclude_patterns)?;
		Ok(())
	}

	pub fn sync_interval(&self) -> Duration {
		Duration::from_secs(self.sync_interval_secs)
	}
}

/// Absolute form of a root that may not exist yet
///
/// The deepest existing ancestor is canonicalized (resolving links and `..`),
/// the missing remainder is appended lexically.
fn resolve_root(path: &Path) -> Result<PathBuf, SyncError> {
	let absolute = if path.is_absolute() {
		path.to_path_buf()
	} else {
		let cwd = env::current_dir().map_err(|e| SyncError::io(path, e))?;
		cwd.join(path)
	};

	for base in absolute.ancestors() {
		let mut resolved = match fs::canonicalize(base) {
			Ok(resolved) => resolved,
			Err(_) => continue,
		};
		let rest = absolute.strip_prefix(base).unwrap_or_else(|_| Path::new(""));
		for component in rest.components() {
			match component {
				Component::ParentDir => {
					resolved.pop();
				}
				Component::Normal(name) => resolved.push(name),
				_ => {}
			}
		}
		return Ok(resolved);
	}
	Ok(absolute)
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}


// vim: ts=4

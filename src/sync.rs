//! One-way mirroring of a source tree onto a replica tree
//!
//! A cycle runs two passes:
//!
//! 1. **prune**: every replica file without a source counterpart is removed
//! 2. **propagate**: every source file is created in the replica when missing,
//!    or overwritten when its content digest differs
//!
//! ```rust,ignore
//! use replicr::sync::sync_dirs;
//!
//! let result = sync_dirs("./source".as_ref(), "./replica".as_ref())?;
//! println!("{} created, {} removed, {} updated",
//!     result.files_created, result.files_removed, result.files_updated);
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::callbacks::{NoCallbacks, SyncCallbacks};
use crate::config::Config;
use crate::error::SyncError;
use crate::exclusion::PatternMatcher;
use crate::logging::*;
use crate::scanner::TreeScanner;
use crate::types::SyncResult;
use crate::util;

/// Options that change how a cycle touches the replica
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
	/// Report actions without modifying the replica
	pub dry_run: bool,

	/// Remove replica directories left empty by file deletions
	pub prune_empty_dirs: bool,

	/// Paths (relative to either root) that are neither scanned nor touched
	pub exclude: PatternMatcher,
}

impl SyncOptions {
	pub fn from_config(config: &Config) -> Result<Self, SyncError> {
		Ok(SyncOptions {
			dry_run: config.dry_run,
			prune_empty_dirs: config.prune_empty_dirs,
			exclude: PatternMatcher::new(&config.exclude_patterns)?,
		})
	}
}

/// Mirror `source` onto `replica` with default options and no event reporting
pub fn sync_dirs(source: &Path, replica: &Path) -> Result<SyncResult, SyncError> {
	sync(source, replica, &SyncOptions::default(), &NoCallbacks)
}

/// Run one full cycle
///
/// Both roots must exist and be directories. The first filesystem error aborts
/// the cycle; files already handled stay handled.
pub fn sync(
	source: &Path,
	replica: &Path,
	options: &SyncOptions,
	callbacks: &dyn SyncCallbacks,
) -> Result<SyncResult, SyncError> {
	let mut result = SyncResult::default();

	let emptied = prune_pass(source, replica, options, callbacks, &mut result)?;
	if options.prune_empty_dirs && !options.dry_run {
		remove_emptied_dirs(replica, emptied, callbacks)?;
	}

	propagate_pass(source, replica, options, callbacks, &mut result)?;

	debug!(
		"Cycle finished: created={} removed={} updated={}",
		result.files_created, result.files_removed, result.files_updated
	);
	Ok(result)
}

/// Remove replica files missing from the source
///
/// Returns the parent directories of removed files.
fn prune_pass(
	source: &Path,
	replica: &Path,
	options: &SyncOptions,
	callbacks: &dyn SyncCallbacks,
	result: &mut SyncResult,
) -> Result<BTreeSet<PathBuf>, SyncError> {
	let mut emptied = BTreeSet::new();

	// Replica links are never followed, so an orphaned or dangling one is
	// removed like a plain file
	for entry in TreeScanner::with_exclusions(replica, &options.exclude).report_links() {
		let entry = entry?;
		let source_path = entry.under(source);
		let exists = source_path.try_exists().map_err(|e| SyncError::io(&source_path, e))?;
		if exists {
			continue;
		}

		let replica_path = entry.under(replica);
		callbacks.on_file_removed(&replica_path);
		if !options.dry_run {
			fs::remove_file(&replica_path).map_err(|e| SyncError::io(&replica_path, e))?;
		}
		emptied.insert(entry.dir().to_path_buf());
		result.files_removed += 1;
	}

	Ok(emptied)
}

/// Create or update replica files from the source
fn propagate_pass(
	source: &Path,
	replica: &Path,
	options: &SyncOptions,
	callbacks: &dyn SyncCallbacks,
	result: &mut SyncResult,
) -> Result<(), SyncError> {
	for entry in TreeScanner::with_exclusions(source, &options.exclude) {
		let entry = entry?;
		let source_path = entry.under(source);
		let replica_path = entry.under(replica);

		let replica_meta = match fs::symlink_metadata(&replica_path) {
			Ok(meta) => Some(meta),
			Err(e) if e.kind() == io::ErrorKind::NotFound => None,
			Err(e) => return Err(SyncError::io(&replica_path, e)),
		};

		let replica_meta = match replica_meta {
			Some(meta) => meta,
			None => {
				callbacks.on_file_created(&replica_path);
				if !options.dry_run {
					let parent = replica.join(entry.dir());
					fs::create_dir_all(&parent).map_err(|e| SyncError::io(&parent, e))?;
					util::copy_file(&source_path, &replica_path)?;
				}
				result.files_created += 1;
				continue;
			}
		};

		// Copying through a replica link would write into its target
		if replica_meta.file_type().is_symlink() {
			callbacks.on_file_updated(&replica_path);
			if !options.dry_run {
				fs::remove_file(&replica_path).map_err(|e| SyncError::io(&replica_path, e))?;
				util::copy_file(&source_path, &replica_path)?;
			}
			result.files_updated += 1;
			continue;
		}

		if util::same_content(&source_path, &replica_path)? {
			callbacks.on_file_unchanged(&replica_path);
			continue;
		}

		callbacks.on_file_updated(&replica_path);
		if !options.dry_run {
			util::copy_file(&source_path, &replica_path)?;
		}
		result.files_updated += 1;
	}

	Ok(())
}

/// Remove directories (relative to `replica`) that are now empty, walking up
/// towards the root; the root itself is kept
fn remove_emptied_dirs(
	replica: &Path,
	emptied: BTreeSet<PathBuf>,
	callbacks: &dyn SyncCallbacks,
) -> Result<(), SyncError> {
	// Reverse order visits children before their parents
	for relative in emptied.into_iter().rev() {
		let mut current = relative.as_path();
		while !current.as_os_str().is_empty() {
			let dir = replica.join(current);
			if !is_empty_dir(&dir)? {
				break;
			}
			fs::remove_dir(&dir).map_err(|e| SyncError::io(&dir, e))?;
			callbacks.on_dir_removed(&dir);
			current = match current.parent() {
				Some(parent) => parent,
				None => break,
			};
		}
	}
	Ok(())
}

fn is_empty_dir(dir: &Path) -> Result<bool, SyncError> {
	match fs::read_dir(dir) {
		Ok(mut entries) => Ok(entries.next().is_none()),
		// Already removed while walking up from a sibling
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
		Err(e) => Err(SyncError::io(dir, e)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::callbacks::CallbackBuilder;
	use std::sync::{Arc, Mutex};
	use tempfile::TempDir;

	fn roots() -> (TempDir, PathBuf, PathBuf) {
		let tmp = TempDir::new().unwrap();
		let source = tmp.path().join("source");
		let replica = tmp.path().join("replica");
		fs::create_dir_all(&source).unwrap();
		fs::create_dir_all(&replica).unwrap();
		(tmp, source, replica)
	}

	fn write(root: &Path, rel: &str, content: &str) {
		let path = root.join(rel);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, content).unwrap();
	}

	#[test]
	fn test_empty_trees_produce_no_changes() {
		let (_tmp, source, replica) = roots();
		assert_eq!(sync_dirs(&source, &replica).unwrap(), SyncResult::default());
	}

	#[test]
	fn test_creates_nested_files() {
		let (_tmp, source, replica) = roots();
		write(&source, "a/b/c/deep.txt", "deep");

		let result = sync_dirs(&source, &replica).unwrap();
		assert_eq!(result, SyncResult::new(1, 0, 0));
		assert_eq!(fs::read_to_string(replica.join("a/b/c/deep.txt")).unwrap(), "deep");
	}

	#[test]
	fn test_removes_replica_only_file() {
		let (_tmp, source, replica) = roots();
		write(&replica, "stale.txt", "old");

		let result = sync_dirs(&source, &replica).unwrap();
		assert_eq!(result, SyncResult::new(0, 1, 0));
		assert!(!replica.join("stale.txt").exists());
	}

	#[test]
	fn test_emptied_dirs_are_kept_by_default() {
		let (_tmp, source, replica) = roots();
		write(&replica, "gone/deeper/stale.txt", "old");

		sync_dirs(&source, &replica).unwrap();
		assert!(replica.join("gone/deeper").is_dir());
	}

	#[test]
	fn test_prune_empty_dirs_removes_emptied_chain() {
		let (_tmp, source, replica) = roots();
		write(&replica, "gone/deeper/stale.txt", "old");
		write(&replica, "kept/stale.txt", "old");
		write(&replica, "kept/other.txt", "same");
		write(&source, "kept/other.txt", "same");

		let options = SyncOptions { prune_empty_dirs: true, ..SyncOptions::default() };
		let result = sync(&source, &replica, &options, &NoCallbacks).unwrap();

		assert_eq!(result, SyncResult::new(0, 2, 0));
		assert!(!replica.join("gone").exists());
		assert!(replica.join("kept/other.txt").is_file());
		assert!(replica.is_dir());
	}

	#[test]
	fn test_dry_run_reports_without_touching_replica() {
		let (_tmp, source, replica) = roots();
		write(&source, "new.txt", "new");
		write(&source, "changed.txt", "v2");
		write(&replica, "changed.txt", "v1");
		write(&replica, "stale.txt", "old");

		let options = SyncOptions { dry_run: true, ..SyncOptions::default() };
		let result = sync(&source, &replica, &options, &NoCallbacks).unwrap();

		assert_eq!(result, SyncResult::new(1, 1, 1));
		assert!(!replica.join("new.txt").exists());
		assert_eq!(fs::read_to_string(replica.join("changed.txt")).unwrap(), "v1");
		assert!(replica.join("stale.txt").exists());
	}

	#[test]
	fn test_excluded_paths_are_left_alone() {
		let (_tmp, source, replica) = roots();
		write(&source, "build.log", "source log");
		write(&replica, "local.log", "replica log");
		write(&source, "keep.txt", "keep");

		let options = SyncOptions {
			exclude: PatternMatcher::new(&["*.log".to_string()]).unwrap(),
			..SyncOptions::default()
		};
		let result = sync(&source, &replica, &options, &NoCallbacks).unwrap();

		assert_eq!(result, SyncResult::new(1, 0, 0));
		assert!(!replica.join("build.log").exists());
		assert!(replica.join("local.log").exists());
	}

	#[test]
	fn test_events_name_replica_paths() {
		let (_tmp, source, replica) = roots();
		write(&source, "same.txt", "same");
		write(&replica, "same.txt", "same");
		write(&source, "new.txt", "new");

		let events = Arc::new(Mutex::new(Vec::new()));
		let created = events.clone();
		let unchanged = events.clone();
		let callbacks = CallbackBuilder::new()
			.on_file_created(move |p| created.lock().unwrap().push(("created", p.to_path_buf())))
			.on_file_unchanged(move |p| {
				unchanged.lock().unwrap().push(("unchanged", p.to_path_buf()))
			})
			.build();

		sync(&source, &replica, &SyncOptions::default(), callbacks.as_ref()).unwrap();

		let events = events.lock().unwrap();
		assert_eq!(
			*events,
			vec![("created", replica.join("new.txt")), ("unchanged", replica.join("same.txt"))]
		);
	}

	#[cfg(unix)]
	#[test]
	fn test_unreadable_source_file_fails_cycle() {
		use std::os::unix::fs::PermissionsExt;

		let (_tmp, source, replica) = roots();
		write(&source, "secret.txt", "new");
		write(&replica, "secret.txt", "old");
		let path = source.join("secret.txt");
		fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

		// Root ignores permission bits
		if fs::File::open(&path).is_ok() {
			return;
		}
		let result = sync_dirs(&source, &replica);
		assert!(matches!(result, Err(SyncError::Io { .. })));
	}

	#[cfg(unix)]
	#[test]
	fn test_source_file_link_is_mirrored_as_copy() {
		use std::os::unix::fs::symlink;

		let (tmp, source, replica) = roots();
		write(tmp.path(), "outside.txt", "linked content");
		symlink(tmp.path().join("outside.txt"), source.join("link.txt")).unwrap();

		let result = sync_dirs(&source, &replica).unwrap();
		assert_eq!(result, SyncResult::new(1, 0, 0));

		let copy = replica.join("link.txt");
		assert!(!fs::symlink_metadata(&copy).unwrap().file_type().is_symlink());
		assert_eq!(fs::read_to_string(&copy).unwrap(), "linked content");
		assert_eq!(sync_dirs(&source, &replica).unwrap(), SyncResult::default());
	}

	#[cfg(unix)]
	#[test]
	fn test_orphaned_replica_links_are_removed() {
		use std::os::unix::fs::symlink;

		let (tmp, source, replica) = roots();
		write(tmp.path(), "outside.txt", "keep me");
		symlink(tmp.path().join("outside.txt"), replica.join("orphan")).unwrap();
		symlink(tmp.path().join("missing"), replica.join("dangling")).unwrap();

		let result = sync_dirs(&source, &replica).unwrap();
		assert_eq!(result, SyncResult::new(0, 2, 0));
		assert!(fs::symlink_metadata(replica.join("orphan")).is_err());
		assert!(fs::symlink_metadata(replica.join("dangling")).is_err());
		assert_eq!(fs::read_to_string(tmp.path().join("outside.txt")).unwrap(), "keep me");
	}

	#[cfg(unix)]
	#[test]
	fn test_file_becoming_link_updates_replica() {
		use std::os::unix::fs::symlink;

		let (tmp, source, replica) = roots();
		write(&source, "doc.txt", "plain");
		sync_dirs(&source, &replica).unwrap();

		write(tmp.path(), "outside.txt", "through a link");
		fs::remove_file(source.join("doc.txt")).unwrap();
		symlink(tmp.path().join("outside.txt"), source.join("doc.txt")).unwrap();

		let result = sync_dirs(&source, &replica).unwrap();
		assert_eq!(result, SyncResult::new(0, 0, 1));
		assert_eq!(fs::read_to_string(replica.join("doc.txt")).unwrap(), "through a link");
	}

	#[cfg(unix)]
	#[test]
	fn test_replica_link_is_replaced_not_written_through() {
		use std::os::unix::fs::symlink;

		let (tmp, source, replica) = roots();
		write(&source, "doc.txt", "source");
		write(tmp.path(), "outside.txt", "untouched");
		symlink(tmp.path().join("outside.txt"), replica.join("doc.txt")).unwrap();

		let result = sync_dirs(&source, &replica).unwrap();
		assert_eq!(result, SyncResult::new(0, 0, 1));

		let copy = replica.join("doc.txt");
		assert!(fs::symlink_metadata(&copy).unwrap().file_type().is_file());
		assert_eq!(fs::read_to_string(&copy).unwrap(), "source");
		assert_eq!(fs::read_to_string(tmp.path().join("outside.txt")).unwrap(), "untouched");
	}
}

// vim: ts=4

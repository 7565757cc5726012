//! Recursive tree scanning
//!
//! [`TreeScanner`] lazily walks a directory tree and yields a [`FileEntry`]
//! for every regular file below the root. Directory entries are visited in
//! file-name order so logs read the same from run to run.
//!
//! Symlinks are never descended into. By default a symlink is reported when
//! its target is a regular file, so it is mirrored as that file. With
//! [`TreeScanner::report_links`] every symlink is reported, which is what the
//! replica side needs to prune links the source no longer has.

use ignore::{DirEntry, Walk, WalkBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::exclusion::PatternMatcher;
use crate::logging::*;
use crate::types::FileEntry;

/// Lazy iterator over the regular files of one tree
pub struct TreeScanner {
	root: PathBuf,
	walk: Walk,
	report_links: bool,
}

impl TreeScanner {
	/// Scan every regular file below `root`
	pub fn new(root: impl AsRef<Path>) -> Self {
		Self::with_exclusions(root, &PatternMatcher::empty())
	}

	/// Scan `root`, skipping paths the matcher excludes
	///
	/// An excluded directory is not descended into.
	pub fn with_exclusions(root: impl AsRef<Path>, exclude: &PatternMatcher) -> Self {
		let root = root.as_ref().to_path_buf();

		let mut builder = WalkBuilder::new(&root);
		builder.standard_filters(false).follow_links(false).sort_by_file_name(|a, b| a.cmp(b));

		if !exclude.patterns().is_empty() {
			let matcher = exclude.clone();
			let filter_root = root.clone();
			builder.filter_entry(move |entry| {
				let relative = entry.path().strip_prefix(&filter_root).unwrap_or(entry.path());
				!matcher.is_excluded(relative)
			});
		}

		TreeScanner { walk: builder.build(), root, report_links: false }
	}

	/// Report every symlink as an entry, whatever it points to
	pub fn report_links(mut self) -> Self {
		self.report_links = true;
		self
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl Iterator for TreeScanner {
	type Item = Result<FileEntry, SyncError>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let entry = match self.walk.next()? {
				Ok(entry) => entry,
				Err(e) => return Some(Err(SyncError::from(e))),
			};

			match self.is_reported(&entry) {
				Ok(true) => {}
				Ok(false) => continue,
				Err(e) => return Some(Err(e)),
			}

			let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
			return Some(Ok(FileEntry::new(relative)));
		}
	}
}

impl TreeScanner {
	/// Directories and special files are never reported
	fn is_reported(&self, entry: &DirEntry) -> Result<bool, SyncError> {
		let ft = match entry.file_type() {
			Some(ft) => ft,
			None => return Ok(false),
		};
		if ft.is_file() {
			return Ok(true);
		}
		if !ft.is_symlink() {
			return Ok(false);
		}
		if self.report_links {
			return Ok(true);
		}

		match fs::metadata(entry.path()) {
			Ok(meta) => Ok(meta.is_file()),
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				debug!("Skipping dangling symlink {}", entry.path().display());
				Ok(false)
			}
			Err(e) => Err(SyncError::io(entry.path(), e)),
		}
	}
}

/// Collect all entries of a tree, failing on the first error
pub fn scan_tree(root: &Path, exclude: &PatternMatcher) -> Result<Vec<FileEntry>, SyncError> {
	TreeScanner::with_exclusions(root, exclude).collect()
}


// vim: ts=4

use std::ffi::OsStr;
use std::fmt;
use std::path;

/// One regular file found by a tree scan, identified by its path relative to
/// the scanned root
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct FileEntry {
	pub relative: path::PathBuf,
}

impl FileEntry {
	pub fn new(relative: impl Into<path::PathBuf>) -> Self {
		FileEntry { relative: relative.into() }
	}

	/// Directory part relative to the root (empty for top-level files)
	pub fn dir(&self) -> &path::Path {
		self.relative.parent().unwrap_or_else(|| path::Path::new(""))
	}

	pub fn file_name(&self) -> Option<&OsStr> {
		self.relative.file_name()
	}

	/// Re-root this entry under another tree
	pub fn under(&self, root: &path::Path) -> path::PathBuf {
		root.join(&self.relative)
	}
}

/// Counters produced by one sync cycle
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SyncResult {
	pub files_created: usize,
	pub files_removed: usize,
	pub files_updated: usize,
}

impl SyncResult {
	pub fn new(files_created: usize, files_removed: usize, files_updated: usize) -> Self {
		SyncResult { files_created, files_removed, files_updated }
	}

	pub fn total(&self) -> usize {
		self.files_created + self.files_removed + self.files_updated
	}

	pub fn is_empty(&self) -> bool {
		self.total() == 0
	}
}

impl fmt::Display for SyncResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} total change(s): {} file(s) created; {} file(s) removed; {} file(s) updated.",
			self.total(),
			self.files_created,
			self.files_removed,
			self.files_updated
		)
	}
}

impl From<(usize, usize, usize)> for SyncResult {
	fn from((created, removed, updated): (usize, usize, usize)) -> Self {
		SyncResult::new(created, removed, updated)
	}
}


// vim: ts=4

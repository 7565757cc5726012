//! Pattern-based file exclusion using glob patterns
//!
//! Patterns are matched against paths relative to the tree root, so the same
//! matcher works for the source and the replica tree.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::error::SyncError;

/// Pattern matcher using globset for efficient matching
#[derive(Debug, Clone)]
pub struct PatternMatcher {
	patterns: Vec<String>,
	exclude_set: GlobSet,
}

impl PatternMatcher {
	/// Compile exclusion patterns
	pub fn new(patterns: &[String]) -> Result<Self, SyncError> {
		let mut builder = GlobSetBuilder::new();
		for pattern in patterns {
			let glob = Glob::new(pattern).map_err(|e| SyncError::InvalidPattern {
				pattern: pattern.clone(),
				message: e.to_string(),
			})?;
			builder.add(glob);
		}
		let exclude_set = builder.build().map_err(|e| SyncError::InvalidPattern {
			pattern: patterns.join(", "),
			message: e.to_string(),
		})?;

		Ok(Self { patterns: patterns.to_vec(), exclude_set })
	}

	/// Matcher that excludes nothing
	pub fn empty() -> Self {
		Self { patterns: Vec::new(), exclude_set: GlobSet::empty() }
	}

	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	/// Check if a relative path is excluded by any pattern
	pub fn is_excluded(&self, relative: &Path) -> bool {
		!self.patterns.is_empty() && self.exclude_set.is_match(relative)
	}
}

impl Default for PatternMatcher {
	fn default() -> Self {
		Self::empty()
	}
}


// vim: ts=4

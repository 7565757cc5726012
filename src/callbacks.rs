//! Callback traits for sync event reporting
//!
//! The sync engine and the runner never log directly; they report to a
//! [`SyncCallbacks`] implementation. [`TracingCallbacks`] turns the events into
//! log lines, [`NoCallbacks`] drops them and [`CallbackBuilder`] assembles a
//! handler from closures.

use std::path::Path;
use std::time::Duration;

use crate::error::SyncError;
use crate::logging::*;
use crate::types::SyncResult;

// Type aliases to reduce complexity
type PathFn = dyn Fn(&Path) + Send + Sync;
type SummaryFn = dyn Fn(&SyncResult) + Send + Sync;
type ErrorFn = dyn Fn(&SyncError) + Send + Sync;
type StartedFn = dyn Fn(&Path, &Path, Duration) + Send + Sync;
type ReasonFn = dyn Fn(&str) + Send + Sync;

/// Combined callback handler for all events
pub trait SyncCallbacks: Send + Sync {
	/// Called after a missing replica file was created
	fn on_file_created(&self, _path: &Path) {}

	/// Called after a replica file without source counterpart was removed
	fn on_file_removed(&self, _path: &Path) {}

	/// Called after a replica file was overwritten with changed content
	fn on_file_updated(&self, _path: &Path) {}

	/// Called when a replica file already matches its source
	fn on_file_unchanged(&self, _path: &Path) {}

	/// Called when a replica directory emptied by deletions was removed
	fn on_dir_removed(&self, _path: &Path) {}

	/// Called when a cycle starts
	fn on_cycle_start(&self) {}

	/// Called with the counters of a completed cycle
	fn on_cycle_complete(&self, _result: &SyncResult) {}

	/// Called when a cycle failed; the next cycle retries from scratch
	fn on_cycle_failed(&self, _error: &SyncError) {}

	/// Called once before the first cycle
	fn on_started(&self, _source: &Path, _replica: &Path, _interval: Duration) {}

	/// Called when the loop stops on an interrupt
	fn on_aborted(&self, _reason: &str) {}
}

/// Default callback implementation that does nothing
pub struct NoCallbacks;

impl SyncCallbacks for NoCallbacks {}

/// Reports every event through `tracing`
pub struct TracingCallbacks;

impl SyncCallbacks for TracingCallbacks {
	fn on_file_created(&self, path: &Path) {
		info!("Creating new file \"{}\".", path.display());
	}

	fn on_file_removed(&self, path: &Path) {
		info!("Removing deleted file \"{}\".", path.display());
	}

	fn on_file_updated(&self, path: &Path) {
		info!("Updating file \"{}\".", path.display());
	}

	fn on_file_unchanged(&self, path: &Path) {
		debug!("\"{}\" is up to date.", path.display());
	}

	fn on_dir_removed(&self, path: &Path) {
		debug!("Removing empty directory \"{}\".", path.display());
	}

	fn on_cycle_start(&self) {
		info!("Syncing in progress...");
	}

	fn on_cycle_complete(&self, result: &SyncResult) {
		info!("Syncing complete. {}", result);
	}

	fn on_cycle_failed(&self, error: &SyncError) {
		error!("Syncing failed: {}", error);
	}

	fn on_started(&self, source: &Path, replica: &Path, interval: Duration) {
		info!(
			"Syncing started between \"{}\" and \"{}\". Sync interval: {} seconds.",
			source.display(),
			replica.display(),
			interval.as_secs()
		);
	}

	fn on_aborted(&self, reason: &str) {
		warn!("Program aborted by {}.", reason);
	}
}

/// Builder for callbacks using function closures
#[derive(Default)]
pub struct CallbackBuilder {
	file_created: Option<Box<PathFn>>,
	file_removed: Option<Box<PathFn>>,
	file_updated: Option<Box<PathFn>>,
	file_unchanged: Option<Box<PathFn>>,
	dir_removed: Option<Box<PathFn>>,
	cycle_complete: Option<Box<SummaryFn>>,
	cycle_failed: Option<Box<ErrorFn>>,
	started: Option<Box<StartedFn>>,
	aborted: Option<Box<ReasonFn>>,
}

impl CallbackBuilder {
	/// Create a new callback builder
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_file_created<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Path) + Send + Sync + 'static,
	{
		self.file_created = Some(Box::new(callback));
		self
	}

	pub fn on_file_removed<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Path) + Send + Sync + 'static,
	{
		self.file_removed = Some(Box::new(callback));
		self
	}

	pub fn on_file_updated<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Path) + Send + Sync + 'static,
	{
		self.file_updated = Some(Box::new(callback));
		self
	}

	pub fn on_file_unchanged<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Path) + Send + Sync + 'static,
	{
		self.file_unchanged = Some(Box::new(callback));
		self
	}

	pub fn on_dir_removed<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Path) + Send + Sync + 'static,
	{
		self.dir_removed = Some(Box::new(callback));
		self
	}

	pub fn on_cycle_complete<F>(mut self, callback: F) -> Self
	where
		F: Fn(&SyncResult) + Send + Sync + 'static,
	{
		self.cycle_complete = Some(Box::new(callback));
		self
	}

	pub fn on_cycle_failed<F>(mut self, callback: F) -> Self
	where
		F: Fn(&SyncError) + Send + Sync + 'static,
	{
		self.cycle_failed = Some(Box::new(callback));
		self
	}

	pub fn on_started<F>(mut self, callback: F) -> Self
	where
		F: Fn(&Path, &Path, Duration) + Send + Sync + 'static,
	{
		self.started = Some(Box::new(callback));
		self
	}

	pub fn on_aborted<F>(mut self, callback: F) -> Self
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.aborted = Some(Box::new(callback));
		self
	}

	/// Build the callbacks handler
	pub fn build(self) -> Box<dyn SyncCallbacks> {
		Box::new(CompositeCallbacks {
			file_created: self.file_created,
			file_removed: self.file_removed,
			file_updated: self.file_updated,
			file_unchanged: self.file_unchanged,
			dir_removed: self.dir_removed,
			cycle_complete: self.cycle_complete,
			cycle_failed: self.cycle_failed,
			started: self.started,
			aborted: self.aborted,
		})
	}
}

/// Internal composite callbacks implementation
struct CompositeCallbacks {
	file_created: Option<Box<PathFn>>,
	file_removed: Option<Box<PathFn>>,
	file_updated: Option<Box<PathFn>>,
	file_unchanged: Option<Box<PathFn>>,
	dir_removed: Option<Box<PathFn>>,
	cycle_complete: Option<Box<SummaryFn>>,
	cycle_failed: Option<Box<ErrorFn>>,
	started: Option<Box<StartedFn>>,
	aborted: Option<Box<ReasonFn>>,
}

impl SyncCallbacks for CompositeCallbacks {
	fn on_file_created(&self, path: &Path) {
		if let Some(ref callback) = self.file_created {
			callback(path);
		}
	}

	fn on_file_removed(&self, path: &Path) {
		if let Some(ref callback) = self.file_removed {
			callback(path);
		}
	}

	fn on_file_updated(&self, path: &Path) {
		if let Some(ref callback) = self.file_updated {
			callback(path);
		}
	}

	fn on_file_unchanged(&self, path: &Path) {
		if let Some(ref callback) = self.file_unchanged {
			callback(path);
		}
	}

	fn on_dir_removed(&self, path: &Path) {
		if let Some(ref callback) = self.dir_removed {
			callback(path);
		}
	}

	fn on_cycle_complete(&self, result: &SyncResult) {
		if let Some(ref callback) = self.cycle_complete {
			callback(result);
		}
	}

	fn on_cycle_failed(&self, error: &SyncError) {
		if let Some(ref callback) = self.cycle_failed {
			callback(error);
		}
	}

	fn on_started(&self, source: &Path, replica: &Path, interval: Duration) {
		if let Some(ref callback) = self.started {
			callback(source, replica, interval);
		}
	}

	fn on_aborted(&self, reason: &str) {
		if let Some(ref callback) = self.aborted {
			callback(reason);
		}
	}
}


// vim: ts=4

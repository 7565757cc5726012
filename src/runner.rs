//! The periodic mirroring loop
//!
//! Startup validation, one cycle per interval, and cooperative shutdown. A
//! cycle always runs to completion; the shutdown future is only consulted
//! between cycles.

use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::callbacks::SyncCallbacks;
use crate::config::Config;
use crate::error::SyncError;
use crate::logging::*;
use crate::signal::Shutdown;
use crate::sync::{self, SyncOptions};
use crate::types::SyncResult;

/// What a finished loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
	pub cycles: usize,
	pub failed_cycles: usize,
	/// Counters summed over all successful cycles
	pub totals: SyncResult,
}

/// Check the source root and create the replica root if needed
pub fn prepare_roots(config: &Config) -> Result<(), SyncError> {
	if !config.source.is_dir() {
		error!("Source folder {} does not exist. Aborting program.", config.source.display());
		return Err(SyncError::SourceNotFound { path: config.source.clone() });
	}

	if !config.replica.is_dir() {
		warn!(
			"Replica folder {} does not exist. Creating a replica folder in that path.",
			config.replica.display()
		);
		fs::create_dir_all(&config.replica).map_err(|e| SyncError::io(&config.replica, e))?;
	}
	Ok(())
}

/// Run one cycle on the blocking thread pool
async fn run_cycle(
	source: PathBuf,
	replica: PathBuf,
	options: Arc<SyncOptions>,
	callbacks: Arc<dyn SyncCallbacks>,
) -> Result<SyncResult, SyncError> {
	let handle = tokio::task::spawn_blocking(move || {
		sync::sync(&source, &replica, &options, callbacks.as_ref())
	});
	handle.await?
}

/// Validate, prepare and run a single cycle
pub async fn run_once(
	config: &Config,
	callbacks: Arc<dyn SyncCallbacks>,
) -> Result<SyncResult, SyncError> {
	config.validate()?;
	prepare_roots(config)?;
	let options = Arc::new(SyncOptions::from_config(config)?);

	callbacks.on_cycle_start();
	let result =
		run_cycle(config.source.clone(), config.replica.clone(), options, callbacks.clone())
			.await?;
	callbacks.on_cycle_complete(&result);
	Ok(result)
}

/// Sync every `config.sync_interval()` until `shutdown` resolves
///
/// Startup errors are returned; failures inside a cycle are reported to
/// `callbacks` and retried at the next interval.
pub async fn run<S>(
	config: &Config,
	callbacks: Arc<dyn SyncCallbacks>,
	shutdown: S,
) -> Result<RunSummary, SyncError>
where
	S: Future<Output = Shutdown>,
{
	config.validate()?;
	prepare_roots(config)?;
	let options = Arc::new(SyncOptions::from_config(config)?);
	if options.dry_run {
		warn!("Dry run: the replica will not be modified.");
	}

	callbacks.on_started(&config.source, &config.replica, config.sync_interval());

	tokio::pin!(shutdown);
	let mut summary = RunSummary::default();

	loop {
		callbacks.on_cycle_start();
		let outcome = run_cycle(
			config.source.clone(),
			config.replica.clone(),
			options.clone(),
			callbacks.clone(),
		)
		.await;
		summary.cycles += 1;

		match outcome {
			Ok(result) => {
				summary.totals.files_created += result.files_created;
				summary.totals.files_removed += result.files_removed;
				summary.totals.files_updated += result.files_updated;
				callbacks.on_cycle_complete(&result);
			}
			Err(e) => {
				summary.failed_cycles += 1;
				callbacks.on_cycle_failed(&e);
			}
		}

		tokio::select! {
			reason = &mut shutdown => {
				callbacks.on_aborted(&reason.to_string());
				return Ok(summary);
			}
			_ = tokio::time::sleep(config.sync_interval()) => {}
		}
	}
}


// vim: ts=4

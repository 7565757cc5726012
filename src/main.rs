// vim: ts=4
use std::error::Error;
use std::sync::Arc;

use replicr::callbacks::{SyncCallbacks, TracingCallbacks};
use replicr::logging::{self, *};
use replicr::signal::ShutdownListener;
use replicr::{cli, runner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = cli::command().get_matches();
	let config = cli::config_from_matches(&matches)?;

	logging::init_tracing(Some(config.log_file.as_path()), &config.log_level)?;
	debug!("Effective configuration: {:?}", config);

	let callbacks: Arc<dyn SyncCallbacks> = Arc::new(TracingCallbacks);

	if matches.get_flag("once") {
		runner::run_once(&config, callbacks).await?;
		return Ok(());
	}

	let mut listener = ShutdownListener::new()?;
	let summary = runner::run(&config, callbacks, listener.recv()).await?;
	debug!("Stopped after {} cycle(s), {} failed", summary.cycles, summary.failed_cycles);

	Ok(())
}

//! Interrupt handling for graceful termination
//!
//! Handlers are installed when the listener is created, so an interrupt that
//! arrives while a cycle is running is held until the loop asks for it.

use std::fmt;
use std::io;

use crate::logging::*;

/// Why the loop was asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
	/// SIGINT / Ctrl-C
	Interrupt,
	/// SIGTERM
	Terminate,
	/// Stopped programmatically
	Requested,
}

impl fmt::Display for Shutdown {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Shutdown::Interrupt => write!(f, "keyboard interrupt"),
			Shutdown::Terminate => write!(f, "termination signal"),
			Shutdown::Requested => write!(f, "shutdown request"),
		}
	}
}

/// Listens for SIGINT and SIGTERM (Ctrl-C elsewhere)
pub struct ShutdownListener {
	#[cfg(unix)]
	sigint: tokio::signal::unix::Signal,
	#[cfg(unix)]
	sigterm: tokio::signal::unix::Signal,
}

impl ShutdownListener {
	/// Install the signal handlers; must be called inside a tokio runtime
	#[cfg(unix)]
	pub fn new() -> io::Result<Self> {
		use tokio::signal::unix::{signal, SignalKind};

		let sigint = signal(SignalKind::interrupt())?;
		let sigterm = signal(SignalKind::terminate())?;
		Ok(Self { sigint, sigterm })
	}

	#[cfg(not(unix))]
	pub fn new() -> io::Result<Self> {
		Ok(Self {})
	}

	/// Wait for the next interrupt
	#[cfg(unix)]
	pub async fn recv(&mut self) -> Shutdown {
		tokio::select! {
			_ = self.sigint.recv() => {
				debug!("Received SIGINT, exiting gracefully...");
				Shutdown::Interrupt
			}
			_ = self.sigterm.recv() => {
				debug!("Received SIGTERM, exiting gracefully...");
				Shutdown::Terminate
			}
		}
	}

	#[cfg(not(unix))]
	pub async fn recv(&mut self) -> Shutdown {
		if let Err(e) = tokio::signal::ctrl_c().await {
			warn!("Failed to listen for Ctrl-C: {}. Stopping.", e);
		}
		Shutdown::Interrupt
	}
}


// vim: ts=4

//! Command line definition and its merge into [`Config`]

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::SyncError;

pub fn command() -> Command {
	Command::new("replicr")
		.version(env!("CARGO_PKG_VERSION"))
		.about("One-way two folder synchronization")
		.arg(
			Arg::new("src")
				.long("src")
				.value_name("PATH")
				.value_parser(value_parser!(PathBuf))
				.help("Source folder path [default: source]"),
		)
		.arg(
			Arg::new("repl")
				.long("repl")
				.value_name("PATH")
				.value_parser(value_parser!(PathBuf))
				.help("Replica folder path [default: replica]"),
		)
		.arg(
			Arg::new("logf")
				.long("logf")
				.value_name("PATH")
				.value_parser(value_parser!(PathBuf))
				.help("Log file path [default: log.txt]"),
		)
		.arg(
			Arg::new("sync-time")
				.long("sync-time")
				.value_name("SECONDS")
				.value_parser(value_parser!(u64))
				.help("Synchronization time interval in seconds [default: 60]"),
		)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.value_parser(value_parser!(PathBuf))
				.help("TOML configuration file"),
		)
		.arg(
			Arg::new("exclude")
				.long("exclude")
				.value_name("GLOB")
				.action(ArgAction::Append)
				.help("Leave matching paths out of the mirror (repeatable)"),
		)
		.arg(
			Arg::new("dry-run")
				.long("dry-run")
				.action(ArgAction::SetTrue)
				.help("Report changes without modifying the replica"),
		)
		.arg(
			Arg::new("prune-empty-dirs")
				.long("prune-empty-dirs")
				.action(ArgAction::SetTrue)
				.help("Remove replica folders emptied by deletions"),
		)
		.arg(
			Arg::new("once")
				.long("once")
				.action(ArgAction::SetTrue)
				.help("Run a single synchronization and exit"),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.value_name("LEVEL")
				.help("Log filter used when RUST_LOG is not set [default: info]"),
		)
}

/// Build the effective configuration: defaults, config file, environment,
/// then the flags present in `matches`
pub fn config_from_matches(matches: &ArgMatches) -> Result<Config, SyncError> {
	let mut config = match matches.get_one::<PathBuf>("config") {
		Some(path) => Config::from_file(path)?,
		None => Config::default(),
	};
	config.apply_env()?;
	apply_flags(&mut config, matches);
	Ok(config)
}

fn apply_flags(config: &mut Config, matches: &ArgMatches) {
	if let Some(src) = matches.get_one::<PathBuf>("src") {
		config.source = src.clone();
	}
	if let Some(repl) = matches.get_one::<PathBuf>("repl") {
		config.replica = repl.clone();
	}
	if let Some(logf) = matches.get_one::<PathBuf>("logf") {
		config.log_file = logf.clone();
	}
	if let Some(secs) = matches.get_one::<u64>("sync-time") {
		config.sync_interval_secs = *secs;
	}
	if let Some(patterns) = matches.get_many::<String>("exclude") {
		config.exclude_patterns.extend(patterns.cloned());
	}
	if matches.get_flag("dry-run") {
		config.dry_run = true;
	}
	if matches.get_flag("prune-empty-dirs") {
		config.prune_empty_dirs = true;
	}
	if let Some(level) = matches.get_one::<String>("log-level") {
		config.log_level = level.clone();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Config {
		let matches = command().try_get_matches_from(args).unwrap();
		let mut config = Config::default();
		apply_flags(&mut config, &matches);
		config
	}

	#[test]
	fn test_command_is_consistent() {
		command().debug_assert();
	}

	#[test]
	fn test_no_flags_keep_defaults() {
		assert_eq!(parse(&["replicr"]), Config::default());
	}

	#[test]
	fn test_flags_override() {
		let config = parse(&[
			"replicr",
			"--src",
			"/a",
			"--repl",
			"/b",
			"--logf",
			"/tmp/sync.log",
			"--sync-time",
			"5",
			"--exclude",
			"*.tmp",
			"--exclude",
			".git/**",
			"--dry-run",
		]);
		assert_eq!(config.source, PathBuf::from("/a"));
		assert_eq!(config.replica, PathBuf::from("/b"));
		assert_eq!(config.log_file, PathBuf::from("/tmp/sync.log"));
		assert_eq!(config.sync_interval_secs, 5);
		assert_eq!(config.exclude_patterns, vec!["*.tmp".to_string(), ".git/**".to_string()]);
		assert!(config.dry_run);
		assert!(!config.prune_empty_dirs);
	}

	#[test]
	fn test_sync_time_must_be_integer() {
		assert!(command().try_get_matches_from(["replicr", "--sync-time", "soon"]).is_err());
	}

	#[test]
	fn test_once_flag() {
		let matches = command().try_get_matches_from(["replicr", "--once"]).unwrap();
		assert!(matches.get_flag("once"));
	}
}

// vim: ts=4

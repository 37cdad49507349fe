//! Command line and environment configuration

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use keypath_ops::EngineConfig;
use std::time::Duration;

/// Default per-call deadline in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Engine settings
    pub engine: EngineConfig,
    /// Deadline for each tool call
    pub timeout: Duration,
    /// Force debug-level logs
    pub debug: bool,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            debug: false,
            json_logs: false,
        }
    }
}

impl ServerConfig {
    /// Build from parsed arguments
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        let indent = matches
            .get_one::<usize>("indent")
            .copied()
            .unwrap_or(defaults.engine.indent);
        let timeout = matches
            .get_one::<u64>("timeout-ms")
            .map_or(defaults.timeout, |ms| Duration::from_millis(*ms));

        Self {
            engine: EngineConfig::new()
                .with_indent(indent)
                .with_cache(!matches.get_flag("no-cache")),
            timeout,
            debug: matches.get_flag("debug"),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}

/// Command line definition
#[must_use]
pub fn command() -> Command {
    Command::new("keypath")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dot-notation key operations on JSON files over JSON-RPC on stdio")
        .arg(
            Arg::new("indent")
                .long("indent")
                .env("KEYPATH_INDENT")
                .default_value("2")
                .value_parser(value_parser!(usize))
                .help("Spaces per indentation level in written files (0 = compact)"),
        )
        .arg(
            Arg::new("no-cache")
                .long("no-cache")
                .env("KEYPATH_NO_CACHE")
                .action(ArgAction::SetTrue)
                .help("Re-read files on every operation"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .env("KEYPATH_TIMEOUT_MS")
                .default_value("30000")
                .value_parser(value_parser!(u64))
                .help("Deadline for each tool call in milliseconds"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .env("KEYPATH_DEBUG")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .env("KEYPATH_JSON_LOGS")
                .action(ArgAction::SetTrue)
                .help("Write logs to stderr as JSON lines"),
        )
}

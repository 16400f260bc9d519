// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::handler::EXECUTOR_JOB_HANDLER;

/// Command-line arguments for `jobexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobexec",
    version,
    about = "Run a data-integration job as a subprocess and report its outcome.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the runner config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Jobexec.toml")]
    pub config: String,

    /// Path to the trigger request (JSON, as sent by the scheduler).
    #[arg(long, value_name = "PATH")]
    pub request: String,

    /// Name of the job handler to dispatch to.
    #[arg(long, value_name = "NAME", default_value = EXECUTOR_JOB_HANDLER)]
    pub handler: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the command line that would be launched, but don't run it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

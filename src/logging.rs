// src/logging.rs

//! Logging setup for `jobexec` using `tracing` + `tracing-subscriber`.
//!
//! One stderr subscriber carries two kinds of events: the runner's own
//! tracing and the external program's output, forwarded on the
//! [`JOB_LOG_TARGET`] target. `JOBEXEC_LOG` takes `EnvFilter` directives, so
//! the two can be tuned separately, e.g. `info,job_log=off` or
//! `warn,job_log=info`.
//!
//! `--log-level` sets the base level and wins over a bare level in
//! `JOBEXEC_LOG`. Target directives from the variable always apply.
//!
//! STDOUT carries only the JSON execution result.

use anyhow::Result;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding extra filter directives.
pub const LOG_ENV: &str = "JOBEXEC_LOG";

/// Target the job's own output is logged under.
pub const JOB_LOG_TARGET: &str = "job_log";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::try_new(filter_directives(cli_level, env.as_deref()).join(","))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Directives for the subscriber filter, base level first.
///
/// Unparseable entries in `env` are skipped.
pub fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> Vec<String> {
    let mut base = cli_level.map(level_directive).unwrap_or("info").to_string();
    let mut targeted = Vec::new();

    let entries = env
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty());

    for entry in entries {
        if entry.parse::<LevelFilter>().is_ok() {
            if cli_level.is_none() {
                base = entry.to_lowercase();
            }
        } else if entry.parse::<Directive>().is_ok() {
            targeted.push(entry.to_string());
        }
    }

    std::iter::once(base).chain(targeted).collect()
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

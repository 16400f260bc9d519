// src/lib.rs

pub mod callback;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod handler;
pub mod logging;
pub mod sink;
pub mod types;

use std::fs as std_fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::callback::LoggingCallback;
use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::exec::{CommandLine, JobRunner, ProcessRegistry};
use crate::fs::RealFileSystem;
use crate::handler::{EXECUTOR_JOB_HANDLER, HandlerRegistry};
use crate::sink::TracingLogs;
use crate::types::{ExecutionResult, TriggerRequest, UNSET_EXIT_CODE};

/// High-level entry point used by `main.rs`.
///
/// Loads the runner config and the trigger request, dispatches the request to
/// the named handler and prints the result as JSON. Returns whether the job
/// succeeded. Ctrl-C abandons the run; the temp file is still removed and the
/// child killed.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading config from {:?}", args.config))?;
    let request = load_request(&args.request)
        .with_context(|| format!("loading trigger request from {:?}", args.request))?;

    if args.dry_run {
        print_dry_run(&cfg, &request)?;
        return Ok(true);
    }

    let runner = JobRunner::new(
        cfg,
        Arc::new(RealFileSystem),
        Arc::new(TracingLogs),
        Arc::new(LoggingCallback),
        ProcessRegistry::new(),
    );

    let mut handlers = HandlerRegistry::new();
    handlers.register(EXECUTOR_JOB_HANDLER, Arc::new(runner));
    debug!(handlers = ?handlers.names().collect::<Vec<_>>(), "job handlers ready");

    info!(handler = %args.handler, log_id = request.log_id, "dispatching job");

    let result = tokio::select! {
        res = handlers.dispatch(&args.handler, &request) => res?,
        _ = tokio::signal::ctrl_c() => {
            warn!(log_id = request.log_id, "interrupted; abandoning job");
            ExecutionResult::from_exit_code(UNSET_EXIT_CODE)
        }
    };

    println!("{}", serde_json::to_string(&result)?);
    Ok(result.is_success())
}

/// Read a trigger request from a JSON file.
pub fn load_request(path: impl AsRef<Path>) -> errors::Result<TriggerRequest> {
    let contents = std_fs::read_to_string(path.as_ref())?;
    let request = serde_json::from_str(&contents)?;
    Ok(request)
}

/// Print the command line the request would launch, without running it.
fn print_dry_run(cfg: &ConfigFile, request: &TriggerRequest) -> Result<()> {
    let temp_path = cfg
        .temp
        .dir
        .join(format!("{}-<uuid>.{}", cfg.temp.prefix, cfg.temp.extension));
    let line = CommandLine::for_request(cfg, request, &temp_path)?;

    println!("jobexec dry-run");
    println!("  log_id: {}", request.log_id);
    println!("  temp dir: {}", cfg.temp.dir.display());
    println!("  drain join timeout: {:?}", cfg.drain_join_timeout);
    println!("  argv:");
    for token in line.tokens() {
        println!("    {token}");
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

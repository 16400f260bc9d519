// src/exec/runner.rs

//! The job runner: one trigger request in, one execution result out.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::callback::ProcessCallback;
use crate::config::ConfigFile;
use crate::errors::JobExecError;
use crate::exec::command::CommandLine;
use crate::exec::drain::{DrainGroup, StreamKind};
use crate::exec::registry::ProcessRegistry;
use crate::exec::temp_file::TempConfigFile;
use crate::fs::FileSystem;
use crate::handler::JobHandler;
use crate::sink::{LogSink, LogSinkProvider};
use crate::types::{ExecutionResult, ProcessReport, TriggerRequest, UNSET_EXIT_CODE, observed_exit_code};

/// Runs the external data-integration program for a trigger request.
///
/// Each call to [`execute`](Self::execute) is independent: it writes its own
/// temp config file, launches its own process and cleans both up before
/// returning. A runner can serve concurrent calls; each call logs to the sink
/// its [`LogSinkProvider`] hands out for that request.
#[derive(Debug, Clone)]
pub struct JobRunner {
    config: Arc<ConfigFile>,
    fs: Arc<dyn FileSystem>,
    logs: Arc<dyn LogSinkProvider>,
    callback: Arc<dyn ProcessCallback>,
    registry: ProcessRegistry,
}

impl JobRunner {
    pub fn new(
        config: ConfigFile,
        fs: Arc<dyn FileSystem>,
        logs: Arc<dyn LogSinkProvider>,
        callback: Arc<dyn ProcessCallback>,
        registry: ProcessRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fs,
            logs,
            callback,
            registry,
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// The command line `request` would launch against `temp_path`.
    pub fn command_line(&self, request: &TriggerRequest, temp_path: &Path) -> crate::errors::Result<CommandLine> {
        CommandLine::for_request(&self.config, request, temp_path)
    }

    /// Run the job to completion.
    ///
    /// Never fails: launch errors, I/O errors and non-zero exits all come back
    /// as [`ExecutionResult::Failed`]. The temp config file is gone by the
    /// time this returns.
    pub async fn execute(&self, request: &TriggerRequest) -> ExecutionResult {
        self.execute_with_cancel(request, CancellationToken::new()).await
    }

    /// Like [`execute`](Self::execute), but `cancel` kills the process early.
    ///
    /// A cancelled run reports the sentinel exit code. Dropping the returned
    /// future instead also kills the child and removes the temp file.
    pub async fn execute_with_cancel(
        &self,
        request: &TriggerRequest,
        cancel: CancellationToken,
    ) -> ExecutionResult {
        let sink = self.logs.sink_for(request);
        let mut temp = TempConfigFile::materialize(
            Arc::clone(&self.fs),
            &self.config.temp,
            &request.job_json,
            sink.as_ref(),
        );

        let exit_code = match self.run_process(request, temp.path(), &sink, &cancel).await {
            Ok(code) => code,
            Err(err) => {
                error!(log_id = request.log_id, error = %err, "job execution error");
                sink.append(&format!("job execution error: {err:#}"));
                UNSET_EXIT_CODE
            }
        };

        temp.cleanup();

        let result = ExecutionResult::from_exit_code(exit_code);
        info!(
            log_id = request.log_id,
            exit_code,
            success = result.is_success(),
            "job finished"
        );
        result
    }

    async fn run_process(
        &self,
        request: &TriggerRequest,
        temp_path: &Path,
        sink: &Arc<dyn LogSink>,
        cancel: &CancellationToken,
    ) -> Result<i32> {
        let command_line = self.command_line(request, temp_path)?;
        info!(log_id = request.log_id, cmd = %command_line, "starting job process");
        sink.append(&format!("command: {command_line}"));

        let mut child = command_line
            .to_command()
            .spawn()
            .with_context(|| format!("spawning job process '{}'", command_line.program()))?;

        // Held until this function returns; removes the registry entry.
        let _tracked = match child.id() {
            Some(pid) => Some(self.track(request, pid, temp_path, sink.as_ref())),
            None => {
                warn!(log_id = request.log_id, "job process exited before its pid was read");
                None
            }
        };

        let mut drains = DrainGroup::new(cancel.child_token());
        if let Some(stdout) = child.stdout.take() {
            drains.spawn(stdout, StreamKind::Stdout, Arc::clone(sink));
        }
        if let Some(stderr) = child.stderr.take() {
            drains.spawn(stderr, StreamKind::Stderr, Arc::clone(sink));
        }

        let status = tokio::select! {
            status = child.wait() => status.context("waiting for job process")?,
            _ = cancel.cancelled() => {
                warn!(log_id = request.log_id, "cancellation requested; killing job process");
                sink.append("job cancelled; killing process");
                if let Err(err) = child.kill().await {
                    warn!(log_id = request.log_id, error = %err, "failed to kill job process");
                }
                drains.join(self.config.drain_join_timeout).await;
                return Err(JobExecError::Cancelled.into());
            }
        };

        if !drains.join(self.config.drain_join_timeout).await {
            sink.append("process output still open after exit; stopped reading");
        }

        let code = observed_exit_code(status);
        info!(
            log_id = request.log_id,
            exit_code = code,
            success = status.success(),
            "job process exited"
        );
        sink.append(&format!("process exit value: {code}"));
        Ok(code)
    }

    /// Record `pid` and report it to the scheduler before the run proceeds.
    fn track(
        &self,
        request: &TriggerRequest,
        pid: u32,
        temp_path: &Path,
        sink: &dyn LogSink,
    ) -> TrackedProcess<'_> {
        info!(log_id = request.log_id, pid, "job process started");
        sink.append(&format!("process id: {pid}"));
        self.registry.insert(pid, temp_path);

        if let Err(err) = self.callback.push(ProcessReport::new(request, pid)) {
            warn!(log_id = request.log_id, pid, error = %err, "process callback failed");
            sink.append(&format!("process callback failed: {err:#}"));
        }

        TrackedProcess {
            registry: &self.registry,
            pid,
        }
    }
}

/// Registry entry that lives as long as the process is being run.
struct TrackedProcess<'a> {
    registry: &'a ProcessRegistry,
    pid: u32,
}

impl Drop for TrackedProcess<'_> {
    fn drop(&mut self) {
        self.registry.remove(self.pid);
    }
}

impl JobHandler for JobRunner {
    fn execute<'a>(
        &'a self,
        request: &'a TriggerRequest,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        Box::pin(JobRunner::execute(self, request))
    }
}

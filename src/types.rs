// src/types.rs

//! Data exchanged with the scheduler: the inbound trigger request, the
//! terminal execution result, and the process report sent back out of band.

use std::fmt;
use std::process::ExitStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exit code used when no process status was observed (launch failure,
/// setup error, cancellation).
pub const UNSET_EXIT_CODE: i32 = -1;

/// Immutable input for a single job run.
///
/// Field names follow the scheduler's JSON payload (camelCase, millisecond
/// timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    /// Opaque job configuration, written verbatim to the temp file.
    pub job_json: String,

    /// Runtime (JVM) arguments for the external program.
    #[serde(default)]
    pub jvm_param: Option<String>,

    /// Parameter template with two numeric slots:
    /// (previous start, trigger time), both in whole seconds.
    #[serde(default)]
    pub replace_param: Option<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub trigger_time: DateTime<Utc>,

    /// Start time of the previous run.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,

    pub log_id: i64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub log_date_time: DateTime<Utc>,
}

impl TriggerRequest {
    /// JVM argument string, if present and not blank.
    pub fn jvm_arguments(&self) -> Option<&str> {
        non_blank(self.jvm_param.as_deref())
    }

    /// Parameter template, if present and not blank.
    pub fn param_template(&self) -> Option<&str> {
        non_blank(self.replace_param.as_deref())
    }
}

/// Exit code reported for a finished process.
///
/// On Unix a process killed by signal `n` reports `128 + n`, the way a shell
/// does. Elsewhere a status without a code maps to [`UNSET_EXIT_CODE`].
pub fn observed_exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNSET_EXIT_CODE
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Terminal outcome of a job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionResult {
    Success,
    Failed { exit_code: i32, message: String },
}

impl ExecutionResult {
    /// Map an observed (or sentinel) exit code to a result.
    ///
    /// `0` is success; anything else is a failure whose message embeds the code.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            ExecutionResult::Success
        } else {
            ExecutionResult::Failed {
                exit_code: code,
                message: format!("command exit value({code}) is failed"),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success)
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionResult::Success => 0,
            ExecutionResult::Failed { exit_code, .. } => *exit_code,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success => None,
            ExecutionResult::Failed { message, .. } => Some(message),
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionResult::Success => write!(f, "success"),
            ExecutionResult::Failed { message, .. } => write!(f, "failed: {message}"),
        }
    }
}

/// Identity of a running process, reported to the scheduler so it can track
/// or cancel the job while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub log_id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub log_date_time: DateTime<Utc>,
    pub process_id: String,
}

impl ProcessReport {
    pub fn new(request: &TriggerRequest, pid: u32) -> Self {
        Self {
            log_id: request.log_id,
            log_date_time: request.log_date_time,
            process_id: pid.to_string(),
        }
    }
}

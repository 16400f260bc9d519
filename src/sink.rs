// src/sink.rs

//! Line-oriented job logs.
//!
//! The runner writes its own trace lines (command built, process id, exit
//! code) and every line the external program prints into a [`LogSink`].
//! Each trigger gets its own sink from a [`LogSinkProvider`], so concurrent
//! runs on one runner never share a log. Durable storage is the sink
//! implementation's concern.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::logging::JOB_LOG_TARGET;
use crate::types::TriggerRequest;

/// Append-only sink for one job's log lines.
pub trait LogSink: Send + Sync + Debug {
    fn append(&self, line: &str);
}

/// Hands out the log a trigger request writes to.
pub trait LogSinkProvider: Send + Sync + Debug {
    fn sink_for(&self, request: &TriggerRequest) -> Arc<dyn LogSink>;
}

/// Sink that forwards every line as a `tracing` event on the [`JOB_LOG_TARGET`] target,
/// tagged with the trigger's log id and log timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingLogSink {
    log_id: i64,
    log_date_time: DateTime<Utc>,
}

impl TracingLogSink {
    pub fn for_request(request: &TriggerRequest) -> Self {
        Self {
            log_id: request.log_id,
            log_date_time: request.log_date_time,
        }
    }
}

impl LogSink for TracingLogSink {
    fn append(&self, line: &str) {
        info!(
            target: JOB_LOG_TARGET,
            log_id = self.log_id,
            log_date_time = %self.log_date_time.timestamp_millis(),
            "{}",
            line
        );
    }
}

/// Provider of [`TracingLogSink`]s, one per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogs;

impl LogSinkProvider for TracingLogs {
    fn sink_for(&self, request: &TriggerRequest) -> Arc<dyn LogSink> {
        Arc::new(TracingLogSink::for_request(request))
    }
}

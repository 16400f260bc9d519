// src/callback.rs

//! Side channel that tells the scheduler which OS process is running a job.
//!
//! Delivery is fire-and-forget: the runner logs a failed push and carries on.

use std::fmt::Debug;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::types::ProcessReport;

/// Receiver of process reports.
pub trait ProcessCallback: Send + Sync + Debug {
    /// Queue `report` for delivery. Must not block.
    fn push(&self, report: ProcessReport) -> Result<()>;
}

/// Forwards reports over an unbounded channel to whatever delivers them
/// (e.g. an HTTP callback loop owned by the embedding service).
#[derive(Debug, Clone)]
pub struct ChannelCallback {
    tx: mpsc::UnboundedSender<ProcessReport>,
}

impl ChannelCallback {
    pub fn new(tx: mpsc::UnboundedSender<ProcessReport>) -> Self {
        Self { tx }
    }

    /// Create a callback together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProcessReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProcessCallback for ChannelCallback {
    fn push(&self, report: ProcessReport) -> Result<()> {
        self.tx
            .send(report)
            .map_err(|e| anyhow!("process callback receiver dropped (log_id {})", e.0.log_id))
    }
}

/// Logs each report; used when no scheduler is listening (CLI runs).
#[derive(Debug, Clone, Default)]
pub struct LoggingCallback;

impl ProcessCallback for LoggingCallback {
    fn push(&self, report: ProcessReport) -> Result<()> {
        info!(
            log_id = report.log_id,
            log_date_time = %report.log_date_time,
            pid = %report.process_id,
            "process started"
        );
        Ok(())
    }
}

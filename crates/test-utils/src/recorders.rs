use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use jobexec::callback::ProcessCallback;
use jobexec::sink::{LogSink, LogSinkProvider};
use jobexec::types::{ProcessReport, TriggerRequest};

/// A log sink that keeps every appended line in memory.
///
/// Used as a [`LogSinkProvider`], it hands each request a view tagged with
/// that request's log id; all views share one line buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<(Option<i64>, String)>>>,
    log_id: Option<i64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Lines appended through the view handed out for `log_id`.
    pub fn lines_for(&self, log_id: i64) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == Some(log_id))
            .map(|(_, l)| l.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|(_, l)| l.contains(needle))
    }

    pub fn count_exact(&self, line: &str) -> usize {
        self.lines.lock().unwrap().iter().filter(|(_, l)| l == line).count()
    }
}

impl LogSink for RecordingSink {
    fn append(&self, line: &str) {
        self.lines.lock().unwrap().push((self.log_id, line.to_string()));
    }
}

impl LogSinkProvider for RecordingSink {
    fn sink_for(&self, request: &TriggerRequest) -> Arc<dyn LogSink> {
        Arc::new(Self {
            lines: Arc::clone(&self.lines),
            log_id: Some(request.log_id),
        })
    }
}

/// A process callback that records reports, or fails every push.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallback {
    reports: Arc<Mutex<Vec<ProcessReport>>>,
    fail: bool,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback whose pushes always fail (after recording the report).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<ProcessReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ProcessCallback for RecordingCallback {
    fn push(&self, report: ProcessReport) -> anyhow::Result<()> {
        self.reports.lock().unwrap().push(report);
        if self.fail {
            return Err(anyhow!("scheduler unreachable"));
        }
        Ok(())
    }
}

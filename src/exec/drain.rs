// src/exec/drain.rs

//! Concurrent draining of a child's stdout / stderr into a [`LogSink`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::sink::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// Forward `stream` to `sink` line by line until end-of-stream, a read error,
/// or cancellation. Returns the number of lines forwarded.
///
/// Lines are decoded lossily and lose their trailing `\n` / `\r\n`. A read
/// error is logged and ends the drain; it is never escalated.
pub async fn drain_lines<R>(
    stream: R,
    kind: StreamKind,
    sink: Arc<dyn LogSink>,
    cancel: CancellationToken,
) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::with_capacity(256);
    let mut lines = 0u64;

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(stream = %kind, lines, "drain cancelled");
                break;
            }
            res = reader.read_until(b'\n', &mut buf) => res,
        };

        match read {
            Ok(0) => break,
            Ok(_) => {
                sink.append(&decode_line(&buf));
                lines += 1;
            }
            Err(err) => {
                warn!(stream = %kind, error = %err, "error reading process output");
                sink.append(&format!("error reading process {kind}: {err}"));
                break;
            }
        }
    }

    lines
}

fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// The drain tasks of one run, sharing one cancellation token.
///
/// Dropping the group signals cancellation to any drain still running, so an
/// early return never leaves a reader behind unsupervised.
#[derive(Debug)]
pub struct DrainGroup {
    cancel: CancellationToken,
    handles: Vec<(StreamKind, JoinHandle<u64>)>,
}

impl DrainGroup {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            handles: Vec::with_capacity(2),
        }
    }

    /// Start draining `stream` on its own task.
    pub fn spawn<R>(&mut self, stream: R, kind: StreamKind, sink: Arc<dyn LogSink>)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(drain_lines(stream, kind, sink, cancel));
        self.handles.push((kind, handle));
    }

    /// True while any drain task has not finished.
    pub fn is_active(&self) -> bool {
        self.handles.iter().any(|(_, h)| !h.is_finished())
    }

    /// Signal every drain task to stop at its next read.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait up to `bound` for all drains to reach end-of-stream.
    ///
    /// Stragglers are then cancelled and awaited; they exit at their next
    /// suspension point, so this returns shortly after `bound` rather than
    /// exactly at it. Returns `false` if cancellation was needed.
    pub async fn join(&mut self, bound: Duration) -> bool {
        if timeout(bound, self.join_all()).await.is_ok() {
            return true;
        }

        warn!(
            bound_ms = bound.as_millis() as u64,
            "output drains still active after process exit; cancelling"
        );
        self.cancel();
        self.join_all().await;
        false
    }

    async fn join_all(&mut self) {
        while let Some((kind, handle)) = self.handles.last_mut() {
            let kind = *kind;
            let res = handle.await;
            self.handles.pop();

            match res {
                Ok(lines) => debug!(stream = %kind, lines, "output drain finished"),
                Err(err) if err.is_panic() => {
                    error!(stream = %kind, error = %err, "output drain panicked")
                }
                Err(err) => debug!(stream = %kind, error = %err, "output drain aborted"),
            }
        }
    }
}

impl Drop for DrainGroup {
    fn drop(&mut self) {
        if self.is_active() {
            self.cancel.cancel();
        }
    }
}

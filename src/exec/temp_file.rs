// src/exec/temp_file.rs

//! Per-run temp file holding the job configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::TempSection;
use crate::fs::FileSystem;
use crate::sink::LogSink;

/// A job configuration file owned by exactly one run.
///
/// The file is removed by [`cleanup`](Self::cleanup) or, failing that, when
/// the value is dropped, so it never outlives the run that created it.
#[derive(Debug)]
pub struct TempConfigFile {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    cleaned: bool,
}

impl TempConfigFile {
    /// Write `payload` verbatim to `<dir>/<prefix>-<uuid>.<extension>`.
    ///
    /// A failure to create the directory or write the file is logged and
    /// otherwise ignored: the path is still returned, and the launch that
    /// follows is expected to fail against the missing file.
    pub fn materialize(
        fs: Arc<dyn FileSystem>,
        temp: &TempSection,
        payload: &str,
        sink: &dyn LogSink,
    ) -> Self {
        let file_name = format!(
            "{}-{}.{}",
            temp.prefix,
            Uuid::new_v4().simple(),
            temp.extension
        );
        let path = temp.dir.join(file_name);

        if let Err(err) = fs.create_dir_all(&temp.dir) {
            warn!(dir = ?temp.dir, error = %err, "could not create temp config directory");
            sink.append(&format!("temp config directory could not be created: {err:#}"));
        }

        match fs.write(&path, payload.as_bytes()) {
            Ok(()) => debug!(path = ?path, bytes = payload.len(), "wrote temp job config"),
            Err(err) => {
                error!(path = ?path, error = %err, "writing temp job config failed");
                sink.append(&format!("temp config file write failed: {err:#}"));
            }
        }

        Self {
            path,
            fs,
            cleaned: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file if it still exists. Runs at most once.
    pub fn cleanup(&mut self) {
        if self.cleaned {
            return;
        }
        self.cleaned = true;

        if !self.fs.exists(&self.path) {
            return;
        }
        match self.fs.remove_file(&self.path) {
            Ok(()) => debug!(path = ?self.path, "removed temp job config"),
            Err(err) => warn!(path = ?self.path, error = %err, "failed to remove temp job config"),
        }
    }
}

impl Drop for TempConfigFile {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use jobexec::config::ConfigFile;
use jobexec::exec::{JobRunner, ProcessRegistry};
use jobexec::fs::{FileSystem, RealFileSystem};

pub use jobexec_test_utils::builders;
pub use jobexec_test_utils::recorders::{RecordingCallback, RecordingSink};
pub use jobexec_test_utils::{init_tracing, with_timeout};

/// A runner on the real filesystem wired to recording fakes.
pub struct Harness {
    pub runner: JobRunner,
    pub sink: RecordingSink,
    pub callback: RecordingCallback,
}

impl Harness {
    pub fn new(config: ConfigFile) -> Self {
        Self::with_parts(config, Arc::new(RealFileSystem), RecordingCallback::new())
    }

    pub fn with_parts(
        config: ConfigFile,
        fs: Arc<dyn FileSystem>,
        callback: RecordingCallback,
    ) -> Self {
        let sink = RecordingSink::new();
        let runner = JobRunner::new(
            config,
            fs,
            Arc::new(sink.clone()),
            Arc::new(callback.clone()),
            ProcessRegistry::new(),
        );
        Self {
            runner,
            sink,
            callback,
        }
    }
}

/// Shell snippet that stores the last positional argument (the temp config
/// path) in `$last`.
pub const LAST_ARG: &str = r#"for last in "$@"; do :; done"#;

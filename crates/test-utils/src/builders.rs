#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jobexec::config::{ConfigFile, OptionsSection, RawConfigFile, RunnerSection, TempSection};
use jobexec::types::TriggerRequest;

/// Trigger time used by default in tests: 2023-11-14T22:13:20Z.
pub const TRIGGER_MS: i64 = 1_700_000_000_000;
/// Previous start used by default in tests: 1000s before `TRIGGER_MS`.
pub const START_MS: i64 = 1_699_999_000_000;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Defaults to running scripts with `sh` so tests need no executable bit.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            config: RawConfigFile {
                runner: RunnerSection {
                    interpreter: "sh".to_string(),
                    script_path: script_path.into(),
                    drain_join_timeout: "2s".to_string(),
                },
                temp: TempSection::default(),
                options: OptionsSection::default(),
            },
        }
    }

    pub fn interpreter(mut self, interpreter: &str) -> Self {
        self.config.runner.interpreter = interpreter.to_string();
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp.dir = dir.into();
        self
    }

    pub fn temp_name(mut self, prefix: &str, extension: &str) -> Self {
        self.config.temp.prefix = prefix.to_string();
        self.config.temp.extension = extension.to_string();
        self
    }

    pub fn drain_join_timeout(mut self, timeout: &str) -> Self {
        self.config.runner.drain_join_timeout = timeout.to_string();
        self
    }

    pub fn space_placeholder(mut self, placeholder: &str) -> Self {
        self.config.options.space_placeholder = placeholder.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for `TriggerRequest`.
pub struct TriggerRequestBuilder {
    request: TriggerRequest,
}

impl TriggerRequestBuilder {
    pub fn new(job_json: &str) -> Self {
        Self {
            request: TriggerRequest {
                job_json: job_json.to_string(),
                jvm_param: None,
                replace_param: None,
                trigger_time: millis(TRIGGER_MS),
                start_time: millis(START_MS),
                log_id: 1,
                log_date_time: millis(TRIGGER_MS),
            },
        }
    }

    pub fn jvm_param(mut self, jvm: &str) -> Self {
        self.request.jvm_param = Some(jvm.to_string());
        self
    }

    pub fn replace_param(mut self, template: &str) -> Self {
        self.request.replace_param = Some(template.to_string());
        self
    }

    pub fn trigger_time_ms(mut self, ms: i64) -> Self {
        self.request.trigger_time = millis(ms);
        self
    }

    pub fn start_time_ms(mut self, ms: i64) -> Self {
        self.request.start_time = millis(ms);
        self
    }

    pub fn log_id(mut self, log_id: i64) -> Self {
        self.request.log_id = log_id;
        self
    }

    pub fn build(self) -> TriggerRequest {
        self.request
    }
}

pub fn millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).expect("timestamp in range")
}

/// Write a POSIX shell script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("writing test script");
    path
}

/// Files currently in `dir` (empty if `dir` doesn't exist).
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}

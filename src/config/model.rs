// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [runner]
/// interpreter = "python"
/// script_path = "/opt/datax/bin/datax.py"
/// drain_join_timeout = "5s"
///
/// [temp]
/// dir = "/var/lib/jobexec/json"
/// prefix = "jobTmp"
/// extension = "conf"
///
/// [options]
/// jvm_flag = "-j"
/// params_flag = "-p"
/// quote = "\""
/// space_placeholder = "%"
/// ```
///
/// Only `runner.script_path` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub runner: RunnerSection,

    #[serde(default)]
    pub temp: TempSection,

    #[serde(default)]
    pub options: OptionsSection,
}

/// `[runner]` section: what to launch and how long to wait for its output.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    pub script_path: PathBuf,

    /// How long to keep draining output after the process exits before the
    /// drain tasks are asked to stop. Duration string (`250ms`, `5s`, ...).
    #[serde(default = "default_drain_join_timeout")]
    pub drain_join_timeout: String,
}

fn default_interpreter() -> String {
    "python".to_string()
}

fn default_drain_join_timeout() -> String {
    "5s".to_string()
}

/// `[temp]` section: where per-run job configuration files are written.
#[derive(Debug, Clone, Deserialize)]
pub struct TempSection {
    #[serde(default = "default_temp_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_temp_prefix")]
    pub prefix: String,

    #[serde(default = "default_temp_extension")]
    pub extension: String,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("jobexec").join("json")
}

fn default_temp_prefix() -> String {
    "jobTmp".to_string()
}

fn default_temp_extension() -> String {
    "conf".to_string()
}

impl Default for TempSection {
    fn default() -> Self {
        Self {
            dir: default_temp_dir(),
            prefix: default_temp_prefix(),
            extension: default_temp_extension(),
        }
    }
}

/// `[options]` section: literals used to build the options document.
///
/// The external script is expected to turn `space_placeholder` back into
/// spaces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionsSection {
    #[serde(default = "default_jvm_flag")]
    pub jvm_flag: String,

    #[serde(default = "default_params_flag")]
    pub params_flag: String,

    #[serde(default = "default_quote")]
    pub quote: String,

    #[serde(default = "default_space_placeholder")]
    pub space_placeholder: String,
}

fn default_jvm_flag() -> String {
    "-j".to_string()
}

fn default_params_flag() -> String {
    "-p".to_string()
}

fn default_quote() -> String {
    "\"".to_string()
}

fn default_space_placeholder() -> String {
    "%".to_string()
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            jvm_flag: default_jvm_flag(),
            params_flag: default_params_flag(),
            quote: default_quote(),
            space_placeholder: default_space_placeholder(),
        }
    }
}

/// Validated configuration.
///
/// Construct via `ConfigFile::try_from(RawConfigFile)` or
/// [`load_and_validate`](crate::config::load_and_validate).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub interpreter: String,
    pub script_path: PathBuf,
    pub drain_join_timeout: Duration,
    pub temp: TempSection,
    pub options: OptionsSection,
}

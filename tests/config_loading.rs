// tests/config_loading.rs
mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use jobexec::config::{load_and_validate, parse_duration, ConfigFile};
use jobexec::errors::JobExecError;
use jobexec::load_request;

type TestResult = Result<(), Box<dyn Error>>;

fn config_from(toml: &str) -> Result<ConfigFile, JobExecError> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{toml}")?;
    load_and_validate(file.path())
}

/// Sanity-check that demos/Jobexec.toml is wired the way the README describes.
#[test]
fn demo_config_is_parsed_correctly() -> TestResult {
    init_tracing();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/Jobexec.toml"))?;

    assert_eq!(cfg.interpreter, "python");
    assert_eq!(cfg.script_path, PathBuf::from("/opt/datax/bin/datax.py"));
    assert_eq!(cfg.drain_join_timeout, Duration::from_secs(10));
    assert_eq!(cfg.temp.dir, PathBuf::from("/var/lib/jobexec/json"));
    assert_eq!(cfg.temp.prefix, "jobTmp");
    assert_eq!(cfg.temp.extension, "conf");
    assert_eq!(cfg.options.jvm_flag, "-j");
    assert_eq!(cfg.options.params_flag, "-p");
    assert_eq!(cfg.options.quote, "\"");
    assert_eq!(cfg.options.space_placeholder, "%");
    Ok(())
}

#[test]
fn minimal_config_gets_defaults() -> TestResult {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/minimal.toml"))?;

    assert_eq!(cfg.interpreter, "python");
    assert_eq!(cfg.drain_join_timeout, Duration::from_secs(5));
    assert!(cfg.temp.dir.ends_with("jobexec/json"));
    assert_eq!(cfg.temp.prefix, "jobTmp");
    assert_eq!(cfg.temp.extension, "conf");
    assert_eq!(cfg.options, jobexec::config::OptionsSection::default());
    Ok(())
}

#[test]
fn demo_request_is_parsed_correctly() -> TestResult {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let request = load_request(manifest_dir.join("demos/request.json"))?;

    assert_eq!(request.log_id, 42);
    assert_eq!(request.jvm_arguments(), Some("-Xms1G -Xmx1G"));
    assert_eq!(
        request.param_template(),
        Some("-DlastTime=%s -DcurrentTime=%s")
    );
    assert_eq!(request.trigger_time.timestamp(), 1_700_000_000);
    assert_eq!(request.start_time.timestamp(), 1_699_999_000);
    assert_eq!(request.log_date_time.timestamp_millis(), 1_700_000_000_123);
    assert!(request.job_json.starts_with("{\"job\""));
    Ok(())
}

#[test]
fn request_without_optional_params_is_accepted() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"{{"jobJson":"{{}}","triggerTime":0,"startTime":0,"logId":1,"logDateTime":0}}"#
    )?;

    let request = load_request(file.path())?;
    assert_eq!(request.jvm_param, None);
    assert_eq!(request.replace_param, None);
    assert_eq!(request.job_json, "{}");
    Ok(())
}

#[test]
fn placeholder_containing_space_is_rejected() {
    let result = config_from(
        r#"
[runner]
script_path = "datax.py"

[options]
space_placeholder = "a b"
"#,
    );

    match result {
        Err(JobExecError::Config(msg)) => assert!(msg.contains("space_placeholder")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn empty_script_path_is_rejected() {
    let result = config_from(
        r#"
[runner]
script_path = ""
"#,
    );

    match result {
        Err(JobExecError::Config(msg)) => assert!(msg.contains("script_path")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn prefix_with_path_separator_is_rejected() {
    let result = config_from(
        r#"
[runner]
script_path = "datax.py"

[temp]
prefix = "../escape"
"#,
    );

    match result {
        Err(JobExecError::Config(msg)) => assert!(msg.contains("[temp].prefix")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn bad_drain_timeout_is_rejected() {
    let result = config_from(
        r#"
[runner]
script_path = "datax.py"
drain_join_timeout = "5 fortnights"
"#,
    );

    match result {
        Err(JobExecError::Config(msg)) => assert!(msg.contains("drain_join_timeout")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn missing_runner_section_is_a_toml_error() {
    match config_from("[temp]\nprefix = \"x\"\n") {
        Err(JobExecError::Toml(_)) => {}
        other => panic!("Expected Toml error, got: {:?}", other),
    }
}

#[test]
fn builder_and_raw_conversion_agree() -> TestResult {
    let raw = ConfigFileBuilder::new("job.sh").drain_join_timeout("250ms").raw();
    let cfg = ConfigFile::try_from(raw)?;
    assert_eq!(cfg.interpreter, "sh");
    assert_eq!(cfg.drain_join_timeout, Duration::from_millis(250));
    Ok(())
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("5d").is_err());
}

// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{JobExecError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = JobExecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_runner(&raw)?;
        validate_temp(&raw)?;
        validate_options(&raw)?;

        let drain_join_timeout = parse_duration(&raw.runner.drain_join_timeout).map_err(|e| {
            JobExecError::Config(format!("[runner].drain_join_timeout: {e}"))
        })?;

        Ok(ConfigFile {
            interpreter: raw.runner.interpreter,
            script_path: raw.runner.script_path,
            drain_join_timeout,
            temp: raw.temp,
            options: raw.options,
        })
    }
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    require_non_empty("[runner].interpreter", &cfg.runner.interpreter)?;
    if cfg.runner.script_path.as_os_str().is_empty() {
        return Err(JobExecError::Config(
            "[runner].script_path must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_temp(cfg: &RawConfigFile) -> Result<()> {
    require_non_empty("[temp].prefix", &cfg.temp.prefix)?;
    require_non_empty("[temp].extension", &cfg.temp.extension)?;

    for (key, value) in [("prefix", &cfg.temp.prefix), ("extension", &cfg.temp.extension)] {
        if value.contains(['/', '\\']) {
            return Err(JobExecError::Config(format!(
                "[temp].{key} must not contain path separators (got {value:?})"
            )));
        }
    }
    Ok(())
}

fn validate_options(cfg: &RawConfigFile) -> Result<()> {
    let options = &cfg.options;
    require_non_empty("[options].jvm_flag", &options.jvm_flag)?;
    require_non_empty("[options].params_flag", &options.params_flag)?;
    require_non_empty("[options].space_placeholder", &options.space_placeholder)?;

    if options.space_placeholder.contains(' ') {
        return Err(JobExecError::Config(format!(
            "[options].space_placeholder must not contain spaces (got {:?})",
            options.space_placeholder
        )));
    }
    Ok(())
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(JobExecError::Config(format!("{key} must not be empty")));
    }
    Ok(())
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

// src/exec/command.rs

//! Command-line construction for the external program.
//!
//! The argument vector is always
//! `[interpreter, script_path, (options document), temp_file_path]`.
//! The options document carries the JVM arguments and the filled parameter
//! template as one argument; its spaces are swapped for the configured
//! placeholder so the launcher can't split it. The script undoes the swap.

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tokio::process::Command;

use crate::config::{ConfigFile, OptionsSection};
use crate::errors::{JobExecError, Result};
use crate::types::TriggerRequest;

/// Build the raw options document (spaces not yet escaped).
///
/// Order is fixed: JVM option first, then the parameter option, separated by
/// a single space when both are present. Returns an empty string when the
/// request carries neither.
pub fn build_options_document(request: &TriggerRequest, options: &OptionsSection) -> Result<String> {
    let mut doc = String::new();
    let mut has_jvm = false;

    if let Some(jvm) = request.jvm_arguments() {
        doc.push_str(&options.jvm_flag);
        push_quoted(&mut doc, jvm, &options.quote);
        has_jvm = true;
    }

    if let Some(template) = request.param_template() {
        let previous_secs = whole_seconds(request.start_time);
        let trigger_secs = whole_seconds(request.trigger_time);
        let params = fill_template(template, previous_secs, trigger_secs)?;

        if has_jvm {
            doc.push(' ');
        }
        doc.push_str(&options.params_flag);
        push_quoted(&mut doc, &params, &options.quote);
    }

    Ok(doc)
}

/// Milliseconds truncated toward zero, so pre-epoch times round up.
fn whole_seconds(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis() / 1000
}

fn push_quoted(doc: &mut String, value: &str, quote: &str) {
    doc.push_str(quote);
    doc.push_str(value);
    doc.push_str(quote);
}

/// Replace every literal space with `placeholder`.
pub fn escape_spaces(doc: &str, placeholder: &str) -> String {
    doc.replace(' ', placeholder)
}

static SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%([%sd])").expect("valid regex"));

/// Fill the parameter template's slots positionally.
///
/// `%s` and `%d` take `previous_secs` then `trigger_secs`; `%%` renders a
/// literal `%`. A template with more than two slots is rejected.
pub fn fill_template(template: &str, previous_secs: i64, trigger_secs: i64) -> Result<String> {
    let values = [previous_secs, trigger_secs];

    let mut out = String::with_capacity(template.len() + 16);
    let mut used = 0;
    let mut last = 0;

    for caps in SLOT.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);

        if &caps[1] == "%" {
            out.push('%');
        } else {
            let value = values.get(used).ok_or_else(|| {
                JobExecError::Template(format!(
                    "parameter template {template:?} has more than {} slots",
                    values.len()
                ))
            })?;
            out.push_str(&value.to_string());
            used += 1;
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}

/// Ordered argument vector for one launch. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Assemble the argument vector from config, the raw options document and
    /// the temp file path.
    pub fn build(config: &ConfigFile, options_document: &str, temp_path: &Path) -> Self {
        let mut tokens = Vec::with_capacity(4);
        tokens.push(config.interpreter.clone());
        tokens.push(config.script_path.to_string_lossy().into_owned());
        if !options_document.trim().is_empty() {
            tokens.push(escape_spaces(
                options_document,
                &config.options.space_placeholder,
            ));
        }
        tokens.push(temp_path.to_string_lossy().into_owned());
        Self { tokens }
    }

    /// Build the options document for `request` and assemble the full line.
    pub fn for_request(config: &ConfigFile, request: &TriggerRequest, temp_path: &Path) -> Result<Self> {
        let doc = build_options_document(request, &config.options)?;
        Ok(Self::build(config, &doc, temp_path))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// The escaped options document, if one was appended.
    pub fn options_token(&self) -> Option<&str> {
        (self.tokens.len() == 4).then(|| self.tokens[2].as_str())
    }

    /// A `tokio` command for this line: no shell, both output streams piped,
    /// child killed if the handle is dropped.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! The job runner itself never surfaces these to its caller (every failure is
//! folded into an [`ExecutionResult`](crate::types::ExecutionResult)); they
//! flow through config loading, handler dispatch and command construction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobExecError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("No job handler registered under '{0}'")]
    UnknownHandler(String),

    #[error("Job cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobExecError>;

// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] builds the argument vector (options document, placeholder
//!   escaping, template filling).
//! - [`temp_file`] owns the per-run job config file.
//! - [`drain`] forwards stdout / stderr into the log sink concurrently.
//! - [`registry`] tracks running pids and their temp files.
//! - [`runner`] ties it together: [`JobRunner::execute`].

pub mod command;
pub mod drain;
pub mod registry;
pub mod runner;
pub mod temp_file;

pub use command::CommandLine;
pub use registry::ProcessRegistry;
pub use runner::JobRunner;
pub use temp_file::TempConfigFile;

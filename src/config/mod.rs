// src/config/mod.rs

//! Runner configuration.
//!
//! - `model.rs`: the TOML-backed data model and its defaults.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: turning a raw file into a checked [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, OptionsSection, RawConfigFile, RunnerSection, TempSection};
pub use validate::parse_duration;

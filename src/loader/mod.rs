//! Config loader module
//!
//! Parse resource configurations from YAML or JSON files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `load_config` - Read and validate a config file (format by extension)
//! - `load_config_from_str` - Parse and validate a YAML document
//! - `load_config_from_json` - Parse and validate a JSON document

mod parser;

pub use parser::{load_config, load_config_from_json, load_config_from_str};

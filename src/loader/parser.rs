//! Parser for resource configuration files
//!
//! YAML is the default format; files ending in `.json` are parsed as JSON.

use crate::config::ResourceConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a resource configuration from a file path
pub fn load_config(path: impl AsRef<Path>) -> Result<ResourceConfig> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    debug!("Loaded config file {}", path.display());
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_config_from_json(&content)
    } else {
        load_config_from_str(&content)
    }
}

/// Load a resource configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ResourceConfig> {
    let config: ResourceConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;

    config.validate()?;
    Ok(config)
}

/// Load a resource configuration from a JSON string
pub fn load_config_from_json(json: &str) -> Result<ResourceConfig> {
    let config: ResourceConfig = serde_json::from_str(json)?;

    config.validate()?;
    Ok(config)
}

//! Configuration loading
//!
//! Configuration and course descriptor files may be written as TOML, JSON or
//! YAML; the format is picked from the file extension. Loaded values are
//! layered over defaults by merging their JSON representations.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parse `content` according to `extension` into any deserializable type
pub fn parse_config_str<T>(content: &str, extension: &str) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    match extension.to_lowercase().as_str() {
        "toml" => toml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {}", e))),
        "json" => serde_json::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {}", e))),
        "yml" | "yaml" => serde_yaml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {}", e))),
        other => Err(crate::UtilError::Config(format!(
            "Unsupported config format: {}",
            other
        ))),
    }
}

/// Load a configuration or descriptor file, detecting the format from its extension
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content, &extension)
}

/// Merge two JSON values (second overrides first, objects merge key by key)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Merge a raw JSON value over a typed configuration
fn merge_value<T>(base: &mut T, override_value: serde_json::Value) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| crate::UtilError::Serialization(format!("Base serialization error: {}", e)))?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value).map_err(|e| {
        crate::UtilError::Serialization(format!("Result deserialization error: {}", e))
    })?;

    Ok(())
}

/// Layered configuration builder: defaults, then files.
///
/// Files are merged as partial documents, so a file only needs to mention
/// the keys it changes.
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Load a (possibly partial) file and merge it over the current value
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let partial: serde_json::Value = load_config(path)?;
        merge_value(&mut self.config, partial)?;
        Ok(self)
    }

    /// Load a file when given, otherwise keep the current value
    pub fn load_optional_file(self, path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => self.load_file(path),
            None => Ok(self),
        }
    }

    /// Build final config
    pub fn build(self) -> crate::Result<T> {
        serde_json::to_value(&self.config)
            .map_err(|e| crate::UtilError::Config(format!("Config validation error: {}", e)))?;
        Ok(self.config)
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}

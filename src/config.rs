//! Generator configuration.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{Result, SqlBindError};
use crate::render::BuiltInRenderer;
use crate::types::{Bindings, Value};

/// Configuration for a [`SqlGenerator`](crate::SqlGenerator).
///
/// Loadable from JSON:
///
/// ```json
/// {
///   "bind-variable-render": "SPRING_NAMED_PARAMETER",
///   "default-custom-variables": { "tableName": "names" },
///   "locale": "en-GB"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Placeholder convention (default: `MYBATIS`, i.e. `#{name}`).
    pub bind_variable_render: BuiltInRenderer,
    /// Variables merged into every call, below per-call variables.
    #[serde(deserialize_with = "deserialize_variables")]
    pub default_custom_variables: Bindings,
    /// Locale tag reported to the template evaluator (default: `en-US`).
    pub locale: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bind_variable_render: BuiltInRenderer::MyBatis,
            default_custom_variables: Bindings::new(),
            locale: "en-US".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the JSON is malformed or has unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SqlBindError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        log::debug!("Loading generator config from {}", path.display());
        Self::from_json(&json)
    }
}

fn deserialize_variables<'de, D>(deserializer: D) -> std::result::Result<Bindings, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

//! Engine configuration loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid config: a 6-max table,
//! 100bb stacks and the built-in sizing table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scenario_engine::{
    error::ConfigError,
    models::TableFormat,
    sizing::SizingTable,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_format")]
    pub format: TableFormat,
    /// Scenario-level stack in big blinds; nodes may override it.
    #[serde(default = "default_stack")]
    pub default_stack_bb: f64,
    #[serde(default)]
    pub sizing: SizingTable,
}

fn default_format() -> TableFormat {
    TableFormat::SixMax
}

fn default_stack() -> f64 {
    100.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            format: default_format(),
            default_stack_bb: default_stack(),
            sizing: SizingTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_stack_bb > 0.0) {
            return Err(ConfigError::InvalidStack(self.default_stack_bb));
        }
        for row in self.sizing.rows() {
            if !(row.size_bb > 0.0) {
                return Err(ConfigError::InvalidSizing { action: row.action, size: row.size_bb });
            }
        }
        Ok(())
    }
}

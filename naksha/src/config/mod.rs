//! Unified configuration loading for Naksha.
//!
//! All component configurations live in one YAML file; every field has a
//! default, so a partial file (or none at all) is valid.

mod error;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::matching::MatchConfig;
use crate::relax::RelaxConfig;
use crate::scan::ScanConfig;
use crate::solid::GroupConfig;

pub use error::ConfigLoadError;

/// Location searched by [`NakshaConfig::load_default`].
pub const DEFAULT_CONFIG_PATH: &str = "configs/naksha.yaml";

/// Full Naksha configuration loaded from YAML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NakshaConfig {
    /// Per-scan processing
    #[serde(default)]
    pub scan: ScanConfig,

    /// Scan group fusion
    #[serde(default)]
    pub group: GroupConfig,

    /// Correspondence search
    #[serde(default)]
    pub matching: MatchConfig,

    /// Relaxation solvers
    #[serde(default)]
    pub relax: RelaxConfig,
}

impl NakshaConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from [`DEFAULT_CONFIG_PATH`] if it exists, otherwise defaults.
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.scan
            .validate()
            .and_then(|_| self.group.validate())
            .and_then(|_| self.matching.validate())
            .and_then(|_| self.relax.validate())
            .map_err(ConfigLoadError::Validation)
    }
}

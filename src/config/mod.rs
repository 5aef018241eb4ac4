//! Configuration management for the module resolver
//!
//! Handles configuration loading and validation for resolution and logging.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tie-break among modules with no ordering constraint between them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Earlier registered candidate first (default)
    #[default]
    Registration,
    /// Lexicographic module name, then registration order
    ///
    /// Makes the activation order independent of candidate order.
    Name,
}

/// Resolution configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Ordering among mutually independent modules
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Modules dropped before resolution (matched by name)
    #[serde(default)]
    pub disabled_modules: Vec<String>,
}

impl ResolutionConfig {
    pub fn is_disabled(&self, module: &str) -> bool {
        self.disabled_modules.iter().any(|m| m == module)
    }

    /// Validate resolution configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.disabled_modules.iter().any(|m| m.trim().is_empty()) {
            return Err(anyhow::anyhow!(
                "disabled_modules must not contain empty module names"
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "module_resolver=debug"); RUST_LOG takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

/// Resolver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl ResolverConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ResolverConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ResolverConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.resolution.validate()
    }
}

//! Module manifest parsing and validation
//!
//! A manifest is a declarative module handle: it carries the capability
//! declarations of a module in `module.toml` form and can be resolved
//! directly, without any live module instance behind it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::module::traits::{CandidateSource, ModuleDescriptor, ModuleError, ModuleInfo};
use crate::module::validation::{ManifestValidator, ValidationResult};

/// Module manifest (module.toml structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module name
    pub name: String,
    /// Module version (semantic versioning)
    #[serde(default)]
    pub version: String,
    /// Human-readable description
    pub description: Option<String>,
    /// Module author
    pub author: Option<String>,
    /// Feature names this module requires
    #[serde(default)]
    pub needs: Vec<String>,
    /// Feature names this module offers
    #[serde(default)]
    pub provides: Vec<String>,
    /// Class tags this module expects to find already active
    #[serde(default)]
    pub class_needs: Vec<String>,
    /// Class tags this module can be matched against
    #[serde(default)]
    pub class_provides: Vec<String>,
}

impl ModuleManifest {
    /// Parse a manifest from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ModuleError> {
        let manifest: ModuleManifest = toml::from_str(contents).map_err(|e| {
            ModuleError::InvalidManifest(format!("Failed to parse manifest TOML: {}", e))
        })?;

        if manifest.name.is_empty() {
            return Err(ModuleError::InvalidManifest(
                "Module name cannot be empty".to_string(),
            ));
        }

        Ok(manifest)
    }

    /// Load manifest from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ModuleError::InvalidManifest(format!("Failed to read manifest file: {}", e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ModuleError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Run the manifest validator, mapping failures to [`ModuleError::InvalidManifest`]
    pub fn validate(&self) -> Result<(), ModuleError> {
        match ManifestValidator::new().validate(self) {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(ModuleError::InvalidManifest(errors.join("; "))),
        }
    }
}

fn to_set(names: &[String]) -> BTreeSet<String> {
    names.iter().cloned().collect()
}

impl ModuleInfo for ModuleManifest {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(to_set(&self.needs))
    }

    fn provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(to_set(&self.provides))
    }

    fn class_needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(to_set(&self.class_needs))
    }

    fn class_provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(to_set(&self.class_provides))
    }

    /// Invalid manifests cannot be described and are dropped from resolution
    fn describe(&self) -> Result<ModuleDescriptor, ModuleError> {
        self.validate()?;
        Ok(ModuleDescriptor {
            needs: self.needs()?,
            provides: self.provides()?,
            class_needs: self.class_needs()?,
            class_provides: self.class_provides()?,
        })
    }
}

/// A whole candidate set as one document of `[[module]]` tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSet {
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleManifest>,
}

impl ManifestSet {
    /// Parse a manifest set from TOML text
    ///
    /// Individual manifests are not validated here; invalid ones are
    /// reported as description failures during resolution.
    pub fn from_toml_str(contents: &str) -> Result<Self, ModuleError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ModuleError::InvalidManifest(format!("Failed to read manifest set: {}", e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ModuleError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl CandidateSource for ManifestSet {
    type Handle = ModuleManifest;

    fn candidates(&self) -> Vec<ModuleManifest> {
        self.modules.clone()
    }
}

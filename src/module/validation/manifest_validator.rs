//! Manifest validation framework
//!
//! Validates module manifests for structure and capability declarations.

use tracing::{debug, warn};

use crate::module::registry::manifest::ModuleManifest;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Manifest is valid
    Valid,
    /// Manifest is invalid with specific errors
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Manifest validator
pub struct ManifestValidator {
    /// Maximum module name length
    max_name_len: usize,
    /// Maximum capability / class tag length
    max_capability_len: usize,
}

impl ManifestValidator {
    /// Create a new manifest validator
    pub fn new() -> Self {
        Self {
            max_name_len: 64,
            max_capability_len: 128,
        }
    }

    /// Validate a module manifest
    pub fn validate(&self, manifest: &ModuleManifest) -> ValidationResult {
        let mut errors = Vec::new();

        if manifest.name.is_empty() {
            errors.push("Module name cannot be empty".to_string());
        } else if !self.is_valid_name(&manifest.name) {
            errors.push(format!(
                "Invalid module name: {} (must be alphanumeric with dashes/underscores/dots)",
                manifest.name
            ));
        }

        if !manifest.version.is_empty() && !self.is_valid_version(&manifest.version) {
            errors.push(format!(
                "Invalid version format: {} (expected semantic versioning)",
                manifest.version
            ));
        }

        for (kind, names) in [
            ("need", &manifest.needs),
            ("provide", &manifest.provides),
            ("class need", &manifest.class_needs),
            ("class provide", &manifest.class_provides),
        ] {
            if let Err(cap_errors) = self.validate_capabilities(kind, names) {
                errors.extend(cap_errors);
            }
        }

        self.warn_self_satisfied(manifest);

        if errors.is_empty() {
            debug!("Manifest validation passed for module: {}", manifest.name);
            ValidationResult::Valid
        } else {
            debug!(
                "Manifest validation failed for module {}: {:?}",
                manifest.name, errors
            );
            ValidationResult::Invalid(errors)
        }
    }

    /// Validate module name format
    #[inline]
    fn is_valid_name(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > self.max_name_len {
            return false;
        }

        // Must start with alphanumeric
        if !name.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }

        name.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    }

    /// Validate version format (semantic versioning)
    ///
    /// Accepts: major.minor[.patch][-prerelease][+build]
    #[inline]
    fn is_valid_version(&self, version: &str) -> bool {
        let base = version.split('+').next().unwrap_or(version);
        let version_part = base.split('-').next().unwrap_or(base);

        let nums: Vec<&str> = version_part.split('.').collect();
        if nums.len() < 2 || nums.len() > 3 {
            return false;
        }

        nums.iter()
            .all(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) && n.parse::<u32>().is_ok())
    }

    /// Validate declared capability or class names
    fn validate_capabilities(&self, kind: &str, names: &[String]) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for name in names {
            if name.is_empty() {
                errors.push(format!("Empty {} name", kind));
            } else if name.chars().any(char::is_whitespace) {
                errors.push(format!("{} name contains whitespace: {:?}", kind, name));
            } else if name.len() > self.max_capability_len {
                errors.push(format!(
                    "{} name exceeds {} bytes: {}",
                    kind, self.max_capability_len, name
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// A module never satisfies its own needs; flag declarations that expect it to
    fn warn_self_satisfied(&self, manifest: &ModuleManifest) {
        let features: Vec<&String> = manifest
            .needs
            .iter()
            .filter(|n| manifest.provides.contains(n))
            .collect();
        let classes: Vec<&String> = manifest
            .class_needs
            .iter()
            .filter(|n| manifest.class_provides.contains(n))
            .collect();

        if !features.is_empty() || !classes.is_empty() {
            warn!(
                "Module {} needs what it provides itself (features {:?}, classes {:?}); another module must provide them",
                manifest.name, features, classes
            );
        }
    }
}

impl Default for ManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}

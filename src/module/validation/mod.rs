//! Module validation framework
//!
//! Provides manifest validation and capability declaration validation.

pub mod manifest_validator;

pub use manifest_validator::{ManifestValidator, ValidationResult};

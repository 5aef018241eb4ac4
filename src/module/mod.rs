//! Module system
//!
//! Resolves which optional modules can be activated, and in which order,
//! from the capabilities each one declares it needs and provides.
//!
//! ## Architecture
//!
//! - **Handles**: Callers own their module handles; the resolver only reads
//!   the four declared capability sets through [`ModuleInfo`]
//! - **Graceful Exclusion**: Modules with unmet or cyclic requirements are
//!   dropped, together with everything depending on them, without affecting
//!   unrelated modules
//! - **Full Recomputation**: Every pass starts from the candidate set; only the
//!   last result is cached

pub mod registry;
pub mod traits;
pub mod validation;

pub use registry::{
    DependencyResolution, Exclusion, ExclusionReason, ManifestSet, ModuleDependencies,
    ModuleManifest, ModuleResolver,
};
pub use traits::{CandidateSource, ModuleDescriptor, ModuleError, ModuleInfo};
pub use validation::{ManifestValidator, ValidationResult};

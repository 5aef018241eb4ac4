//! Module Resolver - capability-based activation ordering for optional modules
//!
//! Given a set of dynamically discovered modules, each declaring the named
//! features and module classes it needs and provides, this crate computes
//! which modules can be activated at all and a linear activation order in
//! which every module's requirements are already active before it starts.
//!
//! ## Design Principles
//!
//! 1. **Never Fails on Input**: Resolution always yields a valid, possibly
//!    partial, order; every omission is reported and logged
//! 2. **Transitive Exclusion**: A module is dropped if anything it depends on
//!    is dropped, for any reason
//! 3. **Cycle Containment**: Dependency cycles exclude their participants and
//!    dependents only
//! 4. **Deterministic**: Ties are broken by registration order (or by name)
//!
//! ## Example
//! ```rust
//! use module_resolver::module::{ModuleDependencies, ModuleManifest};
//!
//! let browser = ModuleManifest {
//!     name: "browser".to_string(),
//!     provides: vec!["webbrowser".to_string()],
//!     ..Default::default()
//! };
//! let reader = ModuleManifest {
//!     name: "reader".to_string(),
//!     needs: vec!["webbrowser".to_string()],
//!     ..Default::default()
//! };
//!
//! let resolution = ModuleDependencies::resolve(&[reader, browser]);
//! let order: Vec<&str> = resolution.load_order.iter().map(|m| m.name.as_str()).collect();
//! assert_eq!(order, vec!["browser", "reader"]);
//! ```

pub mod config;
pub mod module;
pub mod utils;

pub use config::{LoggingConfig, ResolutionConfig, ResolverConfig, TieBreak};
pub use module::{
    DependencyResolution, Exclusion, ExclusionReason, ModuleDependencies, ModuleDescriptor,
    ModuleError, ModuleInfo, ModuleResolver,
};

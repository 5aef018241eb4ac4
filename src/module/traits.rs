//! Module system traits and interfaces
//!
//! Defines the narrow introspection contract the resolver needs from a
//! module handle, and the descriptor captured from it once per pass.

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Declared capability sets of a module, captured once per resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Feature names this module requires
    pub needs: BTreeSet<String>,
    /// Feature names this module offers
    pub provides: BTreeSet<String>,
    /// Class tags this module expects to find already active
    pub class_needs: BTreeSet<String>,
    /// Class tags this module can be matched against
    pub class_provides: BTreeSet<String>,
}

impl ModuleDescriptor {
    /// Create an empty descriptor (needs nothing, provides nothing)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_needs<I, S>(mut self, needs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.needs.extend(needs.into_iter().map(Into::into));
        self
    }

    pub fn with_provides<I, S>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides.extend(provides.into_iter().map(Into::into));
        self
    }

    pub fn with_class_needs<I, S>(mut self, class_needs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_needs.extend(class_needs.into_iter().map(Into::into));
        self
    }

    pub fn with_class_provides<I, S>(mut self, class_provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_provides
            .extend(class_provides.into_iter().map(Into::into));
        self
    }
}

/// Introspection contract every resolvable module handle implements
///
/// Accessors must be side-effect free and must return consistent answers
/// for the duration of one resolution pass. The resolver calls `describe`
/// exactly once per candidate per pass.
pub trait ModuleInfo {
    /// Module identity used in diagnostics
    fn name(&self) -> String;

    /// Feature names this module requires
    fn needs(&self) -> Result<BTreeSet<String>, ModuleError>;

    /// Feature names this module offers
    fn provides(&self) -> Result<BTreeSet<String>, ModuleError>;

    /// Class tags this module expects to find already active
    ///
    /// Optional: modules that take no part in class matching keep the default.
    fn class_needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(BTreeSet::new())
    }

    /// Class tags this module can be matched against
    fn class_provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(BTreeSet::new())
    }

    /// Capture all four declared sets
    ///
    /// Fails if any accessor fails; the resolver then drops the module.
    fn describe(&self) -> Result<ModuleDescriptor, ModuleError> {
        Ok(ModuleDescriptor {
            needs: self.needs()?,
            provides: self.provides()?,
            class_needs: self.class_needs()?,
            class_provides: self.class_provides()?,
        })
    }
}

impl<T: ModuleInfo + ?Sized> ModuleInfo for &T {
    fn name(&self) -> String {
        (**self).name()
    }
    fn needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).needs()
    }
    fn provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).provides()
    }
    fn class_needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).class_needs()
    }
    fn class_provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).class_provides()
    }
    fn describe(&self) -> Result<ModuleDescriptor, ModuleError> {
        (**self).describe()
    }
}

impl<T: ModuleInfo + ?Sized> ModuleInfo for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }
    fn needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).needs()
    }
    fn provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).provides()
    }
    fn class_needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).class_needs()
    }
    fn class_provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).class_provides()
    }
    fn describe(&self) -> Result<ModuleDescriptor, ModuleError> {
        (**self).describe()
    }
}

impl<T: ModuleInfo + ?Sized> ModuleInfo for Arc<T> {
    fn name(&self) -> String {
        (**self).name()
    }
    fn needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).needs()
    }
    fn provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).provides()
    }
    fn class_needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).class_needs()
    }
    fn class_provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        (**self).class_provides()
    }
    fn describe(&self) -> Result<ModuleDescriptor, ModuleError> {
        (**self).describe()
    }
}

/// Supplier of the ordered candidate set for one resolution pass
pub trait CandidateSource {
    /// Handle type handed back in the resolved order
    type Handle;

    /// Candidates in registration order
    fn candidates(&self) -> Vec<Self::Handle>;
}

impl<H: Clone> CandidateSource for [H] {
    type Handle = H;

    fn candidates(&self) -> Vec<H> {
        self.to_vec()
    }
}

impl<H: Clone> CandidateSource for Vec<H> {
    type Handle = H;

    fn candidates(&self) -> Vec<H> {
        self.clone()
    }
}

/// Module system errors
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Module descriptor unavailable: {0}")]
    DescriptorUnavailable(String),

    #[error("Invalid module manifest: {0}")]
    InvalidManifest(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<toml::de::Error> for ModuleError {
    fn from(e: toml::de::Error) -> Self {
        ModuleError::SerializationError(e.to_string())
    }
}

impl From<toml::ser::Error> for ModuleError {
    fn from(e: toml::ser::Error) -> Self {
        ModuleError::SerializationError(e.to_string())
    }
}

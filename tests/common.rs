//! Shared helpers for resolver integration tests

#![allow(dead_code)]

use module_resolver::{ModuleDescriptor, ModuleError, ModuleInfo};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory module handle with declared capability sets
#[derive(Debug, Clone, Default)]
pub struct TestModule {
    pub name: String,
    pub descriptor: ModuleDescriptor,
    /// When set, the handle refuses introspection
    pub broken: bool,
    /// Number of times `describe` was called
    pub describe_calls: Arc<AtomicUsize>,
}

impl TestModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn needs(mut self, needs: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_needs(needs.iter().copied());
        self
    }

    pub fn provides(mut self, provides: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_provides(provides.iter().copied());
        self
    }

    pub fn class_needs(mut self, classes: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_class_needs(classes.iter().copied());
        self
    }

    pub fn class_provides(mut self, classes: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_class_provides(classes.iter().copied());
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    fn declared(&self) -> Result<&ModuleDescriptor, ModuleError> {
        if self.broken {
            Err(ModuleError::DescriptorUnavailable(format!(
                "{} does not implement the introspection contract",
                self.name
            )))
        } else {
            Ok(&self.descriptor)
        }
    }
}

impl ModuleInfo for TestModule {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(self.declared()?.needs.clone())
    }

    fn provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(self.declared()?.provides.clone())
    }

    fn class_needs(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(self.declared()?.class_needs.clone())
    }

    fn class_provides(&self) -> Result<BTreeSet<String>, ModuleError> {
        Ok(self.declared()?.class_provides.clone())
    }

    fn describe(&self) -> Result<ModuleDescriptor, ModuleError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.declared()?.clone())
    }
}

/// Names of an ordered module list
pub fn names<H: ModuleInfo>(modules: &[H]) -> Vec<String> {
    modules.iter().map(ModuleInfo::name).collect()
}

/// Position of every module in an ordered list
pub fn position(order: &[String], module: &str) -> usize {
    order
        .iter()
        .position(|m| m == module)
        .unwrap_or_else(|| panic!("{} not in {:?}", module, order))
}

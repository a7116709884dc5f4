//! Component discovery
//!
//! Components submit themselves to [`COMPONENTS`] at link time:
//!
//! ```ignore
//! #[linkme::distributed_slice(COMPONENTS)]
//! static USER_SERVICE: ComponentEntry = ComponentEntry::of::<UserService>();
//! ```
//!
//! [`ComponentRegistry::discover`] collects them once at startup. Tests and
//! embedders register components explicitly instead.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;
use trellis_domain::error::{Error, Result};

use super::component::{Injectable, Named};
use super::declaration::Declaration;
use super::descriptor::ComponentDescriptor;

/// Link-time registration of a component
pub struct ComponentEntry {
    /// Component name
    pub name: &'static str,
    /// Compiles the component's declaration
    pub describe: fn() -> ComponentDescriptor,
}

impl ComponentEntry {
    /// Entry for component `C`
    pub const fn of<C: Injectable>() -> Self {
        Self {
            name: C::NAME,
            describe: Declaration::<C>::describe,
        }
    }
}

#[linkme::distributed_slice]
pub static COMPONENTS: [ComponentEntry] = [..];

/// Descriptors of every component, in registration order
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    descriptors: Vec<ComponentDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of every component linked into the binary
    pub fn discover() -> Result<Self> {
        let mut registry = Self::new();
        for entry in COMPONENTS {
            registry.add((entry.describe)())?;
        }
        debug!(components = registry.len(), "components discovered");
        Ok(registry)
    }

    /// Register component `C`
    pub fn register<C: Injectable>(mut self) -> Result<Self> {
        self.add(Declaration::<C>::describe())?;
        Ok(self)
    }

    /// Register a pre-built singleton
    pub fn provide<C>(mut self, instance: Arc<C>) -> Result<Self>
    where
        C: Named + Send + Sync + 'static,
    {
        self.add(ComponentDescriptor::provided(
            C::NAME,
            type_name::<C>(),
            instance,
        ))?;
        Ok(self)
    }

    /// Add a descriptor; empty or duplicate names and repeated method names
    /// are malformed declarations
    pub fn add(&mut self, descriptor: ComponentDescriptor) -> Result<()> {
        if descriptor.name.trim().is_empty() {
            return Err(Error::object_initialization(format!(
                "Component of type \"{}\" has an empty name",
                descriptor.type_name
            )));
        }
        if let Some(existing) = self.get(descriptor.name) {
            return Err(Error::object_initialization(format!(
                "Component \"{}\" is declared twice, by \"{}\" and \"{}\"",
                descriptor.name, existing.type_name, descriptor.type_name
            )));
        }
        let mut methods = HashSet::new();
        if let Some(method) = descriptor.methods.iter().find(|m| !methods.insert(m.name)) {
            return Err(Error::object_initialization(format!(
                "Method \"{}.{}\" is declared twice",
                descriptor.name, method.name
            )));
        }
        self.index.insert(descriptor.name, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor by component name
    pub fn get(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.index.get(name).map(|i| &self.descriptors[*i])
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> &[ComponentDescriptor] {
        &self.descriptors
    }

    /// Component names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no component is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

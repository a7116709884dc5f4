//! Singleton construction
//!
//! Depth-first construction with early registration:
//!
//! 1. Instantiate the bare component and register it as *instantiating*
//! 2. Resolve each constructor dependency, then each property, recursing
//!    into dependencies that are not ready yet
//! 3. Promote the component to *ready*
//!
//! A request for a component that is still instantiating returns the early
//! instance, which breaks construction cycles. A request for a ready
//! component returns it unchanged. Names that are not registered are
//! optional dependencies and are skipped.

use std::collections::HashMap;

use tracing::debug;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::Instance;

use super::descriptor::{ComponentDescriptor, ComponentSource, Wire};
use super::registry::ComponentRegistry;

/// Construction state of a component
#[derive(Clone)]
pub enum LifecycleState {
    /// Created, dependencies still being wired; visible to cycle peers only
    Instantiating(Instance),
    /// Fully wired singleton
    Ready(Instance),
}

impl LifecycleState {
    /// The instance in either state
    pub fn instance(&self) -> &Instance {
        match self {
            Self::Instantiating(instance) | Self::Ready(instance) => instance,
        }
    }

    /// Whether the component is ready
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl std::fmt::Debug for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Instantiating(_) => "Instantiating",
            Self::Ready(_) => "Ready",
        })
    }
}

/// Builds every registered component exactly once
#[derive(Debug)]
pub struct ObjectFactory<'r> {
    registry: &'r ComponentRegistry,
    states: HashMap<&'static str, LifecycleState>,
}

impl<'r> ObjectFactory<'r> {
    /// Factory over `registry`
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            states: HashMap::with_capacity(registry.len()),
        }
    }

    /// Check every declaration, then construct every component
    pub fn initialize(&mut self) -> Result<()> {
        for descriptor in self.registry.descriptors() {
            check_dependencies(descriptor)?;
        }
        for name in self.registry.names() {
            self.create_object_instance(name)?;
        }
        debug!(components = self.states.len(), "object graph ready");
        Ok(())
    }

    /// Construct component `name` and its dependencies
    ///
    /// Returns `None` when `name` is not a registered component.
    pub fn create_object_instance(&mut self, name: &str) -> Result<Option<Instance>> {
        if let Some(state) = self.states.get(name) {
            return Ok(Some(state.instance().clone()));
        }
        let registry = self.registry;
        let Some(descriptor) = registry.get(name) else {
            return Ok(None);
        };

        let instance = match &descriptor.source {
            ComponentSource::Provided(instance) => {
                self.states
                    .insert(descriptor.name, LifecycleState::Ready(instance.clone()));
                return Ok(Some(instance.clone()));
            }
            ComponentSource::Factory(instantiate) => instantiate(),
        };
        debug!(component = descriptor.name, "instantiating");
        self.states.insert(
            descriptor.name,
            LifecycleState::Instantiating(instance.clone()),
        );

        for slot in &descriptor.constructor {
            let dependency = descriptor
                .constructor_dependency(slot)
                .ok_or_else(|| unresolved_constructor(descriptor, slot.index))?;
            self.populate(descriptor.name, dependency, &instance, &slot.wire)?;
        }
        for slot in &descriptor.properties {
            let dependency = descriptor
                .property_dependency(slot)
                .ok_or_else(|| unresolved_property(descriptor, slot.name))?;
            self.populate(descriptor.name, dependency, &instance, &slot.wire)?;
        }

        self.states
            .insert(descriptor.name, LifecycleState::Ready(instance.clone()));
        debug!(component = descriptor.name, "ready");
        Ok(Some(instance))
    }

    fn populate(
        &mut self,
        owner: &str,
        dependency: &str,
        instance: &Instance,
        wire: &Wire,
    ) -> Result<()> {
        match self.create_object_instance(dependency)? {
            Some(resolved) => wire(instance, resolved),
            None => {
                debug!(component = owner, dependency, "optional dependency skipped");
                Ok(())
            }
        }
    }

    /// Current state of component `name`
    pub fn state(&self, name: &str) -> Option<&LifecycleState> {
        self.states.get(name)
    }

    /// Ready singletons by name
    pub fn into_ready(self) -> Result<HashMap<&'static str, Instance>> {
        self.states
            .into_iter()
            .map(|(name, state)| match state {
                LifecycleState::Ready(instance) => Ok((name, instance)),
                LifecycleState::Instantiating(_) => Err(Error::object_initialization(format!(
                    "Component \"{name}\" was left partially constructed"
                ))),
            })
            .collect()
    }
}

fn check_dependencies(descriptor: &ComponentDescriptor) -> Result<()> {
    for slot in &descriptor.constructor {
        if descriptor.constructor_dependency(slot).is_none() {
            return Err(unresolved_constructor(descriptor, slot.index));
        }
    }
    for slot in &descriptor.properties {
        if descriptor.property_dependency(slot).is_none() {
            return Err(unresolved_property(descriptor, slot.name));
        }
    }
    Ok(())
}

fn unresolved_constructor(descriptor: &ComponentDescriptor, index: usize) -> Error {
    Error::object_initialization(format!(
        "Constructor parameter index \"{index}\" of class \"{}\" cannot be injected, is there an unresolved circular dependency?",
        descriptor.name
    ))
}

fn unresolved_property(descriptor: &ComponentDescriptor, property: &str) -> Error {
    Error::object_initialization(format!(
        "Property \"{property}\" of class \"{}\" cannot be injected, is there an unresolved circular dependency?",
        descriptor.name
    ))
}

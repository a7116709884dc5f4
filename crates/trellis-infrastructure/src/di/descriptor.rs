//! Type-erased component descriptions
//!
//! A [`ComponentDescriptor`] is what a [`Declaration`](super::Declaration)
//! compiles down to: everything the factory and the route table need,
//! without the component's concrete type.

use std::fmt;
use std::sync::Arc;

use trellis_domain::error::Result;
use trellis_domain::value_objects::{Instance, Invoker, JobInvoker, Metadata};

/// Writes a dependency into an instance
///
/// Arguments are the receiving instance and the dependency.
pub type Wire = Arc<dyn Fn(&Instance, Instance) -> Result<()> + Send + Sync>;

/// How the container obtains the instance
#[derive(Clone)]
pub enum ComponentSource {
    /// Instantiate a bare instance and wire it
    Factory(fn() -> Instance),
    /// Pre-built instance, ready as is
    Provided(Instance),
}

/// Declared type of a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Component name known at declaration time
    Resolved(&'static str),
    /// Name supplied by a lazy resolver
    Unresolved,
}

/// Constructor dependency at a parameter index
#[derive(Clone)]
pub struct ConstructorSlot {
    /// Parameter index
    pub index: usize,
    /// Declared type
    pub dependency: Dependency,
    /// Writer for the dependency
    pub wire: Wire,
}

/// Lazy resolver for an unresolved constructor parameter
#[derive(Debug, Clone, Copy)]
pub struct ConstructorCircularRef {
    /// Parameter index
    pub index: usize,
    /// Returns the component name of the parameter
    pub resolver: fn() -> &'static str,
}

/// Property dependency
#[derive(Clone)]
pub struct PropertySlot {
    /// Property name
    pub name: &'static str,
    /// Declared type
    pub dependency: Dependency,
    /// Writer for the dependency
    pub wire: Wire,
}

/// Lazy resolver for an unresolved property
#[derive(Debug, Clone, Copy)]
pub struct PropertyCircularRef {
    /// Property name
    pub name: &'static str,
    /// Returns the component name of the property
    pub resolver: fn() -> &'static str,
}

/// A method and its declared facts
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Method name
    pub name: &'static str,
    /// Facts in declaration order
    pub facts: Vec<Metadata>,
    /// Positional argument count
    pub arity: usize,
    /// Handler entry point
    pub invoker: Option<Invoker>,
    /// Scheduled job entry point
    pub job: Option<JobInvoker>,
}

/// Everything declared about one component
#[derive(Clone)]
pub struct ComponentDescriptor {
    /// Component name
    pub name: &'static str,
    /// Rust type name, for diagnostics
    pub type_name: &'static str,
    /// Instance source
    pub source: ComponentSource,
    /// Constructor dependencies in parameter order
    pub constructor: Vec<ConstructorSlot>,
    /// Resolvers of unresolved constructor parameters
    pub constructor_circular: Vec<ConstructorCircularRef>,
    /// Property dependencies in declaration order
    pub properties: Vec<PropertySlot>,
    /// Resolvers of unresolved properties
    pub property_circular: Vec<PropertyCircularRef>,
    /// Component-level facts
    pub facts: Vec<Metadata>,
    /// Declared methods
    pub methods: Vec<MethodDescriptor>,
}

impl ComponentDescriptor {
    /// Descriptor of a pre-built instance with no dependencies
    pub fn provided(name: &'static str, type_name: &'static str, instance: Instance) -> Self {
        Self {
            name,
            type_name,
            source: ComponentSource::Provided(instance),
            constructor: Vec::new(),
            constructor_circular: Vec::new(),
            properties: Vec::new(),
            property_circular: Vec::new(),
            facts: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Method by name
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Component name of constructor parameter `index`
    ///
    /// `None` when the parameter is unresolved and no resolver was declared.
    pub fn constructor_dependency(&self, slot: &ConstructorSlot) -> Option<&'static str> {
        match slot.dependency {
            Dependency::Resolved(name) => Some(name),
            Dependency::Unresolved => self
                .constructor_circular
                .iter()
                .find(|circular| circular.index == slot.index)
                .map(|circular| (circular.resolver)()),
        }
    }

    /// Component name of a property
    ///
    /// `None` when the property is unresolved and no resolver was declared.
    pub fn property_dependency(&self, slot: &PropertySlot) -> Option<&'static str> {
        match slot.dependency {
            Dependency::Resolved(name) => Some(name),
            Dependency::Unresolved => self
                .property_circular
                .iter()
                .find(|circular| circular.name == slot.name)
                .map(|circular| (circular.resolver)()),
        }
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("constructor", &self.constructor.len())
            .field("properties", &self.properties.len())
            .field(
                "methods",
                &self.methods.iter().map(|m| m.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("facts", &self.facts.len())
            .field("handler", &self.invoker.is_some())
            .field("job", &self.job.is_some())
            .finish()
    }
}

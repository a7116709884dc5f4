//! Frozen object graph
//!
//! [`Container::initialize`] constructs every registered component and
//! records the facts of every declaration into a [`MetadataRegistry`].
//! Afterwards the container is read-only and can be shared freely.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use trellis_application::metadata::MetadataRegistry;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::{Instance, Invoker, JobInvoker, ScheduleMetadata};

use super::component::Named;
use super::factory::ObjectFactory;
use super::registry::ComponentRegistry;

/// Entry points and arity of a method
#[derive(Clone)]
pub struct MethodMetadata {
    /// Method name
    pub name: &'static str,
    /// Positional argument count
    pub arity: usize,
    /// Handler entry point
    pub invoker: Option<Invoker>,
    /// Job entry point
    pub job: Option<JobInvoker>,
}

impl std::fmt::Debug for MethodMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodMetadata")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Resolved shape of a component
#[derive(Debug, Clone)]
pub struct ClassMetadata {
    /// Component name
    pub name: &'static str,
    /// Rust type name
    pub type_name: &'static str,
    /// Component names of constructor parameters, in order
    pub constructor_params: Vec<&'static str>,
    /// `(property, component)` pairs
    pub properties: Vec<(&'static str, &'static str)>,
    /// Declared methods
    pub methods: Vec<MethodMetadata>,
}

impl ClassMetadata {
    /// Method by name
    pub fn method(&self, name: &str) -> Option<&MethodMetadata> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// A scheduled method bound to its singleton
#[derive(Clone)]
pub struct JobBinding {
    /// Owning component
    pub component: &'static str,
    /// Method name
    pub method: &'static str,
    /// Declared schedule
    pub schedule: ScheduleMetadata,
    /// Owning singleton
    pub instance: Instance,
    /// Entry point
    pub job: JobInvoker,
}

/// Read-only singleton graph
pub struct Container {
    instances: HashMap<&'static str, Instance>,
    classes: Vec<ClassMetadata>,
    metadata: MetadataRegistry,
}

impl Container {
    /// Construct every component of `registry`
    ///
    /// Fails with [`Error::ObjectInitialization`] on an unresolved circular
    /// dependency or a malformed declaration.
    pub fn initialize(registry: &ComponentRegistry) -> Result<Self> {
        let mut factory = ObjectFactory::new(registry);
        factory.initialize()?;
        let instances = factory.into_ready()?;

        let mut metadata = MetadataRegistry::new();
        let mut classes = Vec::with_capacity(registry.len());
        for descriptor in registry.descriptors() {
            for fact in &descriptor.facts {
                metadata.define(descriptor.name, None, fact.clone());
            }
            for method in &descriptor.methods {
                for fact in &method.facts {
                    metadata.define(descriptor.name, Some(method.name), fact.clone());
                }
            }
            classes.push(ClassMetadata {
                name: descriptor.name,
                type_name: descriptor.type_name,
                constructor_params: descriptor
                    .constructor
                    .iter()
                    .filter_map(|slot| descriptor.constructor_dependency(slot))
                    .collect(),
                properties: descriptor
                    .properties
                    .iter()
                    .filter_map(|slot| {
                        descriptor
                            .property_dependency(slot)
                            .map(|dependency| (slot.name, dependency))
                    })
                    .collect(),
                methods: descriptor
                    .methods
                    .iter()
                    .map(|method| MethodMetadata {
                        name: method.name,
                        arity: method.arity,
                        invoker: method.invoker.clone(),
                        job: method.job.clone(),
                    })
                    .collect(),
            });
        }

        info!(components = classes.len(), "container initialized");
        Ok(Self {
            instances,
            classes,
            metadata,
        })
    }

    /// Ready singleton registered as `name`
    pub fn instance(&self, name: &str) -> Result<Instance> {
        self.instances.get(name).cloned().ok_or_else(|| {
            Error::object_initialization(format!(
                "Object \"{name}\" is not registered as injectable."
            ))
        })
    }

    /// Ready singleton registered as `name`, typed
    pub fn get_object<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.instance(name)?.downcast::<T>().map_err(|_| {
            Error::object_initialization(format!(
                "Object \"{name}\" is not of type \"{}\"",
                type_name::<T>()
            ))
        })
    }

    /// Ready singleton of component `T`
    pub fn get<T: Named + Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.get_object::<T>(T::NAME)
    }

    /// Whether `name` is a ready singleton
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Component shapes in registration order
    pub fn classes(&self) -> &[ClassMetadata] {
        &self.classes
    }

    /// Shape of component `name`
    pub fn class_metadata(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// Declared facts
    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    /// Handler entry point of `component.method`
    pub fn invoker(&self, component: &str, method: &str) -> Option<&Invoker> {
        self.class_metadata(component)?
            .method(method)?
            .invoker
            .as_ref()
    }

    /// Components declared as controllers, in registration order
    pub fn controllers(&self) -> Vec<&'static str> {
        self.classes
            .iter()
            .filter(|class| self.metadata.route_class(class.name).is_some())
            .map(|class| class.name)
            .collect()
    }

    /// Every scheduled method with its singleton
    pub fn jobs(&self) -> Vec<JobBinding> {
        let mut jobs = Vec::new();
        for class in &self.classes {
            let Some(instance) = self.instances.get(class.name) else {
                continue;
            };
            for method in &class.methods {
                let (Some(job), Some(schedule)) =
                    (&method.job, self.metadata.schedule(class.name, method.name))
                else {
                    continue;
                };
                jobs.push(JobBinding {
                    component: class.name,
                    method: method.name,
                    schedule: schedule.clone(),
                    instance: instance.clone(),
                    job: job.clone(),
                });
            }
        }
        jobs
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field(
                "components",
                &self.classes.iter().map(|c| c.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

//! Component container
//!
//! Singleton object graph built once at startup from component declarations.
//!
//! ```text
//! COMPONENTS (linkme) ──┐
//! register::<T>()  ─────┼──▶ ComponentRegistry ──▶ ObjectFactory ──▶ Container
//! provide(Arc<T>)  ─────┘      descriptors          depth-first        frozen, read-only
//!                                                   early → ready
//! ```
//!
//! A component is a type implementing [`Injectable`]. Its
//! [`Declaration`] lists what the container injects into it and what the
//! runtime needs to know about its methods (routes, bindings, permissions,
//! cache decorators, schedules).
//!
//! Circular references are allowed: a dependency declared with
//! [`Declaration::inject_deferred`] or [`Declaration::property_deferred`]
//! carries no component name, and the declaration must supply a lazy
//! resolver for it with [`Declaration::circular_inject`] or
//! [`Declaration::circular_property`].

pub mod component;
pub mod container;
pub mod declaration;
pub mod descriptor;
pub mod factory;
pub mod registry;

pub use component::{Inject, Injectable, Named};
pub use container::{ClassMetadata, Container, JobBinding, MethodMetadata};
pub use declaration::{Declaration, MethodDeclaration};
pub use descriptor::{
    ComponentDescriptor, ComponentSource, ConstructorCircularRef, ConstructorSlot, Dependency,
    MethodDescriptor, PropertyCircularRef, PropertySlot, Wire,
};
pub use factory::{LifecycleState, ObjectFactory};
pub use registry::{COMPONENTS, ComponentEntry, ComponentRegistry};

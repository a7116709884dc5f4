//! Metadata Registry
//!
//! Append-only multimap from `(component, optional method)` to typed
//! [`Metadata`] facts. Facts are written once at discovery time and only read
//! afterwards, by the container, the route table builder and the scheduler.
//!
//! ## Lookup
//!
//! | Accessor | Fact | Scope |
//! |----------|------|-------|
//! | [`route_class`](MetadataRegistry::route_class) | `RouteClass` | component |
//! | [`route`](MetadataRegistry::route) | `Route` | method |
//! | [`params`](MetadataRegistry::params) | `Param` | method |
//! | [`contexts`](MetadataRegistry::contexts) | `Context` | method |
//! | [`is_non_auth`](MetadataRegistry::is_non_auth) | `NonAuth` | method |
//! | [`permissions`](MetadataRegistry::permissions) | `Permissions` | method |
//! | [`status_code`](MetadataRegistry::status_code) | `StatusCode` | method |
//! | [`cache_directives`](MetadataRegistry::cache_directives) | `Cache` | method |
//! | [`schedule`](MetadataRegistry::schedule) | `Schedule` | method |
//! | [`signature`](MetadataRegistry::signature) | `Signature` | method |

use std::collections::HashMap;

use trellis_domain::value_objects::{
    CacheDirective, ContextBinding, Metadata, MethodSignature, ParamBinding, RouteClassMetadata,
    RouteMetadata, ScheduleMetadata,
};

#[derive(Debug, Default, Clone)]
struct ComponentFacts {
    component: Vec<Metadata>,
    methods: Vec<(&'static str, Vec<Metadata>)>,
}

/// Registry of declared facts
#[derive(Debug, Default, Clone)]
pub struct MetadataRegistry {
    components: HashMap<&'static str, ComponentFacts>,
}

impl MetadataRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fact
    pub fn define(&mut self, component: &'static str, member: Option<&'static str>, fact: Metadata) {
        let facts = self.components.entry(component).or_default();
        match member {
            None => facts.component.push(fact),
            Some(method) => match facts.methods.iter_mut().find(|(name, _)| *name == method) {
                Some((_, method_facts)) => method_facts.push(fact),
                None => facts.methods.push((method, vec![fact])),
            },
        }
    }

    /// All facts of a target, in declaration order
    pub fn facts(&self, component: &str, member: Option<&str>) -> &[Metadata] {
        let Some(facts) = self.components.get(component) else {
            return &[];
        };
        match member {
            None => &facts.component,
            Some(method) => facts
                .methods
                .iter()
                .find(|(name, _)| *name == method)
                .map_or(&[][..], |(_, method_facts)| method_facts.as_slice()),
        }
    }

    /// Methods of a component carrying at least one fact, in declaration order
    pub fn members(&self, component: &str) -> Vec<&'static str> {
        self.components
            .get(component)
            .map(|facts| facts.methods.iter().map(|(name, _)| *name).collect())
            .unwrap_or_default()
    }

    /// Number of components with facts
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no fact has been defined
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn method_facts<'a>(
        &'a self,
        component: &str,
        method: &str,
    ) -> impl Iterator<Item = &'a Metadata> + 'a {
        self.facts(component, Some(method)).iter()
    }
}

// Typed accessors
impl MetadataRegistry {
    /// Route prefix of a controller
    pub fn route_class(&self, component: &str) -> Option<&RouteClassMetadata> {
        self.facts(component, None).iter().find_map(|fact| match fact {
            Metadata::RouteClass(class) => Some(class),
            _ => None,
        })
    }

    /// Route handled by a method
    pub fn route(&self, component: &str, method: &str) -> Option<&RouteMetadata> {
        self.method_facts(component, method).find_map(|fact| match fact {
            Metadata::Route(route) => Some(route),
            _ => None,
        })
    }

    /// Parameter bindings of a method
    pub fn params(&self, component: &str, method: &str) -> Vec<&ParamBinding> {
        self.method_facts(component, method)
            .filter_map(|fact| match fact {
                Metadata::Param(binding) => Some(binding),
                _ => None,
            })
            .collect()
    }

    /// Context bindings of a method
    pub fn contexts(&self, component: &str, method: &str) -> Vec<ContextBinding> {
        self.method_facts(component, method)
            .filter_map(|fact| match fact {
                Metadata::Context(binding) => Some(*binding),
                _ => None,
            })
            .collect()
    }

    /// Whether the method skips authentication
    pub fn is_non_auth(&self, component: &str, method: &str) -> bool {
        self.method_facts(component, method)
            .any(|fact| matches!(fact, Metadata::NonAuth))
    }

    /// Every permission declared on a method
    pub fn permissions(&self, component: &str, method: &str) -> Vec<String> {
        self.method_facts(component, method)
            .filter_map(|fact| match fact {
                Metadata::Permissions(permissions) => Some(permissions.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Declared status code; the last declaration wins
    pub fn status_code(&self, component: &str, method: &str) -> Option<u16> {
        self.method_facts(component, method)
            .filter_map(|fact| match fact {
                Metadata::StatusCode(status) => Some(*status),
                _ => None,
            })
            .last()
    }

    /// Cache decorators of a method, outermost first
    pub fn cache_directives(&self, component: &str, method: &str) -> Vec<&CacheDirective> {
        self.method_facts(component, method)
            .filter_map(|fact| match fact {
                Metadata::Cache(directive) => Some(directive),
                _ => None,
            })
            .collect()
    }

    /// Cron schedule of a job method
    pub fn schedule(&self, component: &str, method: &str) -> Option<&ScheduleMetadata> {
        self.method_facts(component, method)
            .find_map(|fact| match fact {
                Metadata::Schedule(schedule) => Some(schedule),
                _ => None,
            })
    }

    /// Declared signature of a method
    pub fn signature(&self, component: &str, method: &str) -> Option<&MethodSignature> {
        self.method_facts(component, method)
            .find_map(|fact| match fact {
                Metadata::Signature(signature) => Some(signature),
                _ => None,
            })
    }
}

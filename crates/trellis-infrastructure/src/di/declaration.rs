//! Component declarations
//!
//! Builder chains that replace annotation metadata: a component lists its
//! dependencies and, per method, the facts the runtime acts on.

use std::any::type_name;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::Middleware;
use trellis_domain::value_objects::{
    ArgSlots, BindTarget, CacheDirective, CacheOperation, CachePolicy, ContextBinding,
    ContextSource, HttpMethod, Instance, Invoker, JobInvoker, Metadata, MethodFuture,
    MethodSignature, ParamBinding, ParamSource, RouteClassMetadata, RouteMetadata,
    ScheduleMetadata,
};

use super::component::{Inject, Injectable, Named};
use super::descriptor::{
    ComponentDescriptor, ComponentSource, ConstructorCircularRef, ConstructorSlot, Dependency,
    MethodDescriptor, PropertyCircularRef, PropertySlot, Wire,
};

/// Dependencies and methods of component `C`
pub struct Declaration<C> {
    constructor: Vec<ConstructorSlot>,
    constructor_circular: Vec<ConstructorCircularRef>,
    properties: Vec<PropertySlot>,
    property_circular: Vec<PropertyCircularRef>,
    facts: Vec<Metadata>,
    methods: Vec<MethodDescriptor>,
    _component: PhantomData<fn() -> C>,
}

impl<C: Injectable> Declaration<C> {
    fn new() -> Self {
        Self {
            constructor: Vec::new(),
            constructor_circular: Vec::new(),
            properties: Vec::new(),
            property_circular: Vec::new(),
            facts: Vec::new(),
            methods: Vec::new(),
            _component: PhantomData,
        }
    }

    /// Compile the declaration of `C`
    pub fn describe() -> ComponentDescriptor {
        let declaration = C::declare(Self::new());
        ComponentDescriptor {
            name: C::NAME,
            type_name: type_name::<C>(),
            source: ComponentSource::Factory(instantiate::<C>),
            constructor: declaration.constructor,
            constructor_circular: declaration.constructor_circular,
            properties: declaration.properties,
            property_circular: declaration.property_circular,
            facts: declaration.facts,
            methods: declaration.methods,
        }
    }

    /// Mark the component as a controller mounted under `prefix`
    #[must_use]
    pub fn controller<S: Into<String>>(mut self, prefix: S) -> Self {
        self.facts.push(Metadata::RouteClass(RouteClassMetadata {
            prefix: prefix.into(),
        }));
        self
    }

    /// Constructor parameter of component type `T`, at the next index
    #[must_use]
    pub fn inject<T>(mut self, field: fn(&C) -> &Inject<T>) -> Self
    where
        T: Named + Send + Sync + 'static,
    {
        self.constructor.push(ConstructorSlot {
            index: self.constructor.len(),
            dependency: Dependency::Resolved(T::NAME),
            wire: wire(field),
        });
        self
    }

    /// Constructor parameter whose component name is not known yet
    ///
    /// Needs a [`circular_inject`](Self::circular_inject) resolver at the
    /// same index.
    #[must_use]
    pub fn inject_deferred<T>(mut self, field: fn(&C) -> &Inject<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.constructor.push(ConstructorSlot {
            index: self.constructor.len(),
            dependency: Dependency::Unresolved,
            wire: wire(field),
        });
        self
    }

    /// Lazy resolver for constructor parameter `index`
    #[must_use]
    pub fn circular_inject(mut self, index: usize, resolver: fn() -> &'static str) -> Self {
        self.constructor_circular
            .push(ConstructorCircularRef { index, resolver });
        self
    }

    /// Property of component type `T`
    #[must_use]
    pub fn property<T>(mut self, name: &'static str, field: fn(&C) -> &Inject<T>) -> Self
    where
        T: Named + Send + Sync + 'static,
    {
        self.properties.push(PropertySlot {
            name,
            dependency: Dependency::Resolved(T::NAME),
            wire: wire(field),
        });
        self
    }

    /// Property whose component name is not known yet
    ///
    /// Needs a [`circular_property`](Self::circular_property) resolver for
    /// the same name.
    #[must_use]
    pub fn property_deferred<T>(mut self, name: &'static str, field: fn(&C) -> &Inject<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.properties.push(PropertySlot {
            name,
            dependency: Dependency::Unresolved,
            wire: wire(field),
        });
        self
    }

    /// Lazy resolver for property `name`
    #[must_use]
    pub fn circular_property(mut self, name: &'static str, resolver: fn() -> &'static str) -> Self {
        self.property_circular
            .push(PropertyCircularRef { name, resolver });
        self
    }

    /// Declare method `name`
    #[must_use]
    pub fn method<F>(mut self, name: &'static str, build: F) -> Self
    where
        F: FnOnce(MethodDeclaration<C>) -> MethodDeclaration<C>,
    {
        self.methods
            .push(build(MethodDeclaration::new(name)).finish());
        self
    }
}

fn instantiate<C: Injectable>() -> Instance {
    Arc::new(C::instantiate())
}

fn wire<C, T>(field: fn(&C) -> &Inject<T>) -> Wire
where
    C: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    Arc::new(move |instance: &Instance, dependency: Instance| {
        let this = (**instance).downcast_ref::<C>().ok_or_else(|| {
            Error::object_initialization(format!(
                "Instance is not of type \"{}\"",
                type_name::<C>()
            ))
        })?;
        let dependency = dependency.downcast::<T>().map_err(|_| {
            Error::object_initialization(format!(
                "Dependency of \"{}\" is not of type \"{}\"",
                type_name::<C>(),
                type_name::<T>()
            ))
        })?;
        field(this).set(dependency);
        Ok(())
    })
}

/// Facts and entry point of one method of component `C`
pub struct MethodDeclaration<C> {
    name: &'static str,
    route: Option<RouteMetadata>,
    middlewares: Vec<Arc<dyn Middleware>>,
    facts: Vec<Metadata>,
    arity: usize,
    invoker: Option<Invoker>,
    job: Option<JobInvoker>,
    _component: PhantomData<fn() -> C>,
}

impl<C: Injectable> MethodDeclaration<C> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            route: None,
            middlewares: Vec::new(),
            facts: Vec::new(),
            arity: 0,
            invoker: None,
            job: None,
            _component: PhantomData,
        }
    }

    fn finish(mut self) -> MethodDescriptor {
        if let Some(mut route) = self.route {
            route.middlewares = self.middlewares;
            self.facts.insert(0, Metadata::Route(route));
        }
        MethodDescriptor {
            name: self.name,
            facts: self.facts,
            arity: self.arity,
            invoker: self.invoker,
            job: self.job,
        }
    }

    fn occupy(&mut self, index: usize) {
        self.arity = self.arity.max(index + 1);
    }

    /// Handle `method` requests on `path`, relative to the controller prefix
    #[must_use]
    pub fn route<S: Into<String>>(mut self, method: HttpMethod, path: S) -> Self {
        self.route = Some(RouteMetadata::new(method, path));
        self
    }

    /// Handle GET requests
    #[must_use]
    pub fn get<S: Into<String>>(self, path: S) -> Self {
        self.route(HttpMethod::Get, path)
    }

    /// Handle POST requests
    #[must_use]
    pub fn post<S: Into<String>>(self, path: S) -> Self {
        self.route(HttpMethod::Post, path)
    }

    /// Handle PUT requests
    #[must_use]
    pub fn put<S: Into<String>>(self, path: S) -> Self {
        self.route(HttpMethod::Put, path)
    }

    /// Handle PATCH requests
    #[must_use]
    pub fn patch<S: Into<String>>(self, path: S) -> Self {
        self.route(HttpMethod::Patch, path)
    }

    /// Handle DELETE requests
    #[must_use]
    pub fn delete<S: Into<String>>(self, path: S) -> Self {
        self.route(HttpMethod::Delete, path)
    }

    /// Run `middleware` before the dispatch pipeline
    #[must_use]
    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Skip authentication
    #[must_use]
    pub fn non_auth(mut self) -> Self {
        self.facts.push(Metadata::NonAuth);
        self
    }

    /// Require every permission in `permissions`
    #[must_use]
    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facts.push(Metadata::Permissions(
            permissions.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Answer with `status` instead of 200
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.facts.push(Metadata::StatusCode(status));
        self
    }

    /// Bind argument `index` from a request section, optionally one key of it
    #[must_use]
    pub fn bind<T: BindTarget>(mut self, index: usize, source: ParamSource, key: Option<&str>) -> Self {
        self.occupy(index);
        self.facts
            .push(Metadata::Param(ParamBinding::new::<T>(source, index, key)));
        self
    }

    /// Bind argument `index` from the whole query string
    #[must_use]
    pub fn query<T: BindTarget>(self, index: usize) -> Self {
        self.bind::<T>(index, ParamSource::Query, None)
    }

    /// Bind argument `index` from query field `key`
    #[must_use]
    pub fn query_field<T: BindTarget>(self, index: usize, key: &str) -> Self {
        self.bind::<T>(index, ParamSource::Query, Some(key))
    }

    /// Bind argument `index` from path parameter `key`
    #[must_use]
    pub fn param<T: BindTarget>(self, index: usize, key: &str) -> Self {
        self.bind::<T>(index, ParamSource::Path, Some(key))
    }

    /// Bind argument `index` from header `name`
    #[must_use]
    pub fn header<T: BindTarget>(self, index: usize, name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        self.bind::<T>(index, ParamSource::Header, Some(&name))
    }

    /// Bind argument `index` from the whole JSON body
    #[must_use]
    pub fn body<T: BindTarget>(self, index: usize) -> Self {
        self.bind::<T>(index, ParamSource::Body, None)
    }

    /// Bind argument `index` from body field `key`
    #[must_use]
    pub fn body_field<T: BindTarget>(self, index: usize, key: &str) -> Self {
        self.bind::<T>(index, ParamSource::Body, Some(key))
    }

    /// Inject the request context, or one slice of it, at `index`
    #[must_use]
    pub fn context(mut self, index: usize, source: Option<ContextSource>) -> Self {
        self.occupy(index);
        self.facts
            .push(Metadata::Context(ContextBinding { index, source }));
        self
    }

    /// Declare parameter names, e.g. `"user_id: String"`
    #[must_use]
    pub fn signature(mut self, text: &str) -> Self {
        self.facts
            .push(Metadata::Signature(MethodSignature::parse(text)));
        self
    }

    fn cache(mut self, operation: CacheOperation, policy: CachePolicy) -> Self {
        self.facts
            .push(Metadata::Cache(CacheDirective { operation, policy }));
        self
    }

    /// Serve from cache, invoking only on a miss
    #[must_use]
    pub fn cacheable(self, policy: CachePolicy) -> Self {
        self.cache(CacheOperation::Cacheable, policy)
    }

    /// Invoke and refresh the cache entry
    #[must_use]
    pub fn cache_put(self, policy: CachePolicy) -> Self {
        self.cache(CacheOperation::Put, policy)
    }

    /// Invoke and remove the cache entry
    #[must_use]
    pub fn cache_evict(self, policy: CachePolicy) -> Self {
        self.cache(CacheOperation::Evict, policy)
    }

    /// Run on a six-field cron schedule when `scope` is enabled
    #[must_use]
    pub fn cron<S: Into<String>, E: Into<String>>(mut self, scope: S, expression: E) -> Self {
        self.facts.push(Metadata::Schedule(ScheduleMetadata {
            scope: scope.into(),
            cron: expression.into(),
        }));
        self
    }

    /// Handler body; its output is serialized as the response
    #[must_use]
    pub fn handler<F, Fut, R>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<C>, ArgSlots) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: Serialize + Send + 'static,
    {
        let method = self.name;
        self.invoker = Some(Arc::new(
            move |instance: Instance, args: ArgSlots| -> MethodFuture {
                match instance.downcast::<C>() {
                    Ok(this) => {
                        let call = handler(this, args);
                        Box::pin(async move { Ok(serde_json::to_value(call.await?)?) })
                    }
                    Err(_) => Box::pin(std::future::ready(Err(mismatch::<C>(method)))),
                }
            },
        ));
        self
    }

    /// Job body
    #[must_use]
    pub fn job<F, Fut>(mut self, job: F) -> Self
    where
        F: Fn(Arc<C>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let method = self.name;
        self.job = Some(Arc::new(
            move |instance: Instance| -> BoxFuture<'static, Result<()>> {
                match instance.downcast::<C>() {
                    Ok(this) => Box::pin(job(this)),
                    Err(_) => Box::pin(std::future::ready(Err(mismatch::<C>(method)))),
                }
            },
        ));
        self
    }
}

fn mismatch<C>(method: &str) -> Error {
    Error::internal(format!(
        "Method \"{method}\" invoked on an instance that is not \"{}\"",
        type_name::<C>()
    ))
}

//! Object graph construction

use std::sync::Arc;

use trellis_domain::error::Error;
use trellis_infrastructure::di::{
    ComponentRegistry, Container, Declaration, Inject, Injectable, LifecycleState, Named,
    ObjectFactory,
};

#[derive(Debug, Default)]
struct Repository;

impl Named for Repository {
    const NAME: &'static str = "Repository";
}

impl Injectable for Repository {
    fn instantiate() -> Self {
        Self
    }
}

#[derive(Debug, Default)]
struct Service {
    repository: Inject<Repository>,
}

impl Named for Service {
    const NAME: &'static str = "Service";
}

impl Injectable for Service {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration.inject::<Repository>(|this| &this.repository)
    }
}

#[derive(Debug, Default)]
struct Controller {
    service: Inject<Service>,
    repository: Inject<Repository>,
}

impl Named for Controller {
    const NAME: &'static str = "Controller";
}

impl Injectable for Controller {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject::<Service>(|this| &this.service)
            .property::<Repository>("repository", |this| &this.repository)
    }
}

// Constructor cycle, both sides annotated
#[derive(Debug, Default)]
struct Orders {
    billing: Inject<Billing>,
}

impl Named for Orders {
    const NAME: &'static str = "Orders";
}

impl Injectable for Orders {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject_deferred::<Billing>(|this| &this.billing)
            .circular_inject(0, || Billing::NAME)
    }
}

#[derive(Debug, Default)]
struct Billing {
    orders: Inject<Orders>,
}

impl Named for Billing {
    const NAME: &'static str = "Billing";
}

impl Injectable for Billing {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject_deferred::<Orders>(|this| &this.orders)
            .circular_inject(0, || Orders::NAME)
    }
}

// Constructor cycle missing its resolver on one side
#[derive(Debug, Default)]
struct Ledger {
    repository: Inject<Repository>,
    audit: Inject<Audit>,
}

impl Named for Ledger {
    const NAME: &'static str = "Ledger";
}

impl Injectable for Ledger {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject::<Repository>(|this| &this.repository)
            .inject_deferred::<Audit>(|this| &this.audit)
    }
}

#[derive(Debug, Default)]
struct Audit {
    ledger: Inject<Ledger>,
}

impl Named for Audit {
    const NAME: &'static str = "Audit";
}

impl Injectable for Audit {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject_deferred::<Ledger>(|this| &this.ledger)
            .circular_inject(0, || Ledger::NAME)
    }
}

// Property cycle
#[derive(Debug, Default)]
struct Left {
    right: Inject<Right>,
}

impl Named for Left {
    const NAME: &'static str = "Left";
}

impl Injectable for Left {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .property_deferred::<Right>("right", |this| &this.right)
            .circular_property("right", || Right::NAME)
    }
}

#[derive(Debug, Default)]
struct Right {
    left: Inject<Left>,
}

impl Named for Right {
    const NAME: &'static str = "Right";
}

impl Injectable for Right {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration.property::<Left>("left", |this| &this.left)
    }
}

#[derive(Debug, Default)]
struct Dangling {
    peer: Inject<Right>,
}

impl Named for Dangling {
    const NAME: &'static str = "Dangling";
}

impl Injectable for Dangling {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration.property_deferred::<Right>("peer", |this| &this.peer)
    }
}

// Depends on something that is not a component
#[derive(Debug)]
struct Settings {
    greeting: String,
}

impl Named for Settings {
    const NAME: &'static str = "Settings";
}

#[derive(Debug, Default)]
struct Greeter {
    settings: Inject<Settings>,
}

impl Named for Greeter {
    const NAME: &'static str = "Greeter";
}

impl Injectable for Greeter {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration.inject::<Settings>(|this| &this.settings)
    }
}

#[test]
fn acyclic_graph_has_one_ready_singleton_per_component() {
    // Registration order puts dependents first
    let registry = ComponentRegistry::new()
        .register::<Controller>()
        .and_then(ComponentRegistry::register::<Service>)
        .and_then(ComponentRegistry::register::<Repository>)
        .unwrap();
    let container = Container::initialize(&registry).unwrap();

    let controller = container.get::<Controller>().unwrap();
    let service = container.get::<Service>().unwrap();
    let repository = container.get::<Repository>().unwrap();

    assert!(Arc::ptr_eq(controller.service.get().unwrap(), &service));
    assert!(Arc::ptr_eq(controller.repository.get().unwrap(), &repository));
    assert!(Arc::ptr_eq(service.repository.get().unwrap(), &repository));
    assert_eq!(
        container.class_metadata("Controller").unwrap().constructor_params,
        vec!["Service"]
    );
}

#[test]
fn annotated_constructor_cycle_is_fully_wired() {
    let registry = ComponentRegistry::new()
        .register::<Orders>()
        .and_then(ComponentRegistry::register::<Billing>)
        .unwrap();
    let container = Container::initialize(&registry).unwrap();

    let orders = container.get::<Orders>().unwrap();
    let billing = container.get::<Billing>().unwrap();

    assert!(Arc::ptr_eq(orders.billing.get().unwrap(), &billing));
    assert!(Arc::ptr_eq(billing.orders.get().unwrap(), &orders));
}

#[test]
fn missing_circular_resolver_names_index_and_class() {
    let registry = ComponentRegistry::new()
        .register::<Repository>()
        .and_then(ComponentRegistry::register::<Audit>)
        .and_then(ComponentRegistry::register::<Ledger>)
        .unwrap();
    let err = Container::initialize(&registry).unwrap_err();

    assert!(matches!(err, Error::ObjectInitialization { .. }));
    assert_eq!(
        err.public_message(),
        "Constructor parameter index \"1\" of class \"Ledger\" cannot be injected, is there an unresolved circular dependency?"
    );
}

#[test]
fn annotated_property_cycle_is_fully_wired() {
    let registry = ComponentRegistry::new()
        .register::<Right>()
        .and_then(ComponentRegistry::register::<Left>)
        .unwrap();
    let container = Container::initialize(&registry).unwrap();

    let left = container.get::<Left>().unwrap();
    let right = container.get::<Right>().unwrap();

    assert!(Arc::ptr_eq(left.right.get().unwrap(), &right));
    assert!(Arc::ptr_eq(right.left.get().unwrap(), &left));
}

#[test]
fn missing_property_resolver_names_property_and_class() {
    let registry = ComponentRegistry::new()
        .register::<Dangling>()
        .unwrap();
    let err = Container::initialize(&registry).unwrap_err();

    assert_eq!(
        err.public_message(),
        "Property \"peer\" of class \"Dangling\" cannot be injected, is there an unresolved circular dependency?"
    );
}

#[test]
fn construction_is_idempotent() {
    let registry = ComponentRegistry::new()
        .register::<Service>()
        .and_then(ComponentRegistry::register::<Repository>)
        .unwrap();
    let mut factory = ObjectFactory::new(&registry);

    let first = factory.create_object_instance("Service").unwrap().unwrap();
    let second = factory.create_object_instance("Service").unwrap().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(matches!(
        factory.state("Repository"),
        Some(LifecycleState::Ready(_))
    ));

    let container = Container::initialize(&registry).unwrap();
    let a = container.get::<Service>().unwrap();
    let b = container.get::<Service>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn undeclared_component_lookup_fails() {
    let registry = ComponentRegistry::new().register::<Repository>().unwrap();
    let container = Container::initialize(&registry).unwrap();

    let err = container.get::<Service>().unwrap_err();
    assert!(matches!(err, Error::ObjectInitialization { .. }));
    assert!(err.public_message().contains("Service"));
}

#[test]
fn dependency_that_is_not_a_component_is_skipped() {
    let registry = ComponentRegistry::new().register::<Greeter>().unwrap();
    let container = Container::initialize(&registry).unwrap();

    let greeter = container.get::<Greeter>().unwrap();
    assert!(!greeter.settings.is_set());
}

#[test]
fn provided_singleton_is_injected_as_is() {
    let settings = Arc::new(Settings {
        greeting: "hello".into(),
    });
    let registry = ComponentRegistry::new()
        .provide(Arc::clone(&settings))
        .and_then(ComponentRegistry::register::<Greeter>)
        .unwrap();
    let container = Container::initialize(&registry).unwrap();

    let greeter = container.get::<Greeter>().unwrap();
    let injected = greeter.settings.get().unwrap();
    assert!(Arc::ptr_eq(injected, &settings));
    assert_eq!(injected.greeting, "hello");
}

#[test]
fn duplicate_component_name_is_rejected() {
    let err = ComponentRegistry::new()
        .register::<Repository>()
        .and_then(ComponentRegistry::register::<Repository>)
        .unwrap_err();
    assert!(matches!(err, Error::ObjectInitialization { .. }));
}

#[test]
fn wrongly_typed_lookup_fails() {
    let registry = ComponentRegistry::new().register::<Repository>().unwrap();
    let container = Container::initialize(&registry).unwrap();
    assert!(container.get_object::<Service>("Repository").is_err());
}

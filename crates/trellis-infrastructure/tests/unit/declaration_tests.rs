//! Method declarations compiled into facts and entry points

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use trellis_domain::value_objects::{
    ArgSlots, Argument, CacheOperation, CachePolicy, ContextSource, HttpMethod, ParamSource,
};
use trellis_infrastructure::di::{ComponentRegistry, Container, Declaration, Injectable, Named};

#[derive(Debug, Default)]
struct ReportController {
    runs: AtomicUsize,
}

impl Named for ReportController {
    const NAME: &'static str = "ReportController";
}

impl Injectable for ReportController {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .controller("/reports")
            .method("find", |m| {
                m.get("/:id")
                    .permissions(["report:read"])
                    .param::<String>(0, "id")
                    .context(2, Some(ContextSource::UserId))
                    .signature("report_id: String, verbose: bool, user_id: Option<String>")
                    .cacheable(CachePolicy::new("Reports").key(":reportId").ttl(60))
                    .handler(|_this: Arc<Self>, mut args: ArgSlots| async move {
                        let id: String = args.take(0)?;
                        Ok(json!({ "id": id }))
                    })
            })
            .method("remove", |m| m.delete("/:id").status(204).non_auth())
            .method("compact", |m| {
                m.cron("reports", "0 0 * * * *")
                    .job(|this: Arc<Self>| async move {
                        this.runs.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
            })
    }
}

fn container() -> Container {
    let registry = ComponentRegistry::new()
        .register::<ReportController>()
        .unwrap();
    Container::initialize(&registry).unwrap()
}

#[test]
fn facts_land_in_the_metadata_registry() {
    let container = container();
    let metadata = container.metadata();

    assert_eq!(
        metadata.route_class("ReportController").unwrap().prefix,
        "/reports"
    );
    let route = metadata.route("ReportController", "find").unwrap();
    assert_eq!(route.method, HttpMethod::Get);
    assert_eq!(route.path, "/:id");
    assert_eq!(
        metadata.permissions("ReportController", "find"),
        vec!["report:read"]
    );
    let params = metadata.params("ReportController", "find");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].source, ParamSource::Path);
    assert_eq!(params[0].key.as_deref(), Some("id"));
    assert_eq!(
        metadata.cache_directives("ReportController", "find")[0].operation,
        CacheOperation::Cacheable
    );
    assert_eq!(
        metadata
            .signature("ReportController", "find")
            .unwrap()
            .position_of("reportId"),
        Some(0)
    );
    assert!(metadata.is_non_auth("ReportController", "remove"));
    assert_eq!(metadata.status_code("ReportController", "remove"), Some(204));
    assert_eq!(container.controllers(), vec!["ReportController"]);
}

#[test]
fn arity_covers_the_highest_bound_index() {
    let container = container();
    let class = container.class_metadata("ReportController").unwrap();
    assert_eq!(class.method("find").unwrap().arity, 3);
    assert_eq!(class.method("remove").unwrap().arity, 0);
}

#[tokio::test]
async fn invoker_calls_the_handler_with_bound_arguments() {
    let container = container();
    let invoker = container.invoker("ReportController", "find").unwrap();
    let instance = container.instance("ReportController").unwrap();

    let mut args = ArgSlots::with_arity(3);
    args.fill(0, Argument::new(json!("r-1"), "r-1".to_string()))
        .unwrap();

    let value = invoker(instance, args).await.unwrap();
    assert_eq!(value, json!({ "id": "r-1" }));
}

#[tokio::test]
async fn scheduled_methods_are_exposed_as_jobs() {
    let container = container();
    let jobs = container.jobs();

    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert_eq!(job.method, "compact");
    assert_eq!(job.schedule.scope, "reports");

    (job.job)(job.instance.clone()).await.unwrap();
    let controller = container.get::<ReportController>().unwrap();
    assert_eq!(controller.runs.load(Ordering::SeqCst), 1);
}

#[derive(Debug, Default)]
struct TwiceDeclared;

impl Named for TwiceDeclared {
    const NAME: &'static str = "TwiceDeclared";
}

impl Injectable for TwiceDeclared {
    fn instantiate() -> Self {
        Self
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .controller("/twice")
            .method("find", |m| m.get("/a").non_auth())
            .method("find", |m| m.post("/b").non_auth())
    }
}

#[test]
fn repeated_method_name_is_rejected() {
    let error = ComponentRegistry::new()
        .register::<TwiceDeclared>()
        .unwrap_err();

    assert_eq!(error.code(), "OBJECT_INITIALIZATION_ERROR");
    assert!(
        error
            .to_string()
            .contains("Method \"TwiceDeclared.find\" is declared twice")
    );
}

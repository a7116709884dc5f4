//! Tests for cache directives wrapped around method invokers

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use trellis_application::CacheAside;
use trellis_application::decorators::decorate_invoker;
use trellis_domain::value_objects::{
    ArgSlots, Argument, CacheDirective, CacheOperation, CachePolicy, Instance, Invoker,
    MethodFuture, MethodSignature,
};
use trellis_providers::MokaCacheProvider;

struct Counter {
    calls: AtomicUsize,
}

fn counting_invoker() -> Invoker {
    Arc::new(|instance: Instance, mut args: ArgSlots| -> MethodFuture {
        Box::pin(async move {
            let counter = instance
                .downcast::<Counter>()
                .map_err(|_| trellis_domain::Error::internal("not a counter"))?;
            let id: String = args.take(0)?;
            let call = counter.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({ "id": id, "call": call }))
        })
    })
}

fn args(id: &str) -> ArgSlots {
    let mut slots = ArgSlots::with_arity(1);
    slots
        .fill(0, Argument::new(json!(id), id.to_string()))
        .unwrap();
    slots
}

#[tokio::test]
async fn cacheable_route_hits_cache_on_second_call() {
    let counter = Arc::new(Counter {
        calls: AtomicUsize::new(0),
    });
    let instance: Instance = counter.clone();
    let cache = CacheAside::new(Arc::new(MokaCacheProvider::new()));
    let invoker = decorate_invoker(
        counting_invoker(),
        CacheDirective {
            operation: CacheOperation::Cacheable,
            policy: CachePolicy::new("Users").key(":userId").ttl(120),
        },
        Some(MethodSignature::parse("user_id: String")),
        cache.clone(),
    );

    let first = invoker(Arc::clone(&instance), args("1")).await.unwrap();
    let second = invoker(Arc::clone(&instance), args("1")).await.unwrap();
    let other = invoker(Arc::clone(&instance), args("2")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(other["call"], 2);
    assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
    assert!(cache.provider().exists("Users@1").await.unwrap());
}

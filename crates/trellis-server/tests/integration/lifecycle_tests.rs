//! Bootstrap and shutdown

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use trellis_domain::error::Error;
use trellis_infrastructure::config::ConfigBuilder;
use trellis_infrastructure::di::ComponentRegistry;
use trellis_server::Application;

use crate::test_utils::NoteController;

fn registry() -> ComponentRegistry {
    ComponentRegistry::new()
        .register::<NoteController>()
        .unwrap()
}

#[tokio::test]
async fn hooks_run_on_start_and_shutdown() {
    let ready = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));
    let (ready_hook, closed_hook) = (ready.clone(), closed.clone());

    let mut app = Application::builder()
        .with_config(ConfigBuilder::new().build())
        .with_registry(registry())
        .with_permission_provider(Arc::new(trellis_providers::InMemoryPermissionProvider::new()))
        .with_logging(false)
        .on_ready(move |container| {
            let ready = ready_hook.clone();
            async move {
                assert!(container.contains("NoteController"));
                ready.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .on_close(move |_container| {
            let closed = closed_hook.clone();
            async move {
                closed.fetch_add(1, Ordering::SeqCst);
                Err(Error::internal("teardown failures are logged, not raised"))
            }
        })
        .build()
        .unwrap();

    assert_eq!(app.start().await.unwrap(), 0);
    assert_eq!(ready.load(Ordering::SeqCst), 1);

    app.shutdown().await;
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn runtime_services_are_provided_to_the_container() {
    let app = Application::builder()
        .with_config(ConfigBuilder::new().build())
        .with_registry(registry())
        .with_permission_provider(Arc::new(trellis_providers::InMemoryPermissionProvider::new()))
        .with_logging(false)
        .build()
        .unwrap();

    for name in ["AppConfig", "CacheService", "JwtService", "PasswordService", "SessionService"] {
        assert!(app.container().contains(name), "{name} missing");
    }
    assert_eq!(app.routes().len(), 5);
}

#[tokio::test]
async fn declared_permissions_without_provider_abort_startup() {
    let err = Application::builder()
        .with_config(ConfigBuilder::new().build())
        .with_registry(registry())
        .with_logging(false)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::RouteInitialization { .. }));
}

//! Tests for the scheduled job runner

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use trellis_application::{JobScheduler, ScheduledJob};
use trellis_domain::error::Result;
use trellis_domain::value_objects::ScheduleMetadata;

fn counting_job(scope: &str, runs: &Arc<AtomicUsize>) -> ScheduledJob {
    let runs = Arc::clone(runs);
    ScheduledJob::new(
        format!("{scope}.tick"),
        &ScheduleMetadata {
            scope: scope.to_string(),
            cron: "* * * * * *".to_string(),
        },
        Arc::new(move || -> BoxFuture<'static, Result<()>> {
            let runs = Arc::clone(&runs);
            Box::pin(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }),
    )
    .unwrap()
}

#[tokio::test]
async fn only_enabled_scopes_run() {
    let enabled_runs = Arc::new(AtomicUsize::new(0));
    let disabled_runs = Arc::new(AtomicUsize::new(0));
    let mut scheduler = JobScheduler::new();
    scheduler.add(counting_job("cleanup", &enabled_runs));
    scheduler.add(counting_job("report", &disabled_runs));

    let started = scheduler.start(|scope| scope == "cleanup");
    assert_eq!(started, 1);
    assert_eq!(scheduler.running(), 1);

    tokio::time::sleep(Duration::from_millis(2_300)).await;
    scheduler.shutdown().await;

    assert!(enabled_runs.load(Ordering::SeqCst) >= 1);
    assert_eq!(disabled_runs.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.running(), 0);
}

#[tokio::test]
async fn shutdown_stops_future_runs() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut scheduler = JobScheduler::new();
    scheduler.add(counting_job("cleanup", &runs));
    scheduler.start(|_| true);
    scheduler.shutdown().await;

    let after_shutdown = runs.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(1_200)).await;
    assert_eq!(runs.load(Ordering::SeqCst), after_shutdown);
}

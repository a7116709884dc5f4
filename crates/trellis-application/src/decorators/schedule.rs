//! Scheduled jobs
//!
//! Methods declared with a cron schedule become [`ScheduledJob`]s. The
//! [`JobScheduler`] starts a task per job whose scope is enabled and stops
//! them all on shutdown.
//!
//! ```text
//! ┌──────────────┐   enabled(scope)?   ┌───────────────────────────┐
//! │ ScheduledJob │ ──────────────────▶ │ tokio task                │
//! └──────────────┘                     │  loop: sleep → run → log  │
//!                                      └───────────────────────────┘
//! ```

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use futures::future::BoxFuture;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::ScheduleMetadata;

/// Body of a scheduled job
pub type JobFn = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// A job bound to its schedule
#[derive(Clone)]
pub struct ScheduledJob {
    name: String,
    scope: String,
    expression: String,
    schedule: Schedule,
    run: JobFn,
}

impl ScheduledJob {
    /// Create a job; fails with a configuration error on an invalid cron expression
    pub fn new<S: Into<String>>(name: S, metadata: &ScheduleMetadata, run: JobFn) -> Result<Self> {
        let name = name.into();
        let schedule = Schedule::from_str(&metadata.cron).map_err(|e| {
            Error::configuration_with_source(
                format!("Invalid cron expression \"{}\" for job {name}", metadata.cron),
                e,
            )
        })?;
        Ok(Self {
            name,
            scope: metadata.scope.clone(),
            expression: metadata.cron.clone(),
            schedule,
            run,
        })
    }

    /// Job name, `Component.method`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enabling scope
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Next fire time after `now`
    pub fn next_after(&self, now: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(now).next()
    }
}

impl std::fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

/// Runs scheduled jobs until shutdown
#[derive(Debug, Default)]
pub struct JobScheduler {
    jobs: Vec<ScheduledJob>,
    tasks: JoinSet<()>,
    cancel: CancellationToken,
}

impl JobScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job
    pub fn add(&mut self, job: ScheduledJob) {
        self.jobs.push(job);
    }

    /// Registered jobs
    pub fn jobs(&self) -> &[ScheduledJob] {
        &self.jobs
    }

    /// Number of running job tasks
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Start every job whose scope is enabled; returns how many started
    pub fn start<F>(&mut self, enabled: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let mut started = 0;
        for job in &self.jobs {
            if !enabled(job.scope()) {
                debug!(job = job.name(), scope = job.scope(), "job scope disabled");
                continue;
            }
            info!(job = job.name(), scope = job.scope(), "starting scheduled job");
            self.tasks.spawn(run_job(job.clone(), self.cancel.child_token()));
            started += 1;
        }
        started
    }

    /// Stop all jobs and wait for them to finish
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        while self.tasks.join_next().await.is_some() {}
        debug!("scheduled jobs stopped");
    }
}

async fn run_job(job: ScheduledJob, cancel: CancellationToken) {
    loop {
        let now = Utc::now();
        let Some(next) = job.next_after(&now) else {
            debug!(job = job.name(), "schedule exhausted");
            return;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tokio::select! {
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(wait) => {}
        }
        if let Err(e) = (job.run)().await {
            error!(job = job.name(), error = %e, "scheduled job failed");
        }
    }
}

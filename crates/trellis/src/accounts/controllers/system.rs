//! Health endpoint and account maintenance job

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use trellis_domain::error::Error;
use trellis_domain::value_objects::ArgSlots;
use trellis_infrastructure::di::{Declaration, Inject, Injectable, Named};

use crate::accounts::constants::{MAINTENANCE_CRON, MAINTENANCE_JOB_SCOPE};
use crate::accounts::service::UserService;

#[derive(Debug, Default)]
pub struct PingController;

impl Named for PingController {
    const NAME: &'static str = "PingController";
}

impl Injectable for PingController {
    fn instantiate() -> Self {
        Self
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration.controller("/").method("ping", |m| {
            m.get("/ping")
                .non_auth()
                .handler(|_this: Arc<Self>, _args: ArgSlots| async move {
                    Ok::<_, Error>(json!({ "pong": true, "time": Utc::now() }))
                })
        })
    }
}

/// Scheduled account housekeeping
#[derive(Debug, Default)]
pub struct AccountMaintenance {
    users: Inject<UserService>,
}

impl Named for AccountMaintenance {
    const NAME: &'static str = "AccountMaintenance";
}

impl Injectable for AccountMaintenance {
    fn instantiate() -> Self {
        Self::default()
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject::<UserService>(|this| &this.users)
            .method("purge_inactive", |m| {
                m.cron(MAINTENANCE_JOB_SCOPE, MAINTENANCE_CRON)
                    .job(|this: Arc<Self>| async move {
                        let removed = this.users.get()?.purge_inactive().await?;
                        info!(removed, "inactive accounts purged");
                        Ok::<_, Error>(())
                    })
            })
    }
}

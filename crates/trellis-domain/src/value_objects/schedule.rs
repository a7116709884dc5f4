//! Scheduled job declarations

use serde::{Deserialize, Serialize};

/// Cron schedule of a job method
///
/// Expressions use six fields (`sec min hour day-of-month month day-of-week`)
/// and are evaluated in UTC. A job runs only when its `scope` is enabled in
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Configuration scope enabling the job
    pub scope: String,
    /// Cron expression
    pub cron: String,
}

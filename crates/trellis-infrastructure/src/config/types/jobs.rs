//! Scheduled job switches

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Switch of a single job scope
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JobConfig {
    /// Start jobs of this scope at boot
    pub start: bool,
}

/// Job switches keyed by scope, `[jobs.<scope>]` in TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct JobsConfig {
    scopes: BTreeMap<String, JobConfig>,
}

impl JobsConfig {
    /// Whether jobs of `scope` should start; unknown scopes stay off
    pub fn is_enabled(&self, scope: &str) -> bool {
        self.scopes.get(scope).is_some_and(|job| job.start)
    }

    /// Set the switch of `scope`
    pub fn set(&mut self, scope: impl Into<String>, start: bool) {
        self.scopes.insert(scope.into(), JobConfig { start });
    }
}

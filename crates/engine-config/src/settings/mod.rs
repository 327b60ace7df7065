//! Execution settings shared by chain and bulk runs.
//!
//! Settings are plain data: a JSON document with camelCase keys, every key optional.
//!
//! ```json
//! { "onStepFailure": "continue", "preflight": true, "ordering": "dependency" }
//! ```

use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};
use tracing::info;

pub mod error;

use error::SettingsError;

/// What to do with the remaining steps once one step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Halt at the first failure; later steps are reported as skipped.
    #[default]
    Stop,
    /// Record the failure and keep going. Opt-in only.
    Continue,
}

/// Which built-in ordering policy selects the bulk target sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingKind {
    Crawl,
    /// Last discovered table first.
    #[default]
    ReverseCrawl,
    /// Topological order over relationship edges, children before parents.
    Dependency,
}

impl FromStr for OrderingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "crawl" => Ok(OrderingKind::Crawl),
            "reverse" | "reverse_crawl" => Ok(OrderingKind::ReverseCrawl),
            "dependency" | "topological" => Ok(OrderingKind::Dependency),
            other => Err(format!("unknown ordering: {other}")),
        }
    }
}

impl fmt::Display for OrderingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingKind::Crawl => f.write_str("crawl"),
            OrderingKind::ReverseCrawl => f.write_str("reverse_crawl"),
            OrderingKind::Dependency => f.write_str("dependency"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExecutionSettings {
    pub on_step_failure: FailurePolicy,

    /// Resolve every chain step and check its format before running any of them.
    pub preflight: bool,

    pub ordering: OrderingKind,
}

impl ExecutionSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let settings = Self::from_json(&json)?;
        info!(
            "Loaded execution settings from {}: {:?}",
            path.display(),
            settings
        );
        Ok(settings)
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_step_failure = policy;
        self
    }

    pub fn with_preflight(mut self, preflight: bool) -> Self {
        self.preflight = preflight;
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingKind) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn stops_on_failure(&self) -> bool {
        self.on_step_failure == FailurePolicy::Stop
    }
}

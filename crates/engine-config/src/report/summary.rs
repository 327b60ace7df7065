use crate::report::step::{StepOutcome, StepRecord};
use chrono::{DateTime, Utc};
use model::core::identifiers::RunId;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RunMode {
    Chain,
    Bulk,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    Completed,
    /// At least one step failed. Outputs written before the failure are kept.
    Failed,
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Per-step outcome summary of one chain or bulk run. Always returned from an
/// execution, also when a step failed.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub run_id: RunId,
    pub mode: RunMode,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepRecord>,
}

impl ExecutionReport {
    /// Seals a run; the status is derived from the step outcomes.
    pub fn finish(
        run_id: RunId,
        mode: RunMode,
        started_at: DateTime<Utc>,
        steps: Vec<StepRecord>,
    ) -> Self {
        let status = if steps.iter().any(|s| s.outcome == StepOutcome::Failed) {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };

        Self {
            run_id,
            mode,
            status,
            started_at,
            finished_at: Utc::now(),
            steps,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn outcomes(&self) -> Vec<StepOutcome> {
        self.steps.iter().map(|s| s.outcome).collect()
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.steps
            .iter()
            .fold(OutcomeCounts::default(), |mut acc, step| {
                match step.outcome {
                    StepOutcome::Succeeded => acc.succeeded += 1,
                    StepOutcome::Failed => acc.failed += 1,
                    StepOutcome::Skipped => acc.skipped += 1,
                }
                acc
            })
    }

    /// The first failed step, if any.
    pub fn first_failure(&self) -> Option<&StepRecord> {
        self.steps
            .iter()
            .find(|s| s.outcome == StepOutcome::Failed)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.counts();
        writeln!(f, "Run {} ({:?}): {:?}", self.run_id, self.mode, self.status)?;
        writeln!(f, "-----------------------------")?;
        for (i, step) in self.steps.iter().enumerate() {
            write!(f, "{:>3}. {:<10} {}", i + 1, step.outcome, step.subject)?;
            if let Some(detail) = &step.detail {
                write!(f, " ({detail})")?;
            }
            if let Some(err) = &step.error {
                write!(f, " - {err}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{} succeeded, {} failed, {} skipped",
            counts.succeeded, counts.failed, counts.skipped
        )
    }
}

use model::execution::command::CommandSpec;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StepOutcome {
    Succeeded,
    Failed,
    /// Never attempted because an earlier step failed.
    Skipped,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Succeeded => f.pad("succeeded"),
            StepOutcome::Failed => f.pad("failed"),
            StepOutcome::Skipped => f.pad("skipped"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    UnknownCommand,
    InvalidState,
    Io,
    Action,
    UnsupportedFormat,
    DependencyCycle,
    Command,
}

/// Error captured into a step record instead of being raised out of the run.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub kind: ErrorKind,
    pub message: String,
}

impl StepError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// What a step ran: a chained command, or one bulk target.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum StepSubject {
    Command {
        #[serde(flatten)]
        spec: CommandSpec,
    },
    Target {
        table: String,
        statement: String,
    },
}

impl fmt::Display for StepSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSubject::Command { spec } => write!(f, "{spec}"),
            StepSubject::Target { table, .. } => f.write_str(table),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub subject: StepSubject,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
    /// Short result note, e.g. `dropped` or `42 rows`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepRecord {
    pub fn succeeded(subject: StepSubject, detail: Option<String>) -> Self {
        Self {
            subject,
            outcome: StepOutcome::Succeeded,
            error: None,
            detail,
        }
    }

    pub fn failed(subject: StepSubject, error: StepError) -> Self {
        Self {
            subject,
            outcome: StepOutcome::Failed,
            error: Some(error),
            detail: None,
        }
    }

    pub fn skipped(subject: StepSubject) -> Self {
        Self {
            subject,
            outcome: StepOutcome::Skipped,
            error: None,
            detail: None,
        }
    }
}

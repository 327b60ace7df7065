use engine_config::report::step::{ErrorKind, StepError};
use model::execution::format::OutputFormat;
use planner::statement::error::TemplateError;
use thiserror::Error;

/// Failure of the side-effecting capability behind a [`crate::connection::Connection`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The data source rejected the statement.
    #[error("Statement rejected: {message} [{statement}]")]
    Rejected { statement: String, message: String },

    #[error("No connection available for `{0}`")]
    NoConnection(String),

    #[error("Unexpected result for [{statement}]: {message}")]
    UnexpectedResult { statement: String, message: String },

    #[error("Connection error: {0}")]
    Connection(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A plan was mutated or executed in the wrong lifecycle state.
    #[error("Cannot {operation} while the chain is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("Failed to write {destination}: {source}")]
    Io {
        destination: String,
        source: std::io::Error,
    },

    /// Content handed to the sink does not fit the requested format.
    #[error("Cannot write {content} content as {format}")]
    ContentMismatch {
        format: OutputFormat,
        content: &'static str,
    },

    #[error("Action failed: {0}")]
    Action(#[from] ActionError),

    #[error("Command `{command}` does not support output format `{format}`")]
    UnsupportedFormat {
        command: String,
        format: OutputFormat,
    },

    #[error("Dependency cycle between tables: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    #[error("Command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("Invalid statement template: {0}")]
    Template(#[from] TemplateError),
}

impl EngineError {
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            EngineError::InvalidState { .. } => ErrorKind::InvalidState,
            EngineError::Io { .. } | EngineError::ContentMismatch { .. } => ErrorKind::Io,
            EngineError::Action(_) => ErrorKind::Action,
            EngineError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            EngineError::DependencyCycle(_) => ErrorKind::DependencyCycle,
            EngineError::Command { .. } | EngineError::Template(_) => ErrorKind::Command,
        }
    }

    /// Captures this error into a report record.
    pub fn to_step_error(&self) -> StepError {
        StepError::new(self.kind(), self.to_string())
    }
}

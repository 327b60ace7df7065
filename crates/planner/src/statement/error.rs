use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template is empty")]
    Empty,

    #[error("Unknown template variable `${{{0}}}`")]
    UnknownVariable(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
}

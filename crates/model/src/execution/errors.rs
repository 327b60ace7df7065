use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecParseError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    #[error("empty output destination")]
    EmptyDestination,

    #[error("invalid step `{0}`, expected <command>:<format>:<destination>")]
    MalformedStep(String),
}

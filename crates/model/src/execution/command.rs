use super::{
    errors::SpecParseError,
    format::{Destination, OutputFormat},
};
use crate::core::identifiers::CommandId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A single requested chain step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: CommandId,
    pub format: OutputFormat,
    pub destination: Destination,
}

impl CommandSpec {
    pub fn new(
        command: impl Into<CommandId>,
        format: OutputFormat,
        destination: Destination,
    ) -> Self {
        Self {
            command: command.into(),
            format,
            destination,
        }
    }
}

/// Parses `<command>:<format>:<destination>`. The destination may itself
/// contain `:`.
impl FromStr for CommandSpec {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(command), Some(format), Some(destination)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SpecParseError::MalformedStep(s.to_string()));
        };

        let command = command.trim();
        if command.is_empty() {
            return Err(SpecParseError::MalformedStep(s.to_string()));
        }

        Ok(CommandSpec::new(command, format.parse()?, destination.parse()?))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.command, self.format, self.destination)
    }
}

use super::errors::SpecParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

/// Output formats understood by the output sink. Each maps to its own
/// serialization strategy: the text family is written as UTF-8, `Image` as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    /// Graphviz DOT source.
    Dot,
    Image,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
            OutputFormat::Image => "image",
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, OutputFormat::Image)
    }
}

impl FromStr for OutputFormat {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "image" | "png" => Ok(OutputFormat::Image),
            other => Err(SpecParseError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a step's output goes, addressed by a path-like string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl FromStr for Destination {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(SpecParseError::EmptyDestination),
            "-" | "stdout" => Ok(Destination::Stdout),
            path => Ok(Destination::File(PathBuf::from(path))),
        }
    }
}

impl TryFrom<String> for Destination {
    type Error = SpecParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Destination> for String {
    fn from(dest: Destination) -> Self {
        dest.to_string()
    }
}

impl From<PathBuf> for Destination {
    fn from(path: PathBuf) -> Self {
        Destination::File(path)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_aliases() {
        assert_eq!("TXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Image);
        assert_eq!(
            "html".parse::<OutputFormat>(),
            Err(SpecParseError::UnknownFormat("html".into()))
        );
        assert!(OutputFormat::Image.is_binary());
        assert!(!OutputFormat::Dot.is_binary());
    }

    #[test]
    fn parses_destinations() {
        assert_eq!("-".parse::<Destination>().unwrap(), Destination::Stdout);
        assert_eq!(
            "out/brief.txt".parse::<Destination>().unwrap(),
            Destination::File(PathBuf::from("out/brief.txt"))
        );
        assert_eq!(
            "  ".parse::<Destination>(),
            Err(SpecParseError::EmptyDestination)
        );
    }
}

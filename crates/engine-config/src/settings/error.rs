use thiserror::Error;

/// Errors raised when loading execution settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The settings document is not valid JSON or has unexpected fields.
    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

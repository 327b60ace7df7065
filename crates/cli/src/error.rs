use engine_config::settings::error::SettingsError;
use engine_core::error::EngineError;
use model::catalog::CatalogError;
use planner::statement::error::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load the catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to load execution settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid statement template: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("The `query` operation needs --template")]
    MissingTemplate,
}

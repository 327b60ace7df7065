use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate schema: {0}")]
    DuplicateSchema(String),

    #[error("Duplicate table `{table}` in schema `{schema}`")]
    DuplicateTable { schema: String, table: String },

    /// Two tables in different schemas would share one full name.
    #[error("Table full name `{0}` is already taken")]
    DuplicateFullName(String),

    #[error("Duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },

    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Table name must not be empty")]
    EmptyTableName,

    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The offline snapshot could not be read or written as JSON.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

//! The opaque live-connection capability used by bulk actions and by commands
//! that need data beyond the static catalog.

use crate::error::ActionError;
use tracing::info;

pub type Row = Vec<String>;

pub trait Connection {
    /// Executes a statement for effect, returning the number of rows affected.
    fn execute(&mut self, statement: &str) -> Result<u64, ActionError>;

    /// Executes a statement for content.
    fn query(&mut self, statement: &str) -> Result<Vec<Row>, ActionError>;

    /// Runs a single-value count query. No rows at all counts as zero.
    fn query_count(&mut self, statement: &str) -> Result<u64, ActionError> {
        let rows = self.query(statement)?;
        let Some(cell) = rows.first().and_then(|row| row.first()) else {
            return Ok(0);
        };
        cell.trim()
            .parse()
            .map_err(|_| ActionError::UnexpectedResult {
                statement: statement.to_string(),
                message: format!("expected a row count, got `{cell}`"),
            })
    }
}

/// Records statements instead of running them. Every `execute` affects zero rows
/// and every `query` returns no rows.
#[derive(Debug, Default, Clone)]
pub struct DryRunConnection {
    statements: Vec<String>,
}

impl DryRunConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Recorded statements as a script, one `;`-terminated statement per line.
    pub fn script(&self) -> String {
        self.statements
            .iter()
            .map(|stmt| format!("{stmt};\n"))
            .collect()
    }
}

impl Connection for DryRunConnection {
    fn execute(&mut self, statement: &str) -> Result<u64, ActionError> {
        info!("[dry-run] {}", statement);
        self.statements.push(statement.to_string());
        Ok(0)
    }

    fn query(&mut self, statement: &str) -> Result<Vec<Row>, ActionError> {
        info!("[dry-run] {}", statement);
        self.statements.push(statement.to_string());
        Ok(Vec::new())
    }
}

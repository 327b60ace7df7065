//! Catalogue of bulk operations that can be swept over a set of tables.

use crate::statement::error::TemplateError;
use model::catalog::table::Table;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Count,
    Drop,
    Truncate,
    Dump,
    /// Arbitrary statement template run once per table.
    QueryOver { name: String, template: String },
}

impl Operation {
    pub fn query_over(name: impl Into<String>, template: impl Into<String>) -> Self {
        Operation::QueryOver {
            name: name.into(),
            template: template.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operation::Count => "count",
            Operation::Drop => "drop",
            Operation::Truncate => "truncate",
            Operation::Dump => "dump",
            Operation::QueryOver { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Operation::Count => "Row Count",
            Operation::Drop => "Drop Table",
            Operation::Truncate => "Truncate Table",
            Operation::Dump => "Dump",
            Operation::QueryOver { .. } => "Query Over Table",
        }
    }

    pub fn template(&self) -> &str {
        match self {
            Operation::Count => "SELECT COUNT(*) FROM ${table}",
            Operation::Drop => "DROP ${tabletype} ${table}",
            Operation::Truncate => "DELETE FROM ${table}",
            Operation::Dump => "SELECT ${columns} FROM ${table} ORDER BY ${orderbycolumns}",
            Operation::QueryOver { template, .. } => template,
        }
    }

    /// Dump needs at least one column it can order by; every other operation
    /// applies to any table.
    pub fn applies_to(&self, table: Table<'_>) -> bool {
        match self {
            Operation::Dump => table.columns().iter().any(|col| !col.is_large_object()),
            _ => true,
        }
    }

    /// Whether the operation changes the data source rather than reading from it.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Operation::Drop | Operation::Truncate)
    }

    /// Human-readable result for a table, given the rows counted or affected.
    pub fn describe_result(&self, rows: u64) -> String {
        match self {
            Operation::Count => count_message(rows),
            Operation::Drop => "dropped".to_string(),
            Operation::Truncate if rows == 0 => "truncated; was already empty".to_string(),
            Operation::Truncate => format!("truncated; had {rows} rows"),
            Operation::Dump => format!("{rows} rows dumped"),
            Operation::QueryOver { .. } if rows == 0 => "-".to_string(),
            Operation::QueryOver { .. } => rows.to_string(),
        }
    }
}

pub fn count_message(rows: u64) -> String {
    match rows {
        0 => "empty".to_string(),
        1 => "1 row".to_string(),
        n => format!("{n} rows"),
    }
}

impl FromStr for Operation {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Operation::Count),
            "drop" => Ok(Operation::Drop),
            "truncate" => Ok(Operation::Truncate),
            "dump" => Ok(Operation::Dump),
            other => Err(TemplateError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

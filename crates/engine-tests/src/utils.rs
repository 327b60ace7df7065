#![allow(dead_code)]

use crate::SHOP_SNAPSHOT;
use engine_config::report::{step::StepOutcome, summary::ExecutionReport};
use engine_core::{
    connection::{Connection, Row},
    error::ActionError,
};
use model::catalog::Catalog;
use std::{fs, path::Path};

pub fn shop_catalog() -> Catalog {
    Catalog::from_json(SHOP_SNAPSHOT).expect("valid shop snapshot")
}

/// Records every statement; rejects the ones naming `reject` and answers
/// queries with `rows`.
#[derive(Default)]
pub struct RecordingConnection {
    pub statements: Vec<String>,
    pub reject: Option<String>,
    pub rows: Vec<Row>,
}

impl RecordingConnection {
    pub fn rejecting(table: &str) -> Self {
        Self {
            reject: Some(table.to_string()),
            ..Default::default()
        }
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    fn record(&mut self, statement: &str) -> Result<(), ActionError> {
        self.statements.push(statement.to_string());
        match &self.reject {
            Some(table) if statement.contains(table.as_str()) => Err(ActionError::Rejected {
                statement: statement.to_string(),
                message: format!("permission denied for table {table}"),
            }),
            _ => Ok(()),
        }
    }
}

impl Connection for RecordingConnection {
    fn execute(&mut self, statement: &str) -> Result<u64, ActionError> {
        self.record(statement)?;
        Ok(self.rows.len() as u64)
    }

    fn query(&mut self, statement: &str) -> Result<Vec<Row>, ActionError> {
        self.record(statement)?;
        Ok(self.rows.clone())
    }
}

pub fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

pub fn assert_outcomes(report: &ExecutionReport, expected: &[StepOutcome]) {
    assert_eq!(report.outcomes(), expected, "report:\n{report}");
}

pub fn step_names(report: &ExecutionReport) -> Vec<String> {
    report.steps.iter().map(|s| s.subject.to_string()).collect()
}

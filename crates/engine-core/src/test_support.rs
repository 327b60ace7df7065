use crate::{
    connection::{Connection, Row},
    error::ActionError,
};
use model::catalog::{
    Catalog,
    column::Column,
    relationship::{ColumnPair, RelationshipKind},
    table::TableType,
};

/// PUBLIC.BOOKS: AUTHORS and BOOKS referenced by BOOKAUTHORS, a self-referencing
/// EMPLOYEES table, and a view.
pub fn books_catalog() -> Catalog {
    let mut b = Catalog::builder();
    let s = b.add_schema(Some("PUBLIC"), Some("BOOKS")).unwrap();
    let authors = b.add_table(s, "AUTHORS", TableType::Table).unwrap();
    let books = b.add_table(s, "BOOKS", TableType::Table).unwrap();
    let ba = b.add_table(s, "BOOKAUTHORS", TableType::Table).unwrap();
    let emp = b.add_table(s, "EMPLOYEES", TableType::Table).unwrap();
    let view = b.add_table(s, "AUTHORSLIST", TableType::View).unwrap();

    b.add_column(authors, Column::new("ID", 1, "INTEGER").primary_key())
        .unwrap();
    b.add_column(authors, Column::new("LASTNAME", 2, "VARCHAR(20)"))
        .unwrap();
    b.add_column(books, Column::new("ID", 1, "INTEGER").primary_key())
        .unwrap();
    b.add_column(books, Column::new("TITLE", 2, "VARCHAR(255)").not_null())
        .unwrap();
    b.add_column(ba, Column::new("BOOKID", 1, "INTEGER").not_null())
        .unwrap();
    b.add_column(ba, Column::new("AUTHORID", 2, "INTEGER").not_null())
        .unwrap();
    b.add_column(emp, Column::new("ID", 1, "INTEGER").primary_key())
        .unwrap();
    b.add_column(emp, Column::new("MANAGER_ID", 2, "INTEGER"))
        .unwrap();
    b.add_column(view, Column::new("LASTNAME", 1, "VARCHAR(20)"))
        .unwrap();

    b.add_relationship(
        "FK_BA_AUTHOR",
        authors,
        ba,
        RelationshipKind::ForeignKey,
        vec![ColumnPair::new("ID", "AUTHORID")],
    )
    .unwrap();
    b.add_relationship(
        "FK_BA_BOOK",
        books,
        ba,
        RelationshipKind::ForeignKey,
        vec![ColumnPair::new("ID", "BOOKID")],
    )
    .unwrap();
    b.add_relationship(
        "FK_EMP_MANAGER",
        emp,
        emp,
        RelationshipKind::Inferred,
        vec![ColumnPair::new("ID", "MANAGER_ID")],
    )
    .unwrap();
    b.build()
}

/// Connection that answers every query with a fixed row set and rejects any
/// statement containing `fail_on`.
#[derive(Default)]
pub struct ScriptedConnection {
    pub rows: Vec<Row>,
    pub fail_on: Option<String>,
    pub executed: Vec<String>,
}

impl ScriptedConnection {
    pub fn returning(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    fn check(&mut self, statement: &str) -> Result<(), ActionError> {
        self.executed.push(statement.to_string());
        match &self.fail_on {
            Some(pattern) if statement.contains(pattern.as_str()) => Err(ActionError::Rejected {
                statement: statement.to_string(),
                message: "rejected by test".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Connection for ScriptedConnection {
    fn execute(&mut self, statement: &str) -> Result<u64, ActionError> {
        self.check(statement)?;
        Ok(self.rows.len() as u64)
    }

    fn query(&mut self, statement: &str) -> Result<Vec<Row>, ActionError> {
        self.check(statement)?;
        Ok(self.rows.clone())
    }
}

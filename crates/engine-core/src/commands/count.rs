use super::to_json;
use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::{catalog::table::TableType, execution::format::OutputFormat};
use planner::{
    operation::{Operation, count_message},
    statement::{dialect::Ansi, renderer::StatementRenderer},
};
use serde::Serialize;
use std::fmt::Write;
use tracing::debug;

/// Row counts for every base table, read through the connection.
pub struct CountCommand;

#[derive(Serialize)]
struct TableCount {
    table: String,
    rows: u64,
}

impl Command for CountCommand {
    fn description(&self) -> &str {
        "Count rows in every table"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Json]
    }

    fn uses_connection(&self) -> bool {
        true
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let catalog = ctx.catalog;
        let format = ctx.format;
        let renderer = StatementRenderer::new(&Ansi);
        let connection = ctx.connection("count")?;

        let mut counts = Vec::new();
        for table in catalog.tables(None) {
            if *table.table_type() != TableType::Table {
                continue;
            }
            let statement = renderer.render(Operation::Count.template(), table);
            debug!("Counting rows: {}", statement);
            counts.push(TableCount {
                table: table.full_name(),
                rows: connection.query_count(&statement)?,
            });
        }

        if format == OutputFormat::Json {
            return Ok(Content::Text(to_json("count", &counts)?));
        }

        let mut out = String::new();
        for count in &counts {
            let _ = writeln!(out, "{:<40} {}", count.table, count_message(count.rows));
        }
        Ok(Content::Text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ActionError,
        test_support::{ScriptedConnection, books_catalog},
    };

    #[test]
    fn counts_base_tables_only() {
        let catalog = books_catalog();
        let mut conn = ScriptedConnection::returning(vec![vec!["3".into()]]);
        let mut ctx = CommandContext::new(&catalog, OutputFormat::Text, Some(&mut conn));
        let content = CountCommand.produce(&mut ctx).unwrap();
        let text = std::str::from_utf8(content.as_bytes()).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("PUBLIC.BOOKS.AUTHORS"));
        assert!(text.contains("3 rows"));
        assert!(!text.contains("AUTHORSLIST"));
        assert_eq!(
            conn.executed[0],
            r#"SELECT COUNT(*) FROM "PUBLIC"."BOOKS"."AUTHORS""#
        );
    }

    #[test]
    fn non_numeric_count_is_unexpected() {
        let catalog = books_catalog();
        let mut conn = ScriptedConnection::returning(vec![vec!["many".into()]]);
        let mut ctx = CommandContext::new(&catalog, OutputFormat::Json, Some(&mut conn));

        assert!(matches!(
            CountCommand.produce(&mut ctx),
            Err(EngineError::Action(ActionError::UnexpectedResult { .. }))
        ));
    }

    #[test]
    fn requires_a_connection() {
        let catalog = books_catalog();
        let mut ctx = CommandContext::new(&catalog, OutputFormat::Text, None);

        assert!(matches!(
            CountCommand.produce(&mut ctx),
            Err(EngineError::Action(ActionError::NoConnection(_)))
        ));
    }
}

use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::{catalog::table::TableType, execution::format::OutputFormat};
use planner::{
    operation::Operation,
    statement::{dialect::Ansi, renderer::StatementRenderer},
};
use std::fmt::Write;

/// Tab-separated rows of every base table, ordered by all columns.
pub struct DumpCommand;

impl Command for DumpCommand {
    fn description(&self) -> &str {
        "Dump table contents"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Text]
    }

    fn uses_connection(&self) -> bool {
        true
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let catalog = ctx.catalog;
        let renderer = StatementRenderer::new(&Ansi);
        let connection = ctx.connection("dump")?;
        let mut out = String::new();

        for table in catalog.tables(None) {
            if *table.table_type() != TableType::Table || !Operation::Dump.applies_to(table) {
                continue;
            }
            let statement = renderer.render(Operation::Dump.template(), table);
            let rows = connection.query(&statement)?;

            let _ = writeln!(out, "-- {} ({})", table.full_name(), Operation::Dump.describe_result(rows.len() as u64));
            let header: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
            let _ = writeln!(out, "{}", header.join("\t"));
            for row in &rows {
                let _ = writeln!(out, "{}", row.join("\t"));
            }
            out.push('\n');
        }

        Ok(Content::Text(out))
    }
}

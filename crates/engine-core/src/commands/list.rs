use super::to_json;
use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::execution::format::OutputFormat;
use serde::Serialize;
use std::fmt::Write;

/// One line per table: full name and table type.
pub struct ListCommand;

#[derive(Serialize)]
struct ListedTable {
    name: String,
    #[serde(rename = "type")]
    table_type: String,
    columns: usize,
}

impl Command for ListCommand {
    fn description(&self) -> &str {
        "List tables with their types"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Json]
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let listed: Vec<ListedTable> = ctx
            .catalog
            .tables(None)
            .into_iter()
            .map(|table| ListedTable {
                name: table.full_name(),
                table_type: table.table_type().to_string(),
                columns: table.columns().len(),
            })
            .collect();

        if ctx.format == OutputFormat::Json {
            return Ok(Content::Text(to_json("list", &listed)?));
        }

        let mut out = String::new();
        for table in &listed {
            let _ = writeln!(out, "{:<40} [{}]", table.name, table.table_type.to_lowercase());
        }
        Ok(Content::Text(out))
    }
}

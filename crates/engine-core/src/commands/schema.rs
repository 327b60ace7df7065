use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::{catalog::relationship::Direction, execution::format::OutputFormat};
use std::fmt::Write;

/// Every table with its columns and outgoing foreign keys.
pub struct SchemaCommand;

impl Command for SchemaCommand {
    fn description(&self) -> &str {
        "Describe tables, columns and foreign keys"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Text]
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let mut out = String::new();

        for table in ctx.catalog.tables(None) {
            let _ = writeln!(out, "{} [{}]", table.full_name(), table.table_type());
            if let Some(remarks) = table.remarks() {
                let _ = writeln!(out, "  -- {remarks}");
            }

            for column in table.columns() {
                let mut flags = Vec::new();
                if column.part_of_primary_key {
                    flags.push("pk");
                }
                if !column.nullable {
                    flags.push("not null");
                }
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", flags.join(", "))
                };
                let _ = writeln!(out, "  {:<24} {}{}", column.name, column.type_name, flags);
            }

            for rel in table.relationships(Direction::Parent) {
                let pairs = rel
                    .column_pairs()
                    .iter()
                    .map(|pair| format!("{} -> {}.{}", pair.child, rel.parent().name(), pair.parent))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "  {} [{}]: {}", rel.name(), rel.kind(), pairs);
            }
            out.push('\n');
        }

        Ok(Content::Text(out))
    }
}

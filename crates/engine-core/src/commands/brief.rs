use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::{catalog::relationship::Direction, execution::format::OutputFormat};
use std::fmt::Write;

/// Schemas with their tables, each table followed by the tables it references.
pub struct BriefCommand;

impl Command for BriefCommand {
    fn description(&self) -> &str {
        "Summarise schemas, tables and relationships"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Text]
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let catalog = ctx.catalog;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} schemas, {} tables, {} relationships",
            catalog.schema_count(),
            catalog.table_count(),
            catalog.relationship_count()
        );

        for schema in catalog.schemas() {
            let label = match schema.full_name() {
                name if name.is_empty() => "(unqualified)".to_string(),
                name => name,
            };
            let _ = writeln!(out, "\n{label}");

            for table in schema.tables() {
                let _ = writeln!(out, "  {} [{}]", table.name(), table.table_type().as_str().to_lowercase());
                for parent in table.related_tables(Direction::Parent) {
                    let _ = writeln!(out, "    -> {}", parent.full_name());
                }
            }
        }

        Ok(Content::Text(out))
    }
}

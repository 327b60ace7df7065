use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::{
    catalog::{Catalog, relationship::RelationshipKind},
    execution::format::OutputFormat,
};
use std::fmt::Write;

/// Tables and relationships as a Graphviz digraph, or as a plain edge list.
/// Edges point from child to parent; inferred relationships are dashed.
pub struct GraphCommand;

impl Command for GraphCommand {
    fn description(&self) -> &str {
        "Render the relationship graph"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Dot, OutputFormat::Text]
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let out = match ctx.format {
            OutputFormat::Dot => dot(ctx.catalog),
            _ => edge_list(ctx.catalog),
        };
        Ok(Content::Text(out))
    }
}

fn dot(catalog: &Catalog) -> String {
    let mut out = String::from("digraph catalog {\n  rankdir=RL;\n  node [shape=box];\n");

    for table in catalog.tables(None) {
        let _ = writeln!(
            out,
            "  {} [label={}];",
            quote(&table.full_name()),
            quote(&format!("{}\\n{}", table.name(), table.table_type()))
        );
    }

    for rel in catalog.relationships() {
        let style = match rel.kind() {
            RelationshipKind::ForeignKey => "solid",
            RelationshipKind::Inferred => "dashed",
        };
        let _ = writeln!(
            out,
            "  {} -> {} [label={}, style={}];",
            quote(&rel.child().full_name()),
            quote(&rel.parent().full_name()),
            quote(rel.name()),
            style
        );
    }

    out.push_str("}\n");
    out
}

fn edge_list(catalog: &Catalog) -> String {
    catalog
        .relationships()
        .map(|rel| {
            format!(
                "{} -> {} ({}, {})\n",
                rel.child().full_name(),
                rel.parent().full_name(),
                rel.name(),
                rel.kind()
            )
        })
        .collect()
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('"', "\\\""))
}

//! Built-in catalog commands.

use crate::{error::EngineError, registry::CommandRegistry};

pub mod brief;
pub mod count;
pub mod dump;
pub mod graph;
pub mod list;
pub mod schema;
pub mod serialize;

pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register("brief", brief::BriefCommand);
    registry.register("count", count::CountCommand);
    registry.register("dump", dump::DumpCommand);
    registry.register("graph", graph::GraphCommand);
    registry.register("list", list::ListCommand);
    registry.register("schema", schema::SchemaCommand);
    registry.register("serialize", serialize::SerializeCommand);
}

fn to_json<T: serde::Serialize>(command: &str, value: &T) -> Result<String, EngineError> {
    serde_json::to_string_pretty(value).map_err(|err| EngineError::command(command, err.to_string()))
}

use crate::{
    error::EngineError,
    registry::{Command, CommandContext},
    sink::Content,
};
use model::{catalog::Catalog, execution::format::OutputFormat};

/// The catalog snapshot as pretty-printed JSON, loadable with [`Catalog::from_json`].
pub struct SerializeCommand;

impl Command for SerializeCommand {
    fn description(&self) -> &str {
        "Serialize the catalog as a JSON snapshot"
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &[OutputFormat::Json]
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        let json = ctx
            .catalog
            .to_json_pretty()
            .map_err(|err| EngineError::command("serialize", err.to_string()))?;
        Ok(Content::Text(json))
    }
}

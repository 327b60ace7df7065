//! Maps command ids to command implementations.
//!
//! The registry is an ordinary value: build it once at startup, share it with
//! engines through an `Arc`, and construct isolated registries in tests.

use crate::{commands, connection::Connection, error::EngineError, sink::Content};
use model::{
    catalog::Catalog,
    core::identifiers::CommandId,
    execution::format::OutputFormat,
};
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::debug;

/// Everything a command sees while producing its content.
pub struct CommandContext<'a, 'c> {
    pub catalog: &'a Catalog,
    pub format: OutputFormat,
    connection: Option<&'a mut (dyn Connection + 'c)>,
}

impl<'a, 'c> CommandContext<'a, 'c> {
    pub fn new(
        catalog: &'a Catalog,
        format: OutputFormat,
        connection: Option<&'a mut (dyn Connection + 'c)>,
    ) -> Self {
        Self {
            catalog,
            format,
            connection,
        }
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// The live connection, or an action error naming the command that needed it.
    pub fn connection(&mut self, command: &str) -> Result<&mut (dyn Connection + 'c), EngineError> {
        self.connection
            .as_deref_mut()
            .ok_or_else(|| crate::error::ActionError::NoConnection(command.to_string()).into())
    }
}

pub trait Command: Send + Sync {
    fn description(&self) -> &str;

    fn supported_formats(&self) -> &[OutputFormat];

    fn uses_connection(&self) -> bool {
        false
    }

    fn supports(&self, format: OutputFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError>;
}

/// Adapts a closure into a [`Command`], mostly for overrides in tests and
/// scripting front-ends.
pub struct FnCommand<F> {
    description: String,
    formats: Vec<OutputFormat>,
    produce: F,
}

impl<F> FnCommand<F>
where
    F: Fn(&mut CommandContext<'_, '_>) -> Result<Content, EngineError> + Send + Sync,
{
    pub fn new(description: impl Into<String>, formats: &[OutputFormat], produce: F) -> Self {
        Self {
            description: description.into(),
            formats: formats.to_vec(),
            produce,
        }
    }
}

impl<F> Command for FnCommand<F>
where
    F: Fn(&mut CommandContext<'_, '_>) -> Result<Content, EngineError> + Send + Sync,
{
    fn description(&self) -> &str {
        &self.description
    }

    fn supported_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn produce(&self, ctx: &mut CommandContext<'_, '_>) -> Result<Content, EngineError> {
        (self.produce)(ctx)
    }
}

#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<CommandId, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        commands::register_builtins(&mut registry);
        registry
    }

    /// Binds `id` to `command`. Re-registering an id replaces the previous
    /// binding, which is returned.
    pub fn register(
        &mut self,
        id: impl Into<CommandId>,
        command: impl Command + 'static,
    ) -> Option<Arc<dyn Command>> {
        self.register_shared(id, Arc::new(command))
    }

    pub fn register_shared(
        &mut self,
        id: impl Into<CommandId>,
        command: Arc<dyn Command>,
    ) -> Option<Arc<dyn Command>> {
        let id = id.into();
        debug!("Registering command `{}`", id);
        self.commands.insert(id, command)
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Command>, EngineError> {
        self.commands
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownCommand(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    /// Registered commands, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&CommandId, &Arc<dyn Command>)> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}

//! Command registry: name → handler + documentation
//!
//! Commands are registered explicitly at startup. Handlers are plain async
//! function pointers over the controller type, so the registry owns no state
//! besides the table itself.

use super::error::{CommandError, RegistryError};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Result of a command: an optional message to print
pub type CommandResult = Result<Option<String>, CommandError>;

pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = CommandResult> + 'a>>;

/// Async command handler
pub type Handler<C> = for<'a> fn(CommandContext<'a, C>, Vec<String>) -> CommandFuture<'a>;

/// Timing used by button commands
#[derive(Debug, Clone, Copy)]
pub struct ButtonTiming {
    /// How long a push keeps the buttons pressed
    pub push_duration: Duration,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            push_duration: Duration::from_millis(100),
        }
    }
}

/// What a handler gets to work with
pub struct CommandContext<'a, C> {
    pub controller: &'a mut C,
    pub timing: &'a ButtonTiming,
}

pub struct Command<C> {
    pub name: String,
    pub handler: Handler<C>,
    pub doc: String,
}

pub struct CommandRegistry<C> {
    commands: BTreeMap<String, Command<C>>,
}

impl<C> CommandRegistry<C> {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Registers a command; a name can only be registered once
    pub fn register(
        &mut self,
        name: &str,
        handler: Handler<C>,
        doc: &str,
    ) -> Result<(), RegistryError> {
        if self.commands.contains_key(name) {
            return Err(RegistryError::DuplicateCommand(name.to_string()));
        }
        debug!("Registering command {}", name);
        self.commands.insert(
            name.to_string(),
            Command {
                name: name.to_string(),
                handler,
                doc: doc.to_string(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command<C>> {
        self.commands.get(name)
    }

    /// Commands ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &Command<C>> {
        self.commands.values()
    }
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::mock::MockController;

    fn first(_ctx: CommandContext<'_, MockController>, _args: Vec<String>) -> CommandFuture<'_> {
        Box::pin(async { CommandResult::Ok(Some("first".to_string())) })
    }

    fn second(_ctx: CommandContext<'_, MockController>, _args: Vec<String>) -> CommandFuture<'_> {
        Box::pin(async { CommandResult::Ok(Some("second".to_string())) })
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_and_original_kept() {
        let mut registry = CommandRegistry::<MockController>::new();
        registry.register("greet", first, "first doc").unwrap();

        let err = registry.register("greet", second, "second doc").unwrap_err();
        assert_eq!(err.to_string(), "Command greet already registered.");
        assert_eq!(registry.iter().count(), 1);

        let command = registry.get("greet").unwrap();
        assert_eq!(command.doc, "first doc");

        let mut controller = MockController::new();
        let timing = ButtonTiming::default();
        let handler = command.handler;
        let ctx = CommandContext {
            controller: &mut controller,
            timing: &timing,
        };
        assert_eq!(
            handler(ctx, Vec::new()).await.unwrap(),
            Some("first".to_string())
        );
    }
}

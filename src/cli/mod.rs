//! Command console
//!
//! 1. [`tokenizer`] - Shell-like splitting and `&&` chaining
//! 2. [`registry`] - Named async handlers with their documentation
//! 3. [`dispatcher`] - Resolves lines into built-in, registered or button commands
//! 4. [`stick`] / [`commands`] - The command implementations

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod help;
pub mod registry;
pub mod stick;
pub mod tokenizer;

pub use commands::{register_controller_commands, DEFAULT_MASH_PRESSES};
pub use dispatcher::{ControllerCli, Flow, LineOutcome, EXIT_COMMAND};
pub use error::{CommandError, RegistryError};
pub use registry::{ButtonTiming, CommandRegistry};
pub use stick::describe;
pub use tokenizer::TokenizeError;

//! Error definitions for the command console

use super::tokenizer::TokenizeError;
use crate::controller::ControllerError;
use thiserror::Error;

/// Errors raised while setting up the command registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Command {0} already registered.")]
    DuplicateCommand(String),
}

/// Errors of a single command invocation; printed, never fatal to the session
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Value of side must be \"l\", \"left\" or \"r\", \"right\"")]
    InvalidSide(String),

    #[error("Unexpected argument \"{0}\"")]
    InvalidDirection(String),

    #[error("Missing value")]
    MissingValue,

    #[error("Unexpected stick value \"{0}\"")]
    InvalidValue(String),

    #[error("Unexpected {name} \"{value}\"")]
    InvalidArgument { name: &'static str, value: String },

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

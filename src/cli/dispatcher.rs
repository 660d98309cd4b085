//! Line dispatcher of the command console
//!
//! Resolves every `&&` segment of a line against the built-in commands and the
//! registry. Errors stop only the segment that raised them.

use super::error::CommandError;
use super::help::strip_common_indent;
use super::registry::{ButtonTiming, CommandContext, CommandRegistry, CommandResult};
use super::stick::{stick_command, STICK_DOC};
use super::tokenizer::{split_chain, tokenize};
use crate::controller::ControllerState;
use std::fmt::Display;
use std::io::Write;
use tracing::{debug, warn};

/// Reserved token that ends the session
pub const EXIT_COMMAND: &str = "exit";

const HELP_DOC: &str = "
    help - Print this help.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What remains to be done after a line was dispatched
#[derive(Debug, PartialEq, Eq)]
pub struct LineOutcome {
    pub flow: Flow,
    /// Button names collected by the fallback, to be pushed together
    pub buttons: Vec<String>,
}

pub struct ControllerCli<C, W> {
    controller: C,
    registry: CommandRegistry<C>,
    timing: ButtonTiming,
    out: W,
}

impl<C: ControllerState, W: Write> ControllerCli<C, W> {
    pub fn new(controller: C, registry: CommandRegistry<C>, timing: ButtonTiming, out: W) -> Self {
        Self {
            controller,
            registry,
            timing,
            out,
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn timing(&self) -> ButtonTiming {
        self.timing
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Writes one line of console output
    pub fn print(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Failed to write console output: {}", e);
        }
    }

    /// Writes without a trailing newline
    pub fn prompt(&mut self, text: &str) {
        if let Err(e) = write!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Failed to write console output: {}", e);
        }
    }

    fn not_found(&mut self, name: &str) {
        self.print(format!("command {} not found, call help for help.", name));
    }

    pub fn help_text(&self) -> String {
        let buttons: Vec<&str> = self
            .controller
            .available_buttons()
            .iter()
            .map(String::as_str)
            .collect();

        let mut text = String::from("Button commands:\n");
        text.push_str(&buttons.join(", "));
        text.push_str("\n\nCommands:\n");

        let builtins = [HELP_DOC, STICK_DOC];
        let registered = self.registry.iter().map(|command| command.doc.as_str());
        for doc in builtins.into_iter().chain(registered) {
            if doc.trim().is_empty() {
                continue;
            }
            text.push_str(&strip_common_indent(doc));
            text.push('\n');
        }

        text.push_str("Commands can be chained using \"&&\"\n");
        text.push_str("Type \"exit\" to close.");
        text
    }

    /// Runs a built-in or registered command; `None` if the name is unknown
    async fn execute(&mut self, name: &str, args: Vec<String>) -> Option<CommandResult> {
        match name {
            "help" => return Some(Ok(Some(self.help_text()))),
            "stick" => return Some(stick_command(&mut self.controller, &args).map(Some)),
            _ => {}
        }

        let handler = self.registry.get(name)?.handler;
        debug!("Running command {} {:?}", name, args);
        let ctx = CommandContext {
            controller: &mut self.controller,
            timing: &self.timing,
        };
        Some(handler(ctx, args).await)
    }

    fn report(&mut self, name: &str, result: CommandResult) -> bool {
        match result {
            Ok(Some(message)) if !message.is_empty() => self.print(message),
            Ok(_) => {}
            Err(e) => {
                debug!("Command {} failed: {}", name, e);
                self.print(e);
            }
        }
        true
    }

    /// Runs one command and prints its outcome; returns `false` if unknown
    pub async fn run_command(&mut self, name: &str, args: Vec<String>) -> bool {
        match self.execute(name, args).await {
            Some(result) => self.report(name, result),
            None => {
                self.not_found(name);
                false
            }
        }
    }

    /// Dispatches a full console line, collecting button names for a push
    pub async fn dispatch_line(&mut self, line: &str) -> LineOutcome {
        let mut buttons = Vec::new();

        for segment in split_chain(line) {
            let tokens = match tokenize(segment) {
                Ok(tokens) => tokens,
                Err(e) => {
                    self.print(CommandError::from(e));
                    continue;
                }
            };
            let Some((name, args)) = tokens.split_first() else {
                continue;
            };

            if name == EXIT_COMMAND {
                return LineOutcome {
                    flow: Flow::Exit,
                    buttons,
                };
            }

            match self.execute(name, args.to_vec()).await {
                Some(result) => {
                    self.report(name, result);
                }
                None => self.collect_buttons(name, args, &mut buttons),
            }
        }

        LineOutcome {
            flow: Flow::Continue,
            buttons,
        }
    }

    fn collect_buttons(&mut self, name: &str, args: &[String], buttons: &mut Vec<String>) {
        if !self.controller.available_buttons().contains(name) {
            self.not_found(name);
            return;
        }
        for token in std::iter::once(name).chain(args.iter().map(String::as_str)) {
            if !self.controller.available_buttons().contains(token) {
                self.not_found(token);
            } else if !buttons.iter().any(|b| b == token) {
                buttons.push(token.to_string());
            }
        }
    }
}

//! Session loop: drives the controller from console lines or live key events
//!
//! The two modes are exclusive; a session runs exactly one of them until it
//! ends. Everything happens on one task, so handlers finish before the next
//! line or key event is looked at.

use crate::cli::{describe, ControllerCli, Flow};
use crate::controller::{button_push, ControllerError, ControllerState, StickSide};
use crate::input::KeyEvent;
use crate::mapping::{Effect, KeyboardTranslator, SpecialMode};
use std::io::Write;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `exit` typed or Esc pressed
    Exit,
    InputClosed,
    ConnectionLost,
    Interrupted,
}

pub struct Session<C, W> {
    cli: ControllerCli<C, W>,
    translator: KeyboardTranslator,
    prompt: String,
    mash_args: Vec<String>,
}

impl<C: ControllerState, W: Write> Session<C, W> {
    pub fn new(
        cli: ControllerCli<C, W>,
        translator: KeyboardTranslator,
        prompt: impl Into<String>,
        mash_args: Vec<String>,
    ) -> Self {
        Self {
            cli,
            translator,
            prompt: prompt.into(),
            mash_args,
        }
    }

    pub fn cli(&self) -> &ControllerCli<C, W> {
        &self.cli
    }

    #[cfg(test)]
    pub fn translator(&self) -> &KeyboardTranslator {
        &self.translator
    }

    /// Line console: every line is dispatched, then the state is pushed once
    pub async fn run_console(
        &mut self,
        mut lines: mpsc::Receiver<String>,
        token: CancellationToken,
    ) -> SessionEnd {
        info!("Starting console session");

        loop {
            self.cli.prompt(&self.prompt);
            let line = tokio::select! {
                _ = token.cancelled() => {
                    info!("Console session cancelled");
                    return SessionEnd::Interrupted;
                }
                line = lines.recv() => line,
            };

            let Some(line) = line else {
                info!("Console input closed");
                return SessionEnd::InputClosed;
            };
            if line.trim().is_empty() {
                continue;
            }

            let outcome = self.cli.dispatch_line(&line).await;
            if outcome.flow == Flow::Exit {
                info!("Exit requested");
                return SessionEnd::Exit;
            }

            let result = if outcome.buttons.is_empty() {
                self.cli.controller_mut().send().await
            } else {
                let duration = self.cli.timing().push_duration;
                button_push(self.cli.controller_mut(), &outcome.buttons, duration).await
            };
            match result {
                Ok(()) => {}
                Err(ControllerError::NotConnected) => {
                    error!("Connection was lost.");
                    return SessionEnd::ConnectionLost;
                }
                Err(e) => self.cli.print(e),
            }
        }
    }

    /// Live keyboard mode: key events are translated into controller effects
    pub async fn run_live(
        &mut self,
        mut events: mpsc::Receiver<KeyEvent>,
        token: CancellationToken,
    ) -> SessionEnd {
        info!("Starting live keyboard session, press Esc to leave");
        self.cli.print("Live keyboard mode, press Esc to leave.");

        loop {
            let event = tokio::select! {
                _ = token.cancelled() => {
                    info!("Live session cancelled");
                    return SessionEnd::Interrupted;
                }
                event = events.recv() => event,
            };

            let Some(event) = event else {
                info!("Key event stream ended");
                return SessionEnd::InputClosed;
            };
            if event.is_termination() {
                info!(
                    "Esc pressed, leaving live mode ({} keys held, {:?})",
                    self.translator.held_count(),
                    self.translator.modes()
                );
                return SessionEnd::Exit;
            }

            debug!("Key event: {}", event);
            if let Some(effect) = self.translator.handle(&event) {
                self.apply(effect).await;
            }
        }
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Hold(button) => {
                self.cli.run_command("hold", vec![button]).await;
            }
            Effect::Release(button) => {
                self.cli.run_command("release", vec![button]).await;
            }
            Effect::Stick { side, axis, value } => {
                let stick = self.cli.controller_mut().stick_mut(side);
                if let Err(e) = stick.set_axis(axis, value) {
                    warn!("Failed to move {} stick: {}", side, e);
                    return;
                }
                let message = describe(side, self.cli.controller().stick(side));
                self.cli.print(message);
                self.push_state().await;
            }
            Effect::Mash => {
                let args = self.mash_args.clone();
                self.cli.run_command("mash", args).await;
            }
            Effect::Toggled { mode, enabled } => {
                self.cli
                    .print(format!("{} turned {}", mode, if enabled { "on" } else { "off" }));
                if mode == SpecialMode::Camera {
                    let stick = self.cli.controller_mut().stick_mut(StickSide::Right);
                    if enabled {
                        stick.set_up();
                    } else {
                        stick.set_center();
                    }
                    self.push_state().await;
                }
            }
        }
    }

    // Live mode keeps going when a push fails
    async fn push_state(&mut self) {
        if let Err(e) = self.cli.controller_mut().send().await {
            warn!("Failed to push controller state: {}", e);
        }
    }
}

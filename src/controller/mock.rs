// Recording controller used by the dispatcher and session tests

use super::controller_state::{ControllerError, ControllerState, StickSide, StickState};
use super::virtual_controller::PRO_CONTROLLER_BUTTONS;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Set(String, bool),
    Send,
}

/// State seen by the device at one `send`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub pressed: BTreeSet<String>,
    pub left_stick: (i32, i32),
    pub right_stick: (i32, i32),
}

impl Sent {
    /// Snapshot with the given buttons pressed and both sticks centred
    pub fn pressed(buttons: &[&str]) -> Self {
        Self {
            pressed: buttons.iter().map(|b| b.to_string()).collect(),
            left_stick: (2048, 2048),
            right_stick: (2048, 2048),
        }
    }
}

pub struct MockController {
    available: BTreeSet<String>,
    pub pressed: BTreeSet<String>,
    pub left_stick: StickState,
    pub right_stick: StickState,
    pub calls: Vec<Call>,
    pub sent: Vec<Sent>,
    pub connected: bool,
}

impl MockController {
    pub fn new() -> Self {
        Self {
            available: PRO_CONTROLLER_BUTTONS.iter().map(|b| b.to_string()).collect(),
            pressed: BTreeSet::new(),
            left_stick: StickState::default(),
            right_stick: StickState::default(),
            calls: Vec::new(),
            sent: Vec::new(),
            connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }
}

impl ControllerState for MockController {
    fn available_buttons(&self) -> &BTreeSet<String> {
        &self.available
    }

    fn set_button(&mut self, button: &str, pushed: bool) -> Result<(), ControllerError> {
        if !self.available.contains(button) {
            return Err(ControllerError::UnknownButton(button.to_string()));
        }
        self.calls.push(Call::Set(button.to_string(), pushed));
        if pushed {
            self.pressed.insert(button.to_string());
        } else {
            self.pressed.remove(button);
        }
        Ok(())
    }

    fn stick(&self, side: StickSide) -> &StickState {
        match side {
            StickSide::Left => &self.left_stick,
            StickSide::Right => &self.right_stick,
        }
    }

    fn stick_mut(&mut self, side: StickSide) -> &mut StickState {
        match side {
            StickSide::Left => &mut self.left_stick,
            StickSide::Right => &mut self.right_stick,
        }
    }

    async fn send(&mut self) -> Result<(), ControllerError> {
        if !self.connected {
            return Err(ControllerError::NotConnected);
        }
        self.calls.push(Call::Send);
        self.sent.push(Sent {
            pressed: self.pressed.clone(),
            left_stick: (self.left_stick.h(), self.left_stick.v()),
            right_stick: (self.right_stick.h(), self.right_stick.v()),
        });
        Ok(())
    }
}

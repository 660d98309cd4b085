//! Controller State - contract for the virtual controller service
//!
//! The session and all commands talk to the controller exclusively through the
//! [`ControllerState`] trait: button setters, the two analog sticks, and an async
//! `send` that hands the current state to the device side.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Lowest raw stick value
pub const STICK_MIN: i32 = 0;

/// Highest raw stick value
pub const STICK_MAX: i32 = 4095;

/// Raw value of a centred stick axis
pub const STICK_CENTER: i32 = 2048;

/// Errors reported by the controller service
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The device side is gone; state can no longer be delivered
    #[error("Controller is not connected")]
    NotConnected,

    /// A button name that the controller does not offer
    #[error("Unknown button \"{0}\"")]
    UnknownButton(String),

    /// Explicit stick value outside the raw stick range
    #[error("Stick value {value} on axis {axis} is outside of [0, 4095]")]
    StickValueOutOfRange { axis: Axis, value: i32 },
}

// Stick side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickSide {
    Left,
    Right,
}

impl fmt::Display for StickSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StickSide::Left => write!(f, "left"),
            StickSide::Right => write!(f, "right"),
        }
    }
}

// Stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "h"),
            Axis::Vertical => write!(f, "v"),
        }
    }
}

/// Position of one analog stick in raw units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickState {
    h: i32,
    v: i32,
}

impl Default for StickState {
    fn default() -> Self {
        Self {
            h: STICK_CENTER,
            v: STICK_CENTER,
        }
    }
}

impl StickState {
    pub fn set_center(&mut self) {
        self.h = STICK_CENTER;
        self.v = STICK_CENTER;
    }

    pub fn set_up(&mut self) {
        self.h = STICK_CENTER;
        self.v = STICK_MAX;
    }

    pub fn set_down(&mut self) {
        self.h = STICK_CENTER;
        self.v = STICK_MIN;
    }

    pub fn set_left(&mut self) {
        self.h = STICK_MIN;
        self.v = STICK_CENTER;
    }

    pub fn set_right(&mut self) {
        self.h = STICK_MAX;
        self.v = STICK_CENTER;
    }

    pub fn set_h(&mut self, value: i32) -> Result<(), ControllerError> {
        self.h = check_range(Axis::Horizontal, value)?;
        Ok(())
    }

    pub fn set_v(&mut self, value: i32) -> Result<(), ControllerError> {
        self.v = check_range(Axis::Vertical, value)?;
        Ok(())
    }

    pub fn set_axis(&mut self, axis: Axis, value: i32) -> Result<(), ControllerError> {
        match axis {
            Axis::Horizontal => self.set_h(value),
            Axis::Vertical => self.set_v(value),
        }
    }

    pub fn h(&self) -> i32 {
        self.h
    }

    pub fn v(&self) -> i32 {
        self.v
    }
}

fn check_range(axis: Axis, value: i32) -> Result<i32, ControllerError> {
    if (STICK_MIN..=STICK_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ControllerError::StickValueOutOfRange { axis, value })
    }
}

/// Controller-state service consumed by the console and the keyboard session
///
/// Setters only change local state; nothing reaches the device until
/// [`ControllerState::send`] is awaited.
pub trait ControllerState {
    /// Names of the buttons this controller offers
    fn available_buttons(&self) -> &BTreeSet<String>;

    /// Marks a button as pushed or released
    fn set_button(&mut self, button: &str, pushed: bool) -> Result<(), ControllerError>;

    fn stick(&self, side: StickSide) -> &StickState;

    fn stick_mut(&mut self, side: StickSide) -> &mut StickState;

    /// Delivers the current state; fails with [`ControllerError::NotConnected`]
    /// once the device side is gone
    fn send(&mut self) -> impl Future<Output = Result<(), ControllerError>>;
}

/// Pushes all `buttons` together: press, send, wait `duration`, release, send
pub async fn button_push<C: ControllerState>(
    controller: &mut C,
    buttons: &[String],
    duration: Duration,
) -> Result<(), ControllerError> {
    // Validate first so a typo leaves no button stuck
    if let Some(unknown) = buttons
        .iter()
        .find(|button| !controller.available_buttons().contains(button.as_str()))
    {
        return Err(ControllerError::UnknownButton(unknown.clone()));
    }

    debug!("Pushing {:?} for {:?}", buttons, duration);
    for button in buttons {
        controller.set_button(button, true)?;
    }
    controller.send().await?;

    tokio::time::sleep(duration).await;

    for button in buttons {
        controller.set_button(button, false)?;
    }
    controller.send().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::mock::{MockController, Sent};

    #[test]
    fn fixed_positions_use_raw_extremes() {
        let mut stick = StickState::default();
        stick.set_up();
        assert_eq!((stick.h(), stick.v()), (2048, 4095));
        stick.set_left();
        assert_eq!((stick.h(), stick.v()), (0, 2048));
        stick.set_center();
        assert_eq!((stick.h(), stick.v()), (2048, 2048));
    }

    #[test]
    fn explicit_values_outside_range_are_rejected() {
        let mut stick = StickState::default();
        assert!(stick.set_h(4096).is_err());
        assert!(stick.set_v(-1).is_err());
        assert_eq!((stick.h(), stick.v()), (2048, 2048));
        stick.set_v(0).unwrap();
        assert_eq!(stick.v(), 0);
    }

    #[tokio::test]
    async fn button_push_sends_pressed_then_released() {
        let mut controller = MockController::new();
        let buttons = vec!["a".to_string(), "b".to_string()];

        button_push(&mut controller, &buttons, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(
            controller.sent,
            vec![Sent::pressed(&["a", "b"]), Sent::pressed(&[])]
        );
    }

    #[tokio::test]
    async fn button_push_rejects_unknown_buttons_before_pressing() {
        let mut controller = MockController::new();
        let buttons = vec!["a".to_string(), "turbo".to_string()];

        let result = button_push(&mut controller, &buttons, Duration::ZERO).await;

        assert!(matches!(result, Err(ControllerError::UnknownButton(name)) if name == "turbo"));
        assert!(controller.sent.is_empty());
        assert!(controller.pressed.is_empty());
    }
}

//! Controller subsystem: the logical state of the virtual game controller
//!
//! 1. [`controller_state`] - Service contract, sticks and the push helper
//! 2. [`virtual_controller`] - Channel-backed pro controller
//!
//! # Architecture
//!
//! ```text
//! Console / Keyboard ──► ControllerState ──► ControllerReport ──► Transport
//!                        (setters, send)     (mpsc snapshots)
//! ```

pub mod controller_state;
pub mod virtual_controller;

#[cfg(test)]
pub mod mock;

pub use controller_state::{
    button_push, Axis, ControllerError, ControllerState, StickSide, StickState, STICK_CENTER,
    STICK_MAX, STICK_MIN,
};
pub use virtual_controller::{spawn_report_logger, ControllerReport, VirtualController};

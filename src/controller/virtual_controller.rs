//! Virtual Controller - channel-backed implementation of [`ControllerState`]
//!
//! Keeps the logical button and stick state of a pro controller. Every `send`
//! publishes a [`ControllerReport`] snapshot onto a bounded mpsc channel. Whatever
//! drains that channel plays the role of the device transport; when it goes away
//! the controller reports itself as not connected.
//!
//! ```text
//! Session ──► VirtualController ─[ControllerReport]→ transport / report logger
//!                                (mpsc::channel(n))
//! ```

use super::controller_state::{ControllerError, ControllerState, StickSide, StickState};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Buttons of the pro-controller layout
pub const PRO_CONTROLLER_BUTTONS: [&str; 18] = [
    "y", "x", "b", "a", "r", "zr", "minus", "plus", "r_stick", "l_stick", "home", "capture",
    "down", "up", "right", "left", "l", "zl",
];

/// Snapshot of the controller state at the time of a send
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerReport {
    pub pressed: BTreeSet<String>,
    pub left_stick: (i32, i32),
    pub right_stick: (i32, i32),
    pub timestamp: DateTime<Local>,
}

#[derive(Debug)]
pub struct VirtualController {
    available: BTreeSet<String>,
    pressed: BTreeSet<String>,
    left_stick: StickState,
    right_stick: StickState,
    report_sender: mpsc::Sender<ControllerReport>,
    reports_sent: u64,
}

impl VirtualController {
    pub fn new(report_sender: mpsc::Sender<ControllerReport>) -> Self {
        info!("Creating virtual pro controller");
        Self {
            available: PRO_CONTROLLER_BUTTONS
                .iter()
                .map(|button| button.to_string())
                .collect(),
            pressed: BTreeSet::new(),
            left_stick: StickState::default(),
            right_stick: StickState::default(),
            report_sender,
            reports_sent: 0,
        }
    }

    fn snapshot(&self) -> ControllerReport {
        ControllerReport {
            pressed: self.pressed.clone(),
            left_stick: (self.left_stick.h(), self.left_stick.v()),
            right_stick: (self.right_stick.h(), self.right_stick.v()),
            timestamp: Local::now(),
        }
    }
}

impl ControllerState for VirtualController {
    fn available_buttons(&self) -> &BTreeSet<String> {
        &self.available
    }

    fn set_button(&mut self, button: &str, pushed: bool) -> Result<(), ControllerError> {
        if !self.available.contains(button) {
            return Err(ControllerError::UnknownButton(button.to_string()));
        }
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
        let report = self.snapshot();
        match self.report_sender.send(report).await {
            Ok(()) => {
                self.reports_sent += 1;
                debug!("Controller report #{} sent", self.reports_sent);
                Ok(())
            }
            Err(_) => {
                warn!("Report channel closed after {} reports", self.reports_sent);
                Err(ControllerError::NotConnected)
            }
        }
    }
}

/// Drains controller reports and logs them, standing in for the device transport
pub fn spawn_report_logger(mut receiver: mpsc::Receiver<ControllerReport>) -> JoinHandle<()> {
    info!("Spawning controller report logger");
    tokio::spawn(async move {
        while let Some(report) = receiver.recv().await {
            debug!(
                "Report at {}: buttons={:?} left={:?} right={:?}",
                report.timestamp.format("%H:%M:%S.%3f"),
                report.pressed,
                report.left_stick,
                report.right_stick
            );
        }
        info!("Controller report logger finished");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_buttons_are_rejected() {
        let (tx, _rx) = mpsc::channel(4);
        let mut controller = VirtualController::new(tx);

        assert!(controller.set_button("a", true).is_ok());
        assert!(matches!(
            controller.set_button("turbo", true),
            Err(ControllerError::UnknownButton(_))
        ));
        assert_eq!(controller.pressed.len(), 1);
    }

    #[tokio::test]
    async fn send_publishes_a_snapshot() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut controller = VirtualController::new(tx);
        controller.set_button("zl", true).unwrap();
        controller.stick_mut(StickSide::Right).set_up();

        controller.send().await.unwrap();

        let report = rx.recv().await.unwrap();
        assert!(report.pressed.contains("zl"));
        assert_eq!(report.left_stick, (2048, 2048));
        assert_eq!(report.right_stick, (2048, 4095));
    }

    #[tokio::test]
    async fn send_without_receiver_is_not_connected() {
        let (tx, rx) = mpsc::channel(4);
        let mut controller = VirtualController::new(tx);
        drop(rx);

        assert!(matches!(
            controller.send().await,
            Err(ControllerError::NotConnected)
        ));
    }
}

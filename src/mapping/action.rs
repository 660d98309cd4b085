//! Aktionen, die eine gemappte Taste auslösen kann

use crate::controller::{Axis, StickSide};
use std::fmt;

/// Modus, der über eine Sondertaste umgeschaltet wird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialMode {
    /// Hält den rechten Stick oben und sperrt dessen Tastensteuerung
    Camera,
    /// Tauscht im linken Block Richtungstasten und linken Stick
    Dpad,
}

impl fmt::Display for SpecialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialMode::Camera => write!(f, "camera"),
            SpecialMode::Dpad => write!(f, "dpad"),
        }
    }
}

/// Neigungsrichtung einer Stick-Taste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// Hoch und rechts erhöhen den Rohwert der Achse
    pub fn sign(self) -> i32 {
        match self {
            Direction::Up | Direction::Right => 1,
            Direction::Down | Direction::Left => -1,
        }
    }
}

/// Wirkung einer Taste, festgelegt beim Aufbau der Tabelle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Gedrückt, solange die Taste gehalten wird
    Hold(String),
    /// Verschiebt eine Stick-Achse um `sign * step`, solange die Taste gehalten wird
    StickAdjust {
        side: StickSide,
        axis: Axis,
        sign: i32,
    },
    ToggleSpecial(SpecialMode),
    Mash,
}

impl Action {
    pub fn hold(button: &str) -> Self {
        Action::Hold(button.to_string())
    }

    pub fn tilt(side: StickSide, direction: Direction) -> Self {
        Action::StickAdjust {
            side,
            axis: direction.axis(),
            sign: direction.sign(),
        }
    }
}

//! Tabellen Taste → Aktion
//!
//! Die Tabelle besteht aus einem festen Basisteil und dem linken Block
//! (`S D E F` / `s d e f`). Für den linken Block gibt es zwei unveränderliche
//! Presets; der Dpad-Modus wählt nur aus, welches aktiv ist.

use super::action::{Action, Direction, SpecialMode};
use crate::controller::StickSide;
use crate::input::Key;
use std::collections::HashMap;
use tracing::info;

macro_rules! map_insert {
    ($map:expr, $key:expr, $action:expr) => {
        $map.insert($key, $action);
    };
}

/// Preset für den linken Block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterPreset {
    /// Großbuchstaben drücken Richtungstasten, Kleinbuchstaben neigen den linken Stick
    #[default]
    Standard,
    /// Kleinbuchstaben drücken Richtungstasten, Großbuchstaben neigen den linken Stick
    Dpad,
}

#[derive(Debug, Clone)]
pub struct KeyMapping {
    base: HashMap<Key, Action>,
    standard: HashMap<Key, Action>,
    dpad: HashMap<Key, Action>,
    active: ClusterPreset,
}

impl KeyMapping {
    /// Standard-Tastaturbelegung
    pub fn default_layout() -> Self {
        let mut base = HashMap::new();
        map_insert!(base, Key::Char('j'), Action::hold("b"));
        map_insert!(base, Key::Char('k'), Action::hold("y"));
        map_insert!(base, Key::Char('i'), Action::hold("x"));
        map_insert!(base, Key::Char('l'), Action::hold("a"));
        map_insert!(base, Key::Char('J'), Action::tilt(StickSide::Right, Direction::Left));
        map_insert!(base, Key::Char('K'), Action::tilt(StickSide::Right, Direction::Down));
        map_insert!(base, Key::Char('I'), Action::tilt(StickSide::Right, Direction::Up));
        map_insert!(base, Key::Char('L'), Action::tilt(StickSide::Right, Direction::Right));
        map_insert!(base, Key::Enter, Action::hold("plus"));
        map_insert!(base, Key::Backspace, Action::hold("minus"));
        map_insert!(base, Key::Char('w'), Action::hold("zl"));
        map_insert!(base, Key::Char('r'), Action::hold("l"));
        map_insert!(base, Key::Char('u'), Action::hold("r"));
        map_insert!(base, Key::Char('o'), Action::hold("zr"));
        map_insert!(base, Key::Char('g'), Action::hold("l_stick"));
        map_insert!(base, Key::Char('h'), Action::hold("r_stick"));
        map_insert!(base, Key::Tab, Action::hold("home"));
        map_insert!(base, Key::Char('\\'), Action::hold("capture"));
        map_insert!(base, Key::Char('6'), Action::ToggleSpecial(SpecialMode::Camera));
        map_insert!(base, Key::Char('p'), Action::Mash);
        map_insert!(base, Key::Char('x'), Action::ToggleSpecial(SpecialMode::Dpad));

        Self {
            base,
            standard: left_cluster(['S', 'D', 'E', 'F'], ['s', 'd', 'e', 'f']),
            dpad: left_cluster(['s', 'd', 'e', 'f'], ['S', 'D', 'E', 'F']),
            active: ClusterPreset::Standard,
        }
    }

    /// Aktuell an `key` gebundene Aktion
    pub fn action_for(&self, key: &Key) -> Option<&Action> {
        self.cluster().get(key).or_else(|| self.base.get(key))
    }

    pub fn select_preset(&mut self, preset: ClusterPreset) {
        if self.active != preset {
            info!("Left cluster preset: {:?} -> {:?}", self.active, preset);
            self.active = preset;
        }
    }

    #[cfg(test)]
    pub fn active_preset(&self) -> ClusterPreset {
        self.active
    }

    fn cluster(&self) -> &HashMap<Key, Action> {
        match self.active {
            ClusterPreset::Standard => &self.standard,
            ClusterPreset::Dpad => &self.dpad,
        }
    }
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self::default_layout()
    }
}

/// Baut ein Preset für den linken Block; beide Arrays in der Reihenfolge links, unten, oben, rechts
fn left_cluster(buttons: [char; 4], tilt: [char; 4]) -> HashMap<Key, Action> {
    let directions = [
        ("left", Direction::Left),
        ("down", Direction::Down),
        ("up", Direction::Up),
        ("right", Direction::Right),
    ];

    let mut cluster = HashMap::new();
    for (i, (button, direction)) in directions.into_iter().enumerate() {
        map_insert!(cluster, Key::Char(buttons[i]), Action::hold(button));
        map_insert!(
            cluster,
            Key::Char(tilt[i]),
            Action::tilt(StickSide::Left, direction)
        );
    }
    cluster
}

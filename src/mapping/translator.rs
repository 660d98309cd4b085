//! Keyboard-Translator - wandelt Drück-/Loslass-Ereignisse in Controller-Effekte um
//!
//! # Zustandsautomat
//!
//! ```text
//!            press (gemappt oder nicht)
//!   Idle ─────────────────────────────► Held
//!    ▲                                   │ press (Wiederholung) → ignoriert
//!    └───────────────────────────────────┘
//!                   release
//! ```
//!
//! Neben dem Zustand je Taste hält der Translator die Sondermodi, das aktive
//! Preset des linken Blocks und einen Akkumulator pro Stick-Achse. Mit dem
//! Controller spricht er nie selbst: jedes Ereignis liefert höchstens einen
//! [`Effect`], den die Session ausführt.

use super::action::{Action, SpecialMode};
use super::key_mapping::{ClusterPreset, KeyMapping};
use crate::controller::{Axis, StickSide, STICK_CENTER, STICK_MAX, STICK_MIN};
use crate::input::{Key, KeyEvent, KeyEventKind};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Rohverschiebung pro Druck einer Stick-Taste
pub const DEFAULT_STICK_STEP: i32 = 1792;

#[derive(Debug, Clone, Copy)]
pub struct TranslatorSettings {
    pub center: i32,
    pub step: i32,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            center: STICK_CENTER,
            step: DEFAULT_STICK_STEP,
        }
    }
}

/// Auswirkung eines Tastenereignisses auf den Controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Hold(String),
    Release(String),
    /// Setzt eine Stick-Achse auf `value` und sendet den Zustand
    Stick {
        side: StickSide,
        axis: Axis,
        value: i32,
    },
    Mash,
    Toggled { mode: SpecialMode, enabled: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialModes {
    pub camera: bool,
    pub dpad: bool,
}

impl SpecialModes {
    fn flip(&mut self, mode: SpecialMode) -> bool {
        let flag = match mode {
            SpecialMode::Camera => &mut self.camera,
            SpecialMode::Dpad => &mut self.dpad,
        };
        *flag = !*flag;
        *flag
    }
}

// Aufsummierte Rohwerte, Index [Seite][Achse]
#[derive(Debug, Clone, Copy)]
struct StickAccumulators([[i32; 2]; 2]);

impl StickAccumulators {
    fn centered(center: i32) -> Self {
        Self([[center; 2]; 2])
    }

    fn slot(&mut self, side: StickSide, axis: Axis) -> &mut i32 {
        &mut self.0[side_index(side)][axis_index(axis)]
    }

    #[cfg(test)]
    fn get(&self, side: StickSide, axis: Axis) -> i32 {
        self.0[side_index(side)][axis_index(axis)]
    }
}

fn side_index(side: StickSide) -> usize {
    match side {
        StickSide::Left => 0,
        StickSide::Right => 1,
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

pub struct KeyboardTranslator {
    mapping: KeyMapping,
    /// Gehaltene Tasten mit der beim Drücken angewendeten Aktion
    held: HashMap<Key, Option<Action>>,
    sticks: StickAccumulators,
    modes: SpecialModes,
    settings: TranslatorSettings,
}

impl KeyboardTranslator {
    pub fn new(mapping: KeyMapping, settings: TranslatorSettings) -> Self {
        info!(
            "Creating keyboard translator (center {}, step {})",
            settings.center, settings.step
        );
        Self {
            mapping,
            held: HashMap::new(),
            sticks: StickAccumulators::centered(settings.center),
            modes: SpecialModes::default(),
            settings,
        }
    }

    pub fn handle(&mut self, event: &KeyEvent) -> Option<Effect> {
        match &event.kind {
            KeyEventKind::Press => self.press(&event.key),
            KeyEventKind::Release => self.release(&event.key),
            KeyEventKind::Other(_) => {
                warn!("Received unexpected event {}", event);
                None
            }
        }
    }

    #[cfg(test)]
    pub fn is_held(&self, key: &Key) -> bool {
        self.held.contains_key(key)
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    pub fn modes(&self) -> SpecialModes {
        self.modes
    }

    #[cfg(test)]
    pub fn mapping(&self) -> &KeyMapping {
        &self.mapping
    }

    /// Aufsummierter (nicht begrenzter) Wert einer Stick-Achse
    #[cfg(test)]
    pub fn axis_value(&self, side: StickSide, axis: Axis) -> i32 {
        self.sticks.get(side, axis)
    }

    fn press(&mut self, key: &Key) -> Option<Effect> {
        if self.held.contains_key(key) {
            debug!("Ignoring repeated press of {}", key);
            return None;
        }

        let action = self.mapping.action_for(key).cloned();
        let Some(action) = action else {
            debug!("No mapping for {}", key);
            self.held.insert(key.clone(), None);
            return None;
        };

        let (applied, effect) = match action {
            Action::Hold(ref button) => (Some(action.clone()), Some(Effect::Hold(button.clone()))),
            Action::StickAdjust { side, axis, sign } => {
                if self.camera_locks(side) {
                    debug!("Camera mode locks the right stick, ignoring {}", key);
                    (None, None)
                } else {
                    let value = self.adjust(side, axis, sign);
                    (Some(action), Some(Effect::Stick { side, axis, value }))
                }
            }
            Action::Mash => (Some(action), Some(Effect::Mash)),
            Action::ToggleSpecial(mode) => {
                let enabled = self.toggle(mode);
                (Some(action), Some(Effect::Toggled { mode, enabled }))
            }
        };

        self.held.insert(key.clone(), applied);
        effect
    }

    fn release(&mut self, key: &Key) -> Option<Effect> {
        let Some(applied) = self.held.remove(key) else {
            warn!("Release of {} which is not held", key);
            return None;
        };

        match applied? {
            Action::Hold(button) => Some(Effect::Release(button)),
            Action::StickAdjust { side, axis, sign } => {
                let value = self.adjust(side, axis, -sign);
                if self.camera_locks(side) {
                    debug!("Camera mode pins the right stick, not moving it");
                    None
                } else {
                    Some(Effect::Stick { side, axis, value })
                }
            }
            Action::Mash | Action::ToggleSpecial(_) => None,
        }
    }

    fn camera_locks(&self, side: StickSide) -> bool {
        self.modes.camera && side == StickSide::Right
    }

    /// Verschiebt den Akkumulator und liefert den auf den Stick-Bereich begrenzten Wert
    fn adjust(&mut self, side: StickSide, axis: Axis, sign: i32) -> i32 {
        let slot = self.sticks.slot(side, axis);
        *slot += sign * self.settings.step;
        let value = *slot;
        if !(STICK_MIN..=STICK_MAX).contains(&value) {
            debug!("{} stick {} accumulated to {}, clamping", side, axis, value);
        }
        value.clamp(STICK_MIN, STICK_MAX)
    }

    fn toggle(&mut self, mode: SpecialMode) -> bool {
        let enabled = self.modes.flip(mode);
        if mode == SpecialMode::Dpad {
            self.mapping.select_preset(if enabled {
                ClusterPreset::Dpad
            } else {
                ClusterPreset::Standard
            });
        }
        info!("{} mode {}", mode, if enabled { "on" } else { "off" });
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> KeyboardTranslator {
        KeyboardTranslator::new(KeyMapping::default_layout(), TranslatorSettings::default())
    }

    fn press(t: &mut KeyboardTranslator, c: char) -> Option<Effect> {
        t.handle(&KeyEvent::press(Key::Char(c)))
    }

    fn release(t: &mut KeyboardTranslator, c: char) -> Option<Effect> {
        t.handle(&KeyEvent::release(Key::Char(c)))
    }

    #[test]
    fn plain_keys_hold_and_release_buttons() {
        let mut t = translator();
        assert_eq!(press(&mut t, 'l'), Some(Effect::Hold("a".into())));
        assert!(t.is_held(&Key::Char('l')));
        assert_eq!(release(&mut t, 'l'), Some(Effect::Release("a".into())));
        assert!(!t.is_held(&Key::Char('l')));
    }

    #[test]
    fn repeated_press_is_debounced() {
        let mut t = translator();
        assert!(press(&mut t, 'k').is_some());
        assert_eq!(t.held_count(), 1);

        assert_eq!(press(&mut t, 'k'), None);
        assert_eq!(press(&mut t, 'k'), None);
        assert_eq!(t.held_count(), 1);
    }

    #[test]
    fn unmapped_keys_are_tracked_but_do_nothing() {
        let mut t = translator();
        assert_eq!(press(&mut t, 'z'), None);
        assert!(t.is_held(&Key::Char('z')));
        assert_eq!(release(&mut t, 'z'), None);
        assert_eq!(t.held_count(), 0);
    }

    #[test]
    fn stick_keys_net_to_zero() {
        let mut t = translator();
        for (key, side, axis) in [
            ('s', StickSide::Left, Axis::Horizontal),
            ('d', StickSide::Left, Axis::Vertical),
            ('e', StickSide::Left, Axis::Vertical),
            ('f', StickSide::Left, Axis::Horizontal),
            ('J', StickSide::Right, Axis::Horizontal),
            ('K', StickSide::Right, Axis::Vertical),
            ('I', StickSide::Right, Axis::Vertical),
            ('L', StickSide::Right, Axis::Horizontal),
        ] {
            let before = t.axis_value(side, axis);
            assert!(press(&mut t, key).is_some());
            assert_ne!(t.axis_value(side, axis), before);
            assert!(release(&mut t, key).is_some());
            assert_eq!(t.axis_value(side, axis), before, "key {key}");
        }
    }

    #[test]
    fn stick_press_moves_by_step_in_key_direction() {
        let mut t = translator();
        assert_eq!(
            press(&mut t, 'e'),
            Some(Effect::Stick {
                side: StickSide::Left,
                axis: Axis::Vertical,
                value: 2048 + 1792
            })
        );
        assert_eq!(
            press(&mut t, 's'),
            Some(Effect::Stick {
                side: StickSide::Left,
                axis: Axis::Horizontal,
                value: 2048 - 1792
            })
        );
    }

    #[test]
    fn applied_value_is_clamped_while_accumulator_is_not() {
        let mut t = KeyboardTranslator::new(
            KeyMapping::default_layout(),
            TranslatorSettings {
                center: 2048,
                step: 3000,
            },
        );
        let effect = press(&mut t, 'f');
        assert_eq!(
            effect,
            Some(Effect::Stick {
                side: StickSide::Left,
                axis: Axis::Horizontal,
                value: 4095
            })
        );
        assert_eq!(t.axis_value(StickSide::Left, Axis::Horizontal), 5048);
        release(&mut t, 'f');
        assert_eq!(t.axis_value(StickSide::Left, Axis::Horizontal), 2048);
    }

    #[test]
    fn toggling_twice_restores_modes_and_mapping() {
        let mut t = translator();
        let before = t.mapping().action_for(&Key::Char('s')).cloned();

        for _ in 0..2 {
            assert!(press(&mut t, 'x').is_some());
            assert_eq!(release(&mut t, 'x'), None);
        }
        assert!(press(&mut t, '6').is_some());
        release(&mut t, '6');
        assert!(press(&mut t, '6').is_some());
        release(&mut t, '6');

        assert_eq!(t.modes(), SpecialModes::default());
        assert_eq!(t.mapping().active_preset(), ClusterPreset::Standard);
        assert_eq!(t.mapping().action_for(&Key::Char('s')).cloned(), before);
    }

    #[test]
    fn dpad_toggle_reports_and_swaps_cluster() {
        let mut t = translator();
        assert_eq!(
            press(&mut t, 'x'),
            Some(Effect::Toggled {
                mode: SpecialMode::Dpad,
                enabled: true
            })
        );
        release(&mut t, 'x');
        assert_eq!(press(&mut t, 'd'), Some(Effect::Hold("down".into())));
    }

    #[test]
    fn camera_mode_locks_right_stick_keys() {
        let mut t = translator();
        press(&mut t, '6');
        release(&mut t, '6');
        assert!(t.modes().camera);

        assert_eq!(press(&mut t, 'I'), None);
        assert_eq!(release(&mut t, 'I'), None);
        assert_eq!(t.axis_value(StickSide::Right, Axis::Vertical), 2048);

        // linker Stick bleibt unverändert
        assert!(press(&mut t, 'e').is_some());
    }

    #[test]
    fn release_after_dpad_toggle_undoes_the_pressed_action() {
        let mut t = translator();
        assert!(matches!(press(&mut t, 's'), Some(Effect::Stick { .. })));
        press(&mut t, 'x');
        release(&mut t, 'x');

        let effect = release(&mut t, 's');

        assert_eq!(
            effect,
            Some(Effect::Stick {
                side: StickSide::Left,
                axis: Axis::Horizontal,
                value: 2048
            })
        );
    }

    #[test]
    fn mash_fires_on_press_only() {
        let mut t = translator();
        assert_eq!(press(&mut t, 'p'), Some(Effect::Mash));
        assert_eq!(release(&mut t, 'p'), None);
    }

    #[test]
    fn release_of_unheld_key_is_ignored() {
        let mut t = translator();
        assert_eq!(release(&mut t, 'l'), None);
        assert_eq!(t.held_count(), 0);
    }

    #[test]
    fn unexpected_events_are_ignored() {
        let mut t = translator();
        let mut event = KeyEvent::press(Key::Char('l'));
        event.kind = KeyEventKind::Other("focus lost".into());
        assert_eq!(t.handle(&event), None);
        assert_eq!(t.held_count(), 0);
    }
}

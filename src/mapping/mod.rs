//! Tastatur-Mapping: wandelt Tastenereignisse in Controller-Effekte um.
//!
//! Der Translator ist ein reiner Zustandsautomat; die Tastaturtabelle besteht aus
//! einem Basisteil und zwei Presets für den linken Block, zwischen denen der
//! Dpad-Schalter wechselt.

pub mod action;
pub mod key_mapping;
pub mod translator;

pub use action::{Action, Direction, SpecialMode};
pub use key_mapping::{ClusterPreset, KeyMapping};
pub use translator::{Effect, KeyboardTranslator, SpecialModes, TranslatorSettings};

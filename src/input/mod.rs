//! Keyboard input for live mode
//!
//! 1. [`key_source`] - Blocking key capture (terminal via crossterm)
//! 2. [`feeder`] - Bridges the blocking source onto a channel
//! 3. [`key_event`] - Key identifiers and press/release events
//! 4. [`line_reader`] - Console lines read off the async runtime

pub mod feeder;
pub mod key_event;
pub mod key_source;
pub mod line_reader;

pub use feeder::FeederHandle;
pub use key_event::{Key, KeyEvent, KeyEventKind};
pub use key_source::{InputError, KeySource, RawModeWriter, TerminalKeySource};
pub use line_reader::LineReader;

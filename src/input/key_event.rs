use chrono::{DateTime, Local};
use std::fmt;

/// Key identifier as delivered by a key source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Esc,
    Other(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "'{}'", c),
            Key::Enter => write!(f, "enter"),
            Key::Backspace => write!(f, "backspace"),
            Key::Tab => write!(f, "tab"),
            Key::Esc => write!(f, "esc"),
            Key::Other(name) => write!(f, "{}", name),
        }
    }
}

// Event kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
    /// Anything the source could not classify, kept for diagnostics
    Other(String),
}

// Raw key event with the time it was captured
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
    pub timestamp: DateTime<Local>,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            kind: KeyEventKind::Press,
            key,
            timestamp: Local::now(),
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            kind: KeyEventKind::Release,
            key,
            timestamp: Local::now(),
        }
    }

    /// Press of the key that ends a live session
    pub fn is_termination(&self) -> bool {
        self.kind == KeyEventKind::Press && self.key == Key::Esc
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            KeyEventKind::Press => "press",
            KeyEventKind::Release => "release",
            KeyEventKind::Other(description) => description.as_str(),
        };
        write!(
            f,
            "{} {} at {}",
            kind,
            self.key,
            self.timestamp.format("%H:%M:%S.%3f")
        )
    }
}

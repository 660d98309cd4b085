//! Key sources: blocking producers of press/release events
//!
//! [`TerminalKeySource`] reads the terminal through crossterm. Release events
//! are only reported by terminals that implement the keyboard enhancement
//! protocol; everywhere else every key looks permanently held after its first
//! press.

use super::key_event::{Key, KeyEvent, KeyEventKind};
use chrono::Local;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind as TermKeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("Key event channel closed")]
    ChannelClosed,
}

/// Blocking sequence of key events
pub trait KeySource: Send + 'static {
    fn open(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    /// Blocks until the next key event; `None` ends the stream
    fn next_event(&mut self) -> Result<Option<KeyEvent>, InputError>;

    fn close(&mut self) -> Result<(), InputError> {
        Ok(())
    }
}

/// How often a waiting terminal source checks for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct TerminalKeySource {
    enhanced: bool,
    raw: bool,
    cancel: CancellationToken,
}

impl TerminalKeySource {
    /// Source that ends its stream once `cancel` is triggered
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..Self::default()
        }
    }
}

impl KeySource for TerminalKeySource {
    fn open(&mut self) -> Result<(), InputError> {
        enable_raw_mode()?;
        self.raw = true;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced = true;
            info!("Terminal reports key releases");
        } else {
            warn!("Terminal cannot report key releases; keys will stay held after the first press");
        }
        Ok(())
    }

    fn next_event(&mut self) -> Result<Option<KeyEvent>, InputError> {
        loop {
            if !event::poll(POLL_INTERVAL)? {
                if self.cancel.is_cancelled() {
                    info!("Key capture cancelled");
                    return Ok(None);
                }
                continue;
            }
            let Event::Key(key_event) = event::read()? else {
                continue;
            };

            if key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL)
            {
                info!("Ctrl-C received, ending key stream");
                return Ok(None);
            }

            let kind = match key_event.kind {
                // OS auto-repeat arrives as presses and is debounced downstream
                TermKeyEventKind::Press | TermKeyEventKind::Repeat => KeyEventKind::Press,
                TermKeyEventKind::Release => KeyEventKind::Release,
            };
            let event = KeyEvent {
                kind,
                key: map_key_code(key_event.code),
                timestamp: Local::now(),
            };
            debug!("Captured {}", event);
            return Ok(Some(event));
        }
    }

    fn close(&mut self) -> Result<(), InputError> {
        if self.enhanced {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            self.enhanced = false;
        }
        if self.raw {
            disable_raw_mode()?;
            self.raw = false;
        }
        info!("Terminal restored");
        Ok(())
    }
}

fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        other => Key::Other(format!("{:?}", other)),
    }
}

/// Writer for raw-mode terminals: turns `\n` into `\r\n`
pub struct RawModeWriter<W: Write> {
    inner: W,
}

impl<W: Write> RawModeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for RawModeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for line in buf.split_inclusive(|b| *b == b'\n') {
            match line.strip_suffix(b"\n") {
                Some(text) => {
                    self.inner.write_all(text)?;
                    self.inner.write_all(b"\r\n")?;
                }
                None => self.inner.write_all(line)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

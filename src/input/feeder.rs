//! Key feeder - bridges a blocking [`KeySource`] into the async session
//!
//! ```text
//! KeySource ─(blocking)─► KeyFeeder ─[KeyEvent]→ Session
//!                         spawn_blocking   mpsc::channel(n)
//! ```
//!
//! The feeder is the only producer and the session the only consumer, so events
//! arrive in capture order.

use super::key_event::KeyEvent;
use super::key_source::{InputError, KeySource};
use statum::{machine, state};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[state]
#[derive(Debug, Clone)]
pub enum FeederState {
    Initializing,
    Feeding,
}

#[machine]
pub struct KeyFeeder<S: FeederState> {
    source: Box<dyn KeySource>,
    event_sender: mpsc::Sender<KeyEvent>,
    forwarded: u64,
}

impl KeyFeeder<Initializing> {
    pub fn create(source: Box<dyn KeySource>, event_sender: mpsc::Sender<KeyEvent>) -> Self {
        debug!("Creating key feeder");
        Self::new(source, event_sender, 0)
    }

    /// Opens the key source and transitions to Feeding
    pub fn initialize(mut self) -> Result<KeyFeeder<Feeding>, InputError> {
        info!("Opening key source");
        self.source.open()?;
        Ok(self.transition())
    }
}

impl KeyFeeder<Feeding> {
    /// Forwards one event; returns false once feeding should stop
    pub fn forward_next_event(&mut self) -> Result<bool, InputError> {
        let Some(event) = self.source.next_event()? else {
            info!("Key source ended");
            return Ok(false);
        };

        let terminate = event.is_termination();
        self.event_sender
            .blocking_send(event)
            .map_err(|_| InputError::ChannelClosed)?;
        self.forwarded += 1;

        if terminate {
            info!("Termination key forwarded, stopping feeder");
        }
        Ok(!terminate)
    }

    /// Runs until the source ends, the termination key was forwarded or the
    /// receiver is gone; the source is closed on every path
    pub fn run_feed_loop(mut self) -> Result<u64, InputError> {
        info!("Starting key feed loop");
        let result = loop {
            match self.forward_next_event() {
                Ok(true) => continue,
                Ok(false) => break Ok(self.forwarded),
                Err(InputError::ChannelClosed) => {
                    debug!("Session stopped listening");
                    break Ok(self.forwarded);
                }
                Err(e) => break Err(e),
            }
        };
        self.source.close()?;
        result
    }
}

// Handle of the running feeder task
pub struct FeederHandle {
    task: JoinHandle<()>,
}

impl FeederHandle {
    /// Spawns the feeder on a blocking task and returns the event receiver
    pub fn spawn(
        source: Box<dyn KeySource>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<KeyEvent>) {
        let (event_sender, event_receiver) = mpsc::channel(capacity);
        debug!("Created key event channel with capacity {}", capacity);

        let feeder = KeyFeeder::create(source, event_sender);
        let task = tokio::task::spawn_blocking(move || match feeder.initialize() {
            Ok(feeding) => match feeding.run_feed_loop() {
                Ok(count) => info!("Key feeder finished after {} events", count),
                Err(e) => error!("Key feeder terminated with error: {}", e),
            },
            Err(e) => error!("Failed to open key source: {}", e),
        });

        (Self { task }, event_receiver)
    }

    /// Waits for the feeder task to finish
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Key feeder task panicked: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyEventKind};
    use std::collections::VecDeque;

    struct ScriptedSource {
        events: VecDeque<KeyEvent>,
    }

    impl ScriptedSource {
        fn new(events: Vec<KeyEvent>) -> Box<Self> {
            Box::new(Self {
                events: events.into(),
            })
        }
    }

    impl KeySource for ScriptedSource {
        fn next_event(&mut self) -> Result<Option<KeyEvent>, InputError> {
            Ok(self.events.pop_front())
        }
    }

    #[tokio::test]
    async fn events_arrive_in_capture_order() {
        let source = ScriptedSource::new(vec![
            KeyEvent::press(Key::Char('l')),
            KeyEvent::press(Key::Char('j')),
            KeyEvent::release(Key::Char('l')),
            KeyEvent::release(Key::Char('j')),
        ]);

        let (handle, mut rx) = FeederHandle::spawn(source, 2);
        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push((event.kind, event.key));
        }
        handle.join().await;

        assert_eq!(
            seen,
            vec![
                (KeyEventKind::Press, Key::Char('l')),
                (KeyEventKind::Press, Key::Char('j')),
                (KeyEventKind::Release, Key::Char('l')),
                (KeyEventKind::Release, Key::Char('j')),
            ]
        );
    }

    #[tokio::test]
    async fn feeding_stops_after_escape() {
        let source = ScriptedSource::new(vec![
            KeyEvent::press(Key::Char('l')),
            KeyEvent::press(Key::Esc),
            KeyEvent::press(Key::Char('k')),
        ]);

        let (handle, mut rx) = FeederHandle::spawn(source, 8);
        let mut keys = Vec::new();
        while let Some(event) = rx.recv().await {
            keys.push(event.key);
        }
        handle.join().await;

        assert_eq!(keys, vec![Key::Char('l'), Key::Esc]);
    }
}

//! Console line reader on a dedicated thread
//!
//! Reading stdin blocks and cannot be cancelled. The reader therefore runs on
//! a plain thread that is never joined, so shutting down the runtime does not
//! wait for the next line.
//!
//! ```text
//! stdin ─(std::thread)─► LineReader ─[String]→ Session
//!                                   mpsc::channel(n)
//! ```

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub struct LineReader;

impl LineReader {
    /// Starts reading `input` line by line; the receiver closes at end of input
    pub fn spawn<R>(input: R, capacity: usize) -> std::io::Result<mpsc::Receiver<String>>
    where
        R: BufRead + Send + 'static,
    {
        let (line_sender, line_receiver) = mpsc::channel(capacity);
        debug!("Created console line channel with capacity {}", capacity);

        thread::Builder::new()
            .name("console-reader".to_string())
            .spawn(move || {
                for line in input.lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            error!("Failed to read console input: {}", e);
                            return;
                        }
                    };
                    if line_sender.blocking_send(line).is_err() {
                        debug!("Session stopped listening for lines");
                        return;
                    }
                }
                info!("Console input reached end of file");
            })?;

        Ok(line_receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn lines_arrive_in_order_then_channel_closes() {
        let input = Cursor::new("hold a\n\nrelease a && help\n");
        let mut lines = LineReader::spawn(input, 1).unwrap();

        let mut seen = Vec::new();
        while let Some(line) = lines.recv().await {
            seen.push(line);
        }

        assert_eq!(seen, vec!["hold a", "", "release a && help"]);
    }
}

//! Text console collaborators
//!
//! Stand-ins for the microphone and speaker on machines without audio: each
//! capture reads one line from stdin under the same timeout, each phrase is
//! printed to stdout. End of input ends the session.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::voice::{CaptureWindow, Listener, Speaker};

/// Reads utterances from stdin
pub struct ConsoleListener {
    lines: Lines<BufReader<Stdin>>,
    closed: bool,
}

impl ConsoleListener {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            closed: false,
        }
    }
}

impl Default for ConsoleListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Listener for ConsoleListener {
    async fn capture(&mut self, window: CaptureWindow) -> String {
        // The typed line is the whole phrase, so only the wait is bounded
        match tokio::time::timeout(window.timeout, self.lines.next_line()).await {
            Ok(Ok(Some(line))) => line.trim().to_lowercase(),
            Ok(Ok(None)) => {
                if !self.closed {
                    tracing::info!("stdin closed, ending session");
                }
                self.closed = true;
                String::new()
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read stdin");
                String::new()
            }
            Err(_) => String::new(),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Prints phrases to stdout
#[derive(Debug, Default)]
pub struct ConsoleSpeaker;

#[async_trait(?Send)]
impl Speaker for ConsoleSpeaker {
    async fn speak(&mut self, text: &str) {
        tracing::debug!(text, "speaking");
        println!("[sexta] {text}");
    }
}

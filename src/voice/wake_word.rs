//! Wake phrase detection
//!
//! Matches transcripts against a fixed set of equivalent spellings. Matching
//! is a plain substring test after case and accent folding.

use crate::text::fold;
use crate::{Error, Result};

/// Spellings accepted out of the box
pub const DEFAULT_WAKE_PHRASES: [&str; 4] = [
    "ok sexta-feira",
    "ok sexta feira",
    "sexta-feira",
    "sexta feira",
];

/// Detects wake phrases in transcripts
#[derive(Debug, Clone)]
pub struct WakeWordDetector {
    wake_words: Vec<String>,
}

impl WakeWordDetector {
    /// Create a new wake word detector
    ///
    /// # Arguments
    ///
    /// * `wake_words` - Equivalent spellings of the wake phrase
    ///
    /// # Errors
    ///
    /// Returns error if no usable phrase is given
    pub fn new(wake_words: Vec<String>) -> Result<Self> {
        let normalized: Vec<String> = wake_words
            .into_iter()
            .map(|w| fold(w.trim()))
            .filter(|w| !w.is_empty())
            .collect();

        if normalized.is_empty() {
            return Err(Error::Config("at least one wake phrase is required".to_string()));
        }

        tracing::debug!(wake_words = ?normalized, "wake word detector initialized");

        Ok(Self {
            wake_words: normalized,
        })
    }

    /// Check if transcribed text contains a wake phrase
    #[must_use]
    pub fn check_wake_word(&self, transcript: &str) -> bool {
        let normalized = fold(transcript);

        let found = self
            .wake_words
            .iter()
            .find(|wake_word| normalized.contains(wake_word.as_str()));

        if let Some(wake_word) = found {
            tracing::info!(wake_word, transcript, "wake word detected");
            true
        } else {
            false
        }
    }

    /// Get the configured wake phrases
    #[must_use]
    pub fn wake_words(&self) -> &[String] {
        &self.wake_words
    }
}

impl Default for WakeWordDetector {
    fn default() -> Self {
        Self {
            wake_words: DEFAULT_WAKE_PHRASES.iter().map(ToString::to_string).collect(),
        }
    }
}

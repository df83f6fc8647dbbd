//! Voice input and output
//!
//! The assistant only sees two collaborators: a [`Listener`] that turns
//! one bounded capture into lower-cased text, and a [`Speaker`] that blocks
//! until a phrase has been said. Microphone capture, cloud STT/TTS and
//! playback live behind them.

mod capture;
mod microphone;
mod playback;
mod speaker;
mod stt;
mod tts;
mod wake_word;

use std::time::Duration;

use async_trait::async_trait;

pub use capture::{AudioCapture, SAMPLE_RATE, SegmentState, SpeechSegmenter, samples_to_wav};
pub use microphone::Microphone;
pub use playback::AudioPlayback;
pub use speaker::CloudSpeaker;
pub use stt::{SpeechToText, SttProvider};
pub use tts::{TextToSpeech, TtsProvider};
pub use wake_word::{DEFAULT_WAKE_PHRASES, WakeWordDetector};

/// Bounds for a single capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureWindow {
    /// How long to wait for speech to start
    pub timeout: Duration,
    /// Longest phrase accepted once speech has started
    pub phrase_limit: Duration,
}

impl CaptureWindow {
    #[must_use]
    pub const fn from_secs(timeout: u64, phrase_limit: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout),
            phrase_limit: Duration::from_secs(phrase_limit),
        }
    }
}

/// Captures one utterance
///
/// Never fails: a timeout, unintelligible audio or a transcription error all
/// come back as an empty string.
#[async_trait(?Send)]
pub trait Listener {
    /// Capture and transcribe one utterance, lower-cased
    async fn capture(&mut self, window: CaptureWindow) -> String;

    /// True once the input source has ended for good
    fn is_closed(&self) -> bool {
        false
    }
}

/// Says one phrase, returning once it has been spoken
#[async_trait(?Send)]
pub trait Speaker {
    async fn speak(&mut self, text: &str);
}

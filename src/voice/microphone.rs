//! Microphone listener: capture, segment, transcribe

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::capture::{AudioCapture, SAMPLE_RATE, SegmentState, SpeechSegmenter, samples_to_wav};
use super::stt::SpeechToText;
use super::{CaptureWindow, Listener};
use crate::Result;

/// How often captured samples are drained into the segmenter
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Listens on the default input device and transcribes through the cloud
pub struct Microphone {
    capture: AudioCapture,
    stt: SpeechToText,
}

impl Microphone {
    /// Open the default input device
    ///
    /// # Errors
    ///
    /// Returns error if no usable input device exists
    pub fn new(stt: SpeechToText) -> Result<Self> {
        Ok(Self {
            capture: AudioCapture::new()?,
            stt,
        })
    }

    /// Record one utterance, `None` if nobody spoke before the timeout
    async fn record(&mut self, window: CaptureWindow) -> Result<Option<Vec<f32>>> {
        self.capture.clear_buffer();
        self.capture.start()?;

        let mut segmenter = SpeechSegmenter::new();
        let opened = Instant::now();
        let mut speech_started: Option<Instant> = None;

        let outcome = loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let complete = segmenter.process(&self.capture.take_buffer());
            if complete {
                break Some(segmenter.take_speech_buffer());
            }

            match (segmenter.state(), speech_started) {
                (SegmentState::Speaking, None) => speech_started = Some(Instant::now()),
                (SegmentState::Idle, Some(_)) => speech_started = None,
                _ => {}
            }

            match speech_started {
                Some(since) if since.elapsed() >= window.phrase_limit => {
                    tracing::debug!("phrase limit reached");
                    break Some(segmenter.take_speech_buffer());
                }
                None if opened.elapsed() >= window.timeout => {
                    tracing::debug!(timeout = ?window.timeout, "no speech before timeout");
                    break None;
                }
                _ => {}
            }
        };

        self.capture.stop();
        Ok(outcome)
    }

    async fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let wav = samples_to_wav(samples, SAMPLE_RATE)?;
        self.stt.transcribe(&wav).await
    }
}

#[async_trait(?Send)]
impl Listener for Microphone {
    async fn capture(&mut self, window: CaptureWindow) -> String {
        let samples = match self.record(window).await {
            Ok(Some(samples)) => samples,
            Ok(None) => return String::new(),
            Err(e) => {
                tracing::warn!(error = %e, "audio capture failed");
                self.capture.stop();
                return String::new();
            }
        };

        match self.transcribe(&samples).await {
            Ok(text) => text.trim().to_lowercase(),
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                String::new()
            }
        }
    }
}

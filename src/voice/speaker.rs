//! Cloud speaker: synthesize, then play

use async_trait::async_trait;

use super::playback::AudioPlayback;
use super::tts::TextToSpeech;
use super::Speaker;
use crate::Result;

/// Speaks through a TTS provider and the default output device
pub struct CloudSpeaker {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl CloudSpeaker {
    #[must_use]
    pub const fn new(tts: TextToSpeech, playback: AudioPlayback) -> Self {
        Self { tts, playback }
    }

    async fn say(&self, text: &str) -> Result<()> {
        let audio = self.tts.synthesize(text).await?;
        self.playback.play_mp3(&audio)
    }
}

#[async_trait(?Send)]
impl Speaker for CloudSpeaker {
    async fn speak(&mut self, text: &str) {
        tracing::info!(text, "speaking");
        if let Err(e) = self.say(text).await {
            // Still get the message across
            tracing::warn!(error = %e, "speech synthesis failed");
            println!("[sexta] {text}");
        }
    }
}

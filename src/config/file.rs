//! TOML configuration file loading
//!
//! Supports `~/.config/sexta-feira/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SextaConfigFile {
    /// Speech-to-text and text-to-speech
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Capture windows per prompt context
    #[serde(default)]
    pub listen: ListenFileConfig,

    /// Dispatcher behaviour
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// Agenda storage
    #[serde(default)]
    pub agenda: AgendaFileConfig,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// "whisper" or "deepgram"
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// "openai" or "elevenlabs"
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "nova")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,

    /// Transcription language (e.g. "pt-BR")
    pub language: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub deepgram: Option<String>,
    pub elevenlabs: Option<String>,
}

/// One capture window, in seconds
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct WindowFileConfig {
    pub timeout_secs: Option<u64>,
    pub phrase_limit_secs: Option<u64>,
}

/// Capture windows per prompt context
#[derive(Debug, Default, Deserialize)]
pub struct ListenFileConfig {
    pub wake: Option<WindowFileConfig>,
    pub command: Option<WindowFileConfig>,
    pub event: Option<WindowFileConfig>,
    pub expression: Option<WindowFileConfig>,
    pub coefficient: Option<WindowFileConfig>,
}

/// Dispatcher configuration
#[derive(Debug, Default, Deserialize)]
pub struct AssistantFileConfig {
    /// Replaces the built-in wake phrase spellings
    pub wake_phrases: Option<Vec<String>>,

    /// Prompts per coefficient before giving up (unset = unlimited)
    pub max_coefficient_attempts: Option<u32>,
}

/// Agenda configuration
#[derive(Debug, Default, Deserialize)]
pub struct AgendaFileConfig {
    /// Path to the agenda text file
    pub path: Option<String>,
}

/// Parse a configuration document
///
/// # Errors
///
/// Returns error if the document is not valid TOML for this schema
pub fn parse_config(content: &str) -> Result<SextaConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from the standard path
///
/// Returns `SextaConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> SextaConfigFile {
    let Some(path) = config_file_path() else {
        return SextaConfigFile::default();
    };

    if !path.exists() {
        return SextaConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                SextaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            SextaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/sexta-feira/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("sexta-feira").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let config = parse_config("").unwrap();
        assert!(config.voice.stt_model.is_none());
        assert!(config.assistant.wake_phrases.is_none());
    }

    #[test]
    fn test_partial_document() {
        let config = parse_config(
            r#"
[voice]
stt_provider = "deepgram"
tts_speed = 1.25

[listen.wake]
timeout_secs = 3

[assistant]
wake_phrases = ["sexta-feira"]
max_coefficient_attempts = 4
"#,
        )
        .unwrap();

        assert_eq!(config.voice.stt_provider.as_deref(), Some("deepgram"));
        assert_eq!(config.voice.tts_speed, Some(1.25));
        let wake = config.listen.wake.unwrap();
        assert_eq!(wake.timeout_secs, Some(3));
        assert_eq!(wake.phrase_limit_secs, None);
        assert_eq!(config.assistant.max_coefficient_attempts, Some(4));
    }

    #[test]
    fn test_invalid_document() {
        assert!(parse_config("[voice]\ntts_speed = \"fast\"").is_err());
    }
}

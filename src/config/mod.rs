//! Configuration management for the assistant
//!
//! Every setting resolves as env > TOML file > default.

pub mod file;

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::voice::{
    CaptureWindow, DEFAULT_WAKE_PHRASES, SpeechToText, SttProvider, TextToSpeech, TtsProvider,
};
use crate::{Error, Result};
use file::{SextaConfigFile, WindowFileConfig};

/// Assistant configuration
#[derive(Debug)]
pub struct Config {
    /// Path to data directory (agenda, by default)
    pub data_dir: PathBuf,

    /// Agenda text file
    pub agenda_path: PathBuf,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Dispatcher configuration
    pub assistant: AssistantConfig,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Transcription backend
    pub stt_provider: SttProvider,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// Synthesis backend
    pub tts_provider: TtsProvider,

    /// TTS model (e.g. "tts-1", "eleven_multilingual_v2")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Transcription language
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_provider: SttProvider::Whisper,
            stt_model: "whisper-1".to_string(),
            tts_provider: TtsProvider::OpenAI,
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            tts_speed: 1.0,
            language: "pt-BR".to_string(),
        }
    }
}

/// API keys for external services
#[derive(Debug, Default)]
pub struct ApiKeys {
    pub openai: Option<SecretString>,
    pub deepgram: Option<SecretString>,
    pub elevenlabs: Option<SecretString>,
}

impl ApiKeys {
    fn for_stt(&self, provider: SttProvider) -> Option<&SecretString> {
        match provider {
            SttProvider::Whisper => self.openai.as_ref(),
            SttProvider::Deepgram => self.deepgram.as_ref(),
        }
    }

    fn for_tts(&self, provider: TtsProvider) -> Option<&SecretString> {
        match provider {
            TtsProvider::OpenAI => self.openai.as_ref(),
            TtsProvider::ElevenLabs => self.elevenlabs.as_ref(),
        }
    }
}

/// Capture windows for each prompt context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenConfig {
    /// Waiting for the wake phrase
    pub wake: CaptureWindow,
    /// Waiting for a command after "Sim?"
    pub command: CaptureWindow,
    /// Waiting for the text of a new event
    pub event: CaptureWindow,
    /// Waiting for an arithmetic expression
    pub expression: CaptureWindow,
    /// Waiting for an equation coefficient
    pub coefficient: CaptureWindow,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            wake: CaptureWindow::from_secs(10, 4),
            command: CaptureWindow::from_secs(6, 7),
            event: CaptureWindow::from_secs(8, 10),
            expression: CaptureWindow::from_secs(6, 6),
            coefficient: CaptureWindow::from_secs(6, 5),
        }
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Equivalent spellings of the wake phrase
    pub wake_phrases: Vec<String>,

    /// Prompts per coefficient before giving up, `None` for unlimited
    pub max_coefficient_attempts: Option<u32>,

    /// Capture windows
    pub listen: ListenConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_phrases: DEFAULT_WAKE_PHRASES.iter().map(ToString::to_string).collect(),
            max_coefficient_attempts: None,
            listen: ListenConfig::default(),
        }
    }
}

/// Return the data directory, creating it if needed
///
/// Uses `~/.local/share/sexta-feira/` on Linux
#[must_use]
pub fn default_data_dir() -> PathBuf {
    let data_dir = directories::BaseDirs::new()
        .map_or_else(|| PathBuf::from("."), |d| d.data_dir().join("sexta-feira"));

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!(
            path = %data_dir.display(),
            error = %e,
            "failed to create data directory"
        );
    }

    data_dir
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a provider name or numeric setting is invalid
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        let data_dir = std::env::var("SEXTA_DATA_DIR")
            .map_or_else(|_| default_data_dir(), PathBuf::from);

        Self::resolve(fc, data_dir, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a provider name or numeric setting is invalid
    pub fn resolve(
        fc: SextaConfigFile,
        data_dir: PathBuf,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = VoiceConfig::default();

        // API keys (env > toml > None)
        let secret = |key: &str, fallback: Option<String>| {
            env(key)
                .or(fallback)
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from)
        };
        let api_keys = ApiKeys {
            openai: secret("OPENAI_API_KEY", fc.api_keys.openai),
            deepgram: secret("DEEPGRAM_API_KEY", fc.api_keys.deepgram),
            elevenlabs: secret("ELEVENLABS_API_KEY", fc.api_keys.elevenlabs),
        };

        // Voice config (env > toml > default)
        let stt_provider = env("SEXTA_STT_PROVIDER")
            .or(fc.voice.stt_provider)
            .map(|name| SttProvider::from_name(&name))
            .transpose()?
            .unwrap_or(defaults.stt_provider);
        let tts_provider = env("SEXTA_TTS_PROVIDER")
            .or(fc.voice.tts_provider)
            .map(|name| TtsProvider::from_name(&name))
            .transpose()?
            .unwrap_or(defaults.tts_provider);
        let tts_speed = match env("SEXTA_TTS_SPEED") {
            Some(raw) => parse_setting::<f64>("SEXTA_TTS_SPEED", &raw)?,
            None => fc.voice.tts_speed.unwrap_or(defaults.tts_speed),
        };
        if !(0.25..=4.0).contains(&tts_speed) {
            return Err(Error::Config(format!(
                "tts speed must be between 0.25 and 4.0, got {tts_speed}"
            )));
        }

        let voice = VoiceConfig {
            stt_provider,
            stt_model: env("SEXTA_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| default_stt_model(stt_provider).to_string()),
            tts_provider,
            tts_model: env("SEXTA_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| default_tts_model(tts_provider).to_string()),
            tts_voice: env("SEXTA_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or(defaults.tts_voice),
            tts_speed,
            language: env("SEXTA_LANGUAGE")
                .or(fc.voice.language)
                .unwrap_or(defaults.language),
        };

        // Agenda lives in the data dir unless overridden
        let agenda_path = env("SEXTA_AGENDA_PATH")
            .or(fc.agenda.path)
            .map_or_else(|| data_dir.join("agenda.txt"), PathBuf::from);

        // Dispatcher config (env > toml > default)
        let base = AssistantConfig::default();
        let wake_phrases = env("SEXTA_WAKE_PHRASES")
            .map(|raw| raw.split(',').map(|p| p.trim().to_string()).collect())
            .or(fc.assistant.wake_phrases)
            .unwrap_or(base.wake_phrases);
        if wake_phrases.iter().all(|p: &String| p.trim().is_empty()) {
            return Err(Error::Config("at least one wake phrase is required".to_string()));
        }

        let max_coefficient_attempts = match env("SEXTA_MAX_COEFFICIENT_ATTEMPTS") {
            Some(raw) => Some(parse_setting::<u32>("SEXTA_MAX_COEFFICIENT_ATTEMPTS", &raw)?),
            None => fc.assistant.max_coefficient_attempts,
        }
        .filter(|&n| n > 0);

        let listen = ListenConfig {
            wake: merge_window(fc.listen.wake, base.listen.wake),
            command: merge_window(fc.listen.command, base.listen.command),
            event: merge_window(fc.listen.event, base.listen.event),
            expression: merge_window(fc.listen.expression, base.listen.expression),
            coefficient: merge_window(fc.listen.coefficient, base.listen.coefficient),
        };

        Ok(Self {
            data_dir,
            agenda_path,
            voice,
            api_keys,
            assistant: AssistantConfig {
                wake_phrases,
                max_coefficient_attempts,
                listen,
            },
        })
    }

    /// Build the configured transcription client
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn speech_to_text(&self) -> Result<SpeechToText> {
        let provider = self.voice.stt_provider;
        let key = self.api_keys.for_stt(provider).ok_or_else(|| {
            Error::Config(format!("{provider:?} API key required for STT"))
        })?;

        SpeechToText::new(
            provider,
            SecretString::from(key.expose_secret().to_owned()),
            self.voice.stt_model.clone(),
            self.voice.language.clone(),
        )
    }

    /// Build the configured synthesis client
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn text_to_speech(&self) -> Result<TextToSpeech> {
        let provider = self.voice.tts_provider;
        let key = self.api_keys.for_tts(provider).ok_or_else(|| {
            Error::Config(format!("{provider:?} API key required for TTS"))
        })?;

        TextToSpeech::new(
            provider,
            SecretString::from(key.expose_secret().to_owned()),
            self.voice.tts_model.clone(),
            self.voice.tts_voice.clone(),
            self.voice.tts_speed,
        )
    }
}

const fn default_stt_model(provider: SttProvider) -> &'static str {
    match provider {
        SttProvider::Whisper => "whisper-1",
        SttProvider::Deepgram => "nova-2",
    }
}

const fn default_tts_model(provider: TtsProvider) -> &'static str {
    match provider {
        TtsProvider::OpenAI => "tts-1",
        TtsProvider::ElevenLabs => "eleven_multilingual_v2",
    }
}

fn parse_setting<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {name}: {raw}")))
}

fn merge_window(file: Option<WindowFileConfig>, default: CaptureWindow) -> CaptureWindow {
    let Some(file) = file else {
        return default;
    };

    CaptureWindow {
        timeout: file
            .timeout_secs
            .map_or(default.timeout, std::time::Duration::from_secs),
        phrase_limit: file
            .phrase_limit_secs
            .map_or(default.phrase_limit, std::time::Duration::from_secs),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn resolve_with(toml: &str, vars: &[(&str, &str)]) -> Result<Config> {
        let fc = file::parse_config(toml).unwrap();
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::resolve(fc, PathBuf::from("/tmp/sexta"), |key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = resolve_with("", &[]).unwrap();

        assert_eq!(config.agenda_path, PathBuf::from("/tmp/sexta/agenda.txt"));
        assert_eq!(config.voice.stt_provider, SttProvider::Whisper);
        assert_eq!(config.voice.language, "pt-BR");
        assert_eq!(config.assistant, AssistantConfig::default());
        assert_eq!(
            config.assistant.listen.wake,
            CaptureWindow::from_secs(10, 4)
        );
        assert!(config.api_keys.openai.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = resolve_with(
            "[voice]\nstt_model = \"from-file\"\ntts_voice = \"shimmer\"",
            &[("SEXTA_STT_MODEL", "from-env")],
        )
        .unwrap();

        assert_eq!(config.voice.stt_model, "from-env");
        assert_eq!(config.voice.tts_voice, "shimmer");
    }

    #[test]
    fn test_provider_specific_model_default() {
        let config = resolve_with("", &[("SEXTA_STT_PROVIDER", "deepgram")]).unwrap();
        assert_eq!(config.voice.stt_provider, SttProvider::Deepgram);
        assert_eq!(config.voice.stt_model, "nova-2");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(resolve_with("", &[("SEXTA_TTS_PROVIDER", "espeak")]).is_err());
    }

    #[test]
    fn test_speed_out_of_range() {
        assert!(resolve_with("[voice]\ntts_speed = 9.0", &[]).is_err());
    }

    #[test]
    fn test_partial_window_override() {
        let config = resolve_with("[listen.event]\nphrase_limit_secs = 20", &[]).unwrap();
        assert_eq!(config.assistant.listen.event.timeout, Duration::from_secs(8));
        assert_eq!(
            config.assistant.listen.event.phrase_limit,
            Duration::from_secs(20)
        );
    }

    #[test]
    fn test_wake_phrases_from_env() {
        let config =
            resolve_with("", &[("SEXTA_WAKE_PHRASES", "ola sexta, ei sexta")]).unwrap();
        assert_eq!(config.assistant.wake_phrases, vec!["ola sexta", "ei sexta"]);
    }

    #[test]
    fn test_zero_attempts_means_unlimited() {
        let config = resolve_with("[assistant]\nmax_coefficient_attempts = 0", &[]).unwrap();
        assert_eq!(config.assistant.max_coefficient_attempts, None);

        let config = resolve_with("", &[("SEXTA_MAX_COEFFICIENT_ATTEMPTS", "3")]).unwrap();
        assert_eq!(config.assistant.max_coefficient_attempts, Some(3));
    }

    #[test]
    fn test_missing_key_blocks_clients() {
        let config = resolve_with("", &[]).unwrap();
        assert!(config.speech_to_text().is_err());
        assert!(config.text_to_speech().is_err());

        let config = resolve_with("", &[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert!(config.speech_to_text().is_ok());
        assert!(config.text_to_speech().is_ok());
    }
}

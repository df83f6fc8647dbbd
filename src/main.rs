use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sexta_feira::agenda::AgendaStore;
use sexta_feira::console::{ConsoleListener, ConsoleSpeaker};
use sexta_feira::math::{calculate, format_number, normalize};
use sexta_feira::voice::{
    AudioCapture, AudioPlayback, CloudSpeaker, Listener, Microphone, SAMPLE_RATE, Speaker,
};
use sexta_feira::{Assistant, Clock, Config, FileAgenda, Session, SystemClock};

/// Sexta-feira - a Portuguese voice assistant
#[derive(Parser)]
#[command(name = "sexta", version, about)]
struct Cli {
    /// Use stdin/stdout instead of the microphone and speakers
    #[arg(long, env = "SEXTA_CONSOLE")]
    console: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one spoken-style expression
    Calc {
        /// Expression words, e.g. "2 vezes 3 mais 4"
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Operate the agenda directly
    Agenda {
        #[command(subcommand)]
        action: AgendaAction,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Olá! Este é um teste da síntese de voz.")]
        text: String,
    },
}

#[derive(Subcommand)]
enum AgendaAction {
    /// Print every entry
    List,
    /// Append an entry stamped with the current time
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Remove every entry
    Clear,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info",
        1 => "info,sexta_feira=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Calc { words } => cmd_calc(&words.join(" ")),
            Command::Agenda { action } => cmd_agenda(&config, action),
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&config, &text).await,
        };
    }

    let (listener, speaker): (Box<dyn Listener>, Box<dyn Speaker>) = if cli.console {
        tracing::info!("console mode");
        (Box::new(ConsoleListener::new()), Box::new(ConsoleSpeaker))
    } else {
        let microphone = Microphone::new(config.speech_to_text()?)?;
        let speaker = CloudSpeaker::new(config.text_to_speech()?, AudioPlayback::new()?);
        (Box::new(microphone), Box::new(speaker))
    };

    let agenda = FileAgenda::open(&config.agenda_path)?;
    tracing::info!(
        agenda = %agenda.path().display(),
        wake_phrases = ?config.assistant.wake_phrases,
        "starting assistant"
    );

    let session = Session {
        listener,
        speaker,
        agenda: Box::new(agenda),
        clock: Box::new(SystemClock),
    };
    let mut assistant = Assistant::new(session, config.assistant)?;

    // Run until the exit command or Ctrl-C
    let outcome = tokio::select! {
        result = assistant.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(result) => result?,
        None => assistant.interrupt().await,
    }

    Ok(())
}

/// Normalize and evaluate one expression
fn cmd_calc(expression: &str) -> anyhow::Result<()> {
    let normalized = normalize(expression)?;
    println!("Expressão: {normalized}");

    let value = calculate(expression)?;
    println!("Resultado: {}", format_number(value));

    Ok(())
}

fn cmd_agenda(config: &Config, action: AgendaAction) -> anyhow::Result<()> {
    let agenda = FileAgenda::open(&config.agenda_path)?;

    match action {
        AgendaAction::List => {
            let lines = agenda.read_all()?;
            if lines.is_empty() {
                println!("Agenda vazia ({})", agenda.path().display());
            }
            for line in lines {
                println!("{line}");
            }
        }
        AgendaAction::Add { text } => {
            agenda.append(SystemClock.now(), &text.join(" "))?;
            println!("Evento cadastrado.");
        }
        AgendaAction::Clear => {
            agenda.clear()?;
            println!("Agenda limpa.");
        }
    }

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    println!("Sample rate: {SAMPLE_RATE} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If the meter moved while you spoke, the microphone works.");
    println!("If RMS stayed near 0, check the default input device and its level.");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    let sample_rate = 24000_u16;
    let frequency = 440.0_f32;
    let num_samples = usize::from(sample_rate) * 2;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / f32::from(sample_rate);
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    playback.play(samples)?;
    println!("Done.");

    Ok(())
}

/// Test TTS output
#[allow(clippy::future_not_send)]
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!(
        "Synthesizing with {:?} ({}, voice {})...",
        config.voice.tts_provider, config.voice.tts_model, config.voice.tts_voice
    );

    let tts = config.text_to_speech()?;
    let audio = tts.synthesize(text).await?;
    println!("Received {} bytes of audio, playing...", audio.len());

    let playback = AudioPlayback::new()?;
    playback.play_mp3(&audio)?;
    println!("Done.");

    Ok(())
}

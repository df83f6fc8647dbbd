//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use sexta_feira::voice::{
    DEFAULT_WAKE_PHRASES, SAMPLE_RATE, SegmentState, SpeechSegmenter, WakeWordDetector,
    samples_to_wav,
};
use std::io::Cursor;

mod common;

/// Generate sine wave audio samples
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_default_detector_accepts_every_spelling() {
    let detector = WakeWordDetector::default();

    assert_eq!(detector.wake_words().len(), DEFAULT_WAKE_PHRASES.len());
    for phrase in DEFAULT_WAKE_PHRASES {
        assert!(detector.check_wake_word(phrase), "{phrase}");
    }
}

#[test]
fn test_wake_word_normalization() {
    let detector = WakeWordDetector::new(vec![
        "  Ok SEXTA-FEIRA  ".to_string(),
        "Olá Sexta".to_string(),
    ])
    .unwrap();

    // Lower-cased, trimmed and accent-folded
    assert_eq!(detector.wake_words(), &["ok sexta-feira", "ola sexta"]);
}

#[test]
fn test_wake_word_case_and_accent_insensitive() {
    let detector = WakeWordDetector::new(vec!["olá sexta".to_string()]).unwrap();

    assert!(detector.check_wake_word("OLÁ SEXTA"));
    assert!(detector.check_wake_word("ola sexta, que horas são?"));
    assert!(!detector.check_wake_word("sexta-feira"));
}

#[test]
fn test_wake_word_requires_a_phrase() {
    assert!(WakeWordDetector::new(vec![]).is_err());
    assert!(WakeWordDetector::new(vec!["   ".to_string()]).is_err());
}

#[test]
fn test_speech_activity_detection() {
    let mut segmenter = SpeechSegmenter::new();

    // Silent samples - should not trigger
    assert!(!segmenter.process(&generate_silence(0.1)));
    assert_eq!(segmenter.state(), SegmentState::Idle);

    // Loud samples - should start speaking
    segmenter.process(&generate_sine_samples(440.0, 0.5, 0.3));
    assert_eq!(segmenter.state(), SegmentState::Speaking);

    // Silence after enough speech should complete the segment
    assert!(segmenter.process(&generate_silence(0.6)));
    assert!(segmenter.is_complete());
}

#[test]
fn test_speech_buffer_accumulation() {
    let mut segmenter = SpeechSegmenter::new();

    let chunk1 = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.process(&chunk1);

    let chunk2 = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.process(&chunk2);

    assert_eq!(segmenter.speech_buffer().len(), chunk1.len() + chunk2.len());
}

#[test]
fn test_take_speech_buffer() {
    let mut segmenter = SpeechSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.process(&speech);

    let taken = segmenter.take_speech_buffer();
    assert_eq!(taken.len(), speech.len());

    // Buffer should be empty and idle after take
    assert!(segmenter.speech_buffer().is_empty());
    assert_eq!(segmenter.state(), SegmentState::Idle);
}

#[test]
fn test_short_pause_does_not_complete() {
    let mut segmenter = SpeechSegmenter::new();

    segmenter.process(&generate_sine_samples(440.0, 0.5, 0.3));
    assert!(!segmenter.process(&generate_silence(0.2)));
    segmenter.process(&generate_sine_samples(440.0, 0.3, 0.3));

    assert_eq!(segmenter.state(), SegmentState::Speaking);
    assert!(!segmenter.is_complete());
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");

    // WAV header is 44 bytes
    assert!(wav_data.len() > 44);
}

#[test]
fn test_wav_readback() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
    assert_eq!(read_samples[3], i16::MAX);
}

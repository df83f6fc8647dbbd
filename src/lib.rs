//! Sexta-feira - a Portuguese voice assistant
//!
//! This library provides the assistant's command pipeline and the
//! collaborators it drives:
//! - Wake phrase / command state machine
//! - Spoken arithmetic (normalizer, restricted parser, evaluator)
//! - First and second degree equation solving by coefficient prompts
//! - Agenda, clock, and voice (STT/TTS) collaborators
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Collaborators                       │
//! │   Microphone / Console  │  Speaker  │  Agenda  │ Clock│
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Assistant                         │
//! │   Wake phrase  │  Keyword rules  │  Parameter prompts│
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                      Math                            │
//! │   Normalizer  │  Parser  │  Evaluator  │  Equations  │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod agenda;
pub mod assistant;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod math;
pub mod text;
pub mod voice;

pub use agenda::{AgendaStore, FileAgenda, MemoryAgenda};
pub use assistant::{Assistant, CommandState, Flow, ParameterKind, Session};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AssistantConfig, Config, ListenConfig};
pub use error::{Error, Result};

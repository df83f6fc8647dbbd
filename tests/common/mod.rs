//! Shared test utilities

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use sexta_feira::voice::{CaptureWindow, Listener, Speaker};
use sexta_feira::{
    AgendaStore, Assistant, AssistantConfig, Error, FixedClock, MemoryAgenda, Result, Session,
};

/// Replays a fixed list of utterances, then hears nothing
pub struct ScriptedListener {
    script: VecDeque<String>,
    windows: Rc<RefCell<Vec<CaptureWindow>>>,
    /// Report end of input once the script runs out
    closes: bool,
}

#[async_trait(?Send)]
impl Listener for ScriptedListener {
    async fn capture(&mut self, window: CaptureWindow) -> String {
        self.windows.borrow_mut().push(window);
        self.script.pop_front().unwrap_or_default()
    }

    fn is_closed(&self) -> bool {
        self.closes && self.script.is_empty()
    }
}

/// Records every spoken phrase
pub struct RecordingSpeaker {
    spoken: Rc<RefCell<Vec<String>>>,
}

#[async_trait(?Send)]
impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str) {
        self.spoken.borrow_mut().push(text.to_string());
    }
}

/// Agenda whose every operation fails
pub struct BrokenAgenda;

impl AgendaStore for BrokenAgenda {
    fn append(&self, _timestamp: DateTime<Local>, _text: &str) -> Result<()> {
        Err(Error::Agenda("disk full".to_string()))
    }

    fn read_all(&self) -> Result<Vec<String>> {
        Err(Error::Agenda("unreadable".to_string()))
    }

    fn clear(&self) -> Result<()> {
        Err(Error::Agenda("read-only".to_string()))
    }
}

/// Handles into a scripted assistant
pub struct Harness {
    pub assistant: Assistant,
    pub spoken: Rc<RefCell<Vec<String>>>,
    pub windows: Rc<RefCell<Vec<CaptureWindow>>>,
}

impl Harness {
    /// Everything said so far
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }

    /// Last thing said
    pub fn last_spoken(&self) -> String {
        self.spoken.borrow().last().cloned().unwrap_or_default()
    }

    /// Number of captures made so far
    pub fn captures(&self) -> usize {
        self.windows.borrow().len()
    }
}

/// 07/03/2026 14:05 local time
pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 7, 14, 5, 0).unwrap()
}

/// Assistant with default settings over a scripted session
pub fn harness(script: &[&str]) -> Harness {
    harness_with(script, AssistantConfig::default(), Box::new(MemoryAgenda::new()))
}

/// Assistant whose input ends after the script, like piped stdin
pub fn closing_harness(script: &[&str]) -> Harness {
    build(script, AssistantConfig::default(), Box::new(MemoryAgenda::new()), true)
}

/// Assistant over a scripted session with explicit settings and agenda
pub fn harness_with(
    script: &[&str],
    config: AssistantConfig,
    agenda: Box<dyn AgendaStore>,
) -> Harness {
    build(script, config, agenda, false)
}

fn build(
    script: &[&str],
    config: AssistantConfig,
    agenda: Box<dyn AgendaStore>,
    closes: bool,
) -> Harness {
    let spoken = Rc::new(RefCell::new(Vec::new()));
    let windows = Rc::new(RefCell::new(Vec::new()));

    let session = Session {
        listener: Box::new(ScriptedListener {
            script: script.iter().map(ToString::to_string).collect(),
            windows: Rc::clone(&windows),
            closes,
        }),
        speaker: Box::new(RecordingSpeaker {
            spoken: Rc::clone(&spoken),
        }),
        agenda,
        clock: Box::new(FixedClock(fixed_now())),
    };

    Harness {
        assistant: Assistant::new(session, config).expect("failed to build assistant"),
        spoken,
        windows,
    }
}

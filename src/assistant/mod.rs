//! Command dispatcher
//!
//! A single-user state machine: wait for the wake phrase, take one command,
//! run it, go back to waiting. Multi-step commands (event text, a prompted
//! expression, equation coefficients) park in
//! [`CommandState::AwaitingParameter`] until their value arrives.
//!
//! Capture and speech strictly alternate. Every recoverable failure becomes
//! one spoken phrase; only errors from the agenda store escape [`Assistant::step`].

pub mod command;
pub mod phrases;

use crate::agenda::AgendaStore;
use crate::clock::{Clock, spoken_date, spoken_time};
use crate::config::AssistantConfig;
use crate::math::{
    Degree, EquationError, EquationRequest, EvalError, calculate, format_number, parse_coefficient,
};
use crate::voice::{Listener, Speaker, WakeWordDetector};
use crate::Result;
use command::{Command, calculate_request, classify};

/// Value a multi-step command is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    EventText,
    Expression,
    /// Named equation coefficient (`'A'`, `'B'`, `'C'`)
    Coefficient(char),
}

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    AwaitingWake,
    AwaitingCommand,
    AwaitingParameter(ParameterKind),
    /// The exit command was given
    Terminated,
}

/// Whether the loop should keep going after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Collaborators the dispatcher talks to
pub struct Session {
    pub listener: Box<dyn Listener>,
    pub speaker: Box<dyn Speaker>,
    pub agenda: Box<dyn AgendaStore>,
    pub clock: Box<dyn Clock>,
}

/// Equation being collected across coefficient prompts
#[derive(Debug)]
struct PendingEquation {
    request: EquationRequest,
    failed_attempts: u32,
}

/// The voice assistant
pub struct Assistant {
    session: Session,
    config: AssistantConfig,
    wake: WakeWordDetector,
    state: CommandState,
    equation: Option<PendingEquation>,
}

impl Assistant {
    /// Create an assistant waiting for its wake phrase
    ///
    /// # Errors
    ///
    /// Returns error if no usable wake phrase is configured
    pub fn new(session: Session, config: AssistantConfig) -> Result<Self> {
        let wake = WakeWordDetector::new(config.wake_phrases.clone())?;

        Ok(Self {
            session,
            config,
            wake,
            state: CommandState::AwaitingWake,
            equation: None,
        })
    }

    #[must_use]
    pub const fn state(&self) -> CommandState {
        self.state
    }

    /// Greet, then step until the exit command
    ///
    /// # Errors
    ///
    /// Returns the first unrecoverable error, after telling the user
    pub async fn run(&mut self) -> Result<()> {
        self.say(phrases::GREETING).await;

        loop {
            match self.step().await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Halt) => {
                    tracing::info!("assistant stopped");
                    return Ok(());
                }
                Err(e) => {
                    tracing::error!(error = %e, state = ?self.state, "assistant failed");
                    self.say(phrases::FATAL).await;
                    self.state = CommandState::Terminated;
                    return Err(e);
                }
            }
        }
    }

    /// Say the interruption notice and stop
    pub async fn interrupt(&mut self) {
        tracing::info!(state = ?self.state, "interrupted");
        self.state = CommandState::Terminated;
        self.say(phrases::INTERRUPTED).await;
    }

    /// Run one capture and whatever it triggers
    ///
    /// Says goodbye and halts once the listener's input has ended.
    ///
    /// # Errors
    ///
    /// Returns error if the agenda store fails
    pub async fn step(&mut self) -> Result<Flow> {
        tracing::debug!(state = ?self.state, "step");

        if self.state != CommandState::Terminated && self.session.listener.is_closed() {
            tracing::info!(state = ?self.state, "input closed");
            self.say(phrases::FAREWELL).await;
            self.transition(CommandState::Terminated);
            return Ok(Flow::Halt);
        }

        match self.state {
            CommandState::AwaitingWake => {
                self.await_wake().await;
                Ok(Flow::Continue)
            }
            CommandState::AwaitingCommand => self.await_command().await,
            CommandState::AwaitingParameter(kind) => {
                self.await_parameter(kind).await?;
                Ok(Flow::Continue)
            }
            CommandState::Terminated => Ok(Flow::Halt),
        }
    }

    async fn say(&mut self, text: &str) {
        self.session.speaker.speak(text).await;
    }

    fn transition(&mut self, next: CommandState) {
        tracing::debug!(from = ?self.state, to = ?next, "transition");
        self.state = next;
    }

    async fn await_wake(&mut self) {
        let heard = self.session.listener.capture(self.config.listen.wake).await;

        if !heard.is_empty() && self.wake.check_wake_word(&heard) {
            self.say(phrases::ACKNOWLEDGE).await;
            self.transition(CommandState::AwaitingCommand);
        }
    }

    async fn await_command(&mut self) -> Result<Flow> {
        let heard = self
            .session
            .listener
            .capture(self.config.listen.command)
            .await;

        if heard.is_empty() {
            tracing::warn!("no command heard");
            self.say(phrases::NO_COMMAND).await;
            self.transition(CommandState::AwaitingWake);
            return Ok(Flow::Continue);
        }

        let command = classify(&heard);
        tracing::info!(transcript = %heard, command = ?command, "command received");

        // Handlers that need a follow-up value move on from here themselves
        self.state = CommandState::AwaitingWake;

        match command {
            Command::RegisterEvent => {
                self.say(phrases::ASK_EVENT).await;
                self.transition(CommandState::AwaitingParameter(ParameterKind::EventText));
            }
            Command::ReadAgenda => {
                let lines = self.session.agenda.read_all()?;
                if lines.is_empty() {
                    self.say(phrases::AGENDA_EMPTY).await;
                } else {
                    self.say(&phrases::agenda_listing(&lines)).await;
                }
            }
            Command::ClearAgenda => {
                self.session.agenda.clear()?;
                self.say(phrases::AGENDA_CLEARED).await;
            }
            Command::Time => {
                let now = spoken_time(self.session.clock.now());
                self.say(&phrases::time(&now)).await;
            }
            Command::Date => {
                let today = spoken_date(self.session.clock.now());
                self.say(&phrases::date(&today)).await;
            }
            Command::Equation => self.start_equation(&heard).await,
            Command::Exit => {
                self.say(phrases::FAREWELL).await;
                self.transition(CommandState::Terminated);
                return Ok(Flow::Halt);
            }
            Command::Arithmetic => self.arithmetic(&heard).await,
        }

        Ok(Flow::Continue)
    }

    async fn await_parameter(&mut self, kind: ParameterKind) -> Result<()> {
        match kind {
            ParameterKind::EventText => {
                let heard = self.session.listener.capture(self.config.listen.event).await;
                self.transition(CommandState::AwaitingWake);

                if heard.is_empty() {
                    tracing::warn!("no event text heard");
                    self.say(phrases::NO_EVENT).await;
                } else {
                    self.session.agenda.append(self.session.clock.now(), &heard)?;
                    tracing::info!(event = %heard, "event registered");
                    self.say(phrases::EVENT_SAVED).await;
                }
            }
            ParameterKind::Expression => {
                let heard = self
                    .session
                    .listener
                    .capture(self.config.listen.expression)
                    .await;
                self.transition(CommandState::AwaitingWake);

                if heard.is_empty() {
                    tracing::warn!("no expression heard");
                    self.say(phrases::NO_EXPRESSION).await;
                } else {
                    let reply = Self::calculation_reply(&heard, true);
                    self.say(&reply).await;
                }
            }
            ParameterKind::Coefficient(name) => self.await_coefficient(name).await,
        }

        Ok(())
    }

    async fn arithmetic(&mut self, utterance: &str) {
        let reply = match calculate_request(utterance) {
            Some(rest) if rest.is_empty() => {
                self.say(phrases::ASK_EXPRESSION).await;
                self.transition(CommandState::AwaitingParameter(ParameterKind::Expression));
                return;
            }
            Some(rest) => Self::calculation_reply(&rest, true),
            None => Self::calculation_reply(utterance, false),
        };

        self.say(&reply).await;
    }

    /// Phrase for a calculation attempt; `explicit` when the user asked to
    /// calculate rather than the utterance falling through every rule
    fn calculation_reply(utterance: &str, explicit: bool) -> String {
        match calculate(utterance) {
            Ok(value) => {
                let rendered = format_number(value);
                tracing::info!(expression = %utterance, result = %rendered, "calculated");
                phrases::result(&rendered)
            }
            Err(EvalError::NoExpression) if !explicit => {
                tracing::warn!(transcript = %utterance, "command not recognized");
                phrases::NOT_RECOGNIZED.to_string()
            }
            Err(e) => {
                tracing::warn!(expression = %utterance, error = %e, "calculation failed");
                phrases::CANNOT_CALCULATE.to_string()
            }
        }
    }

    async fn start_equation(&mut self, utterance: &str) {
        let Some(degree) = Degree::detect(utterance) else {
            tracing::warn!(transcript = %utterance, "equation degree not understood");
            self.say(phrases::UNKNOWN_EQUATION).await;
            return;
        };

        tracing::info!(degree = ?degree, "equation started");
        let request = EquationRequest::new(degree);
        let Some(first) = request.next_coefficient() else {
            return;
        };

        self.equation = Some(PendingEquation {
            request,
            failed_attempts: 0,
        });
        self.say(&phrases::equation_intro(degree)).await;
        self.say(&phrases::ask_coefficient(first)).await;
        self.transition(CommandState::AwaitingParameter(ParameterKind::Coefficient(first)));
    }

    async fn await_coefficient(&mut self, name: char) {
        let heard = self
            .session
            .listener
            .capture(self.config.listen.coefficient)
            .await;

        let Some(mut pending) = self.equation.take() else {
            tracing::warn!(coefficient = %name, "no equation in progress");
            self.transition(CommandState::AwaitingWake);
            return;
        };

        let Some(value) = parse_coefficient(&heard) else {
            pending.failed_attempts += 1;
            let exhausted = self
                .config
                .max_coefficient_attempts
                .is_some_and(|limit| pending.failed_attempts >= limit);

            if exhausted {
                let e = EquationError::RetriesExhausted(name);
                tracing::warn!(error = %e, "equation abandoned");
                self.say(&phrases::coefficient_gave_up(name)).await;
                self.transition(CommandState::AwaitingWake);
                return;
            }

            tracing::debug!(coefficient = %name, transcript = %heard, "coefficient not understood");
            let reprompt = if heard.is_empty() {
                phrases::COEFFICIENT_NOT_HEARD
            } else {
                phrases::COEFFICIENT_NOT_NUMBER
            };
            self.equation = Some(pending);
            self.say(reprompt).await;
            return;
        };

        tracing::debug!(coefficient = %name, value, "coefficient received");
        if let Err(e) = pending.request.push(value) {
            tracing::warn!(error = %e, "equation rejected");
            self.say(&phrases::zero_leading(pending.request.degree())).await;
            self.transition(CommandState::AwaitingWake);
            return;
        }

        if let Some(next) = pending.request.next_coefficient() {
            pending.failed_attempts = 0;
            self.equation = Some(pending);
            self.say(&phrases::ask_coefficient(next)).await;
            self.transition(CommandState::AwaitingParameter(ParameterKind::Coefficient(next)));
            return;
        }

        self.transition(CommandState::AwaitingWake);
        match pending.request.solve() {
            Some(solution) => {
                tracing::info!(solution = ?solution, "equation solved");
                self.say(&phrases::solution(solution)).await;
            }
            None => {
                tracing::warn!("equation incomplete");
                self.say(phrases::NOT_RECOGNIZED).await;
            }
        }
    }
}

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fmt::Display, thread};

use log::{debug, info, warn};

use crate::command::{validate, Action, ActionKind, CommandDescriptor, ValidationError};
use crate::protocol::{self, DecodedValue, Link, ProtocolError, RawFrame, Terminator};

/// Shared flag checked between commands and while waiting for a reply.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Pause after every command, whatever its outcome.
    pub interval: Duration,
    /// Longest wait for one complete reply frame.
    pub frame_timeout: Duration,
    /// Extra attempts after a timeout or i/o error.
    pub retries: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            interval: Duration::from_millis(100),
            frame_timeout: Duration::from_secs(2),
            retries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unsupported(ActionKind),
    Invalid(ValidationError),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unsupported(kind) => write!(f, "no {} support", kind),
            SkipReason::Invalid(e) => e.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(DecodedValue),
    Skipped(SkipReason),
    ParseError(RawFrame),
    TransportError(String),
    Cancelled,
}

pub struct Dispatcher<'a, P: Link + ?Sized> {
    port: &'a mut P,
    config: DispatchConfig,
    cancel: CancelToken,
}

impl<'a, P: Link + ?Sized> Dispatcher<'a, P> {
    pub fn new(port: &'a mut P, config: DispatchConfig) -> Self {
        Self {
            port,
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&mut self, commands: &[CommandDescriptor], action: &Action) -> Vec<Outcome> {
        self.run_with(commands, action, |_, _| ())
    }

    /// Dispatches `action` for every command in order, one outcome each.
    ///
    /// `report` sees each outcome as soon as it is known.
    pub fn run_with<F>(
        &mut self,
        commands: &[CommandDescriptor],
        action: &Action,
        mut report: F,
    ) -> Vec<Outcome>
    where
        F: FnMut(&CommandDescriptor, &Outcome),
    {
        let mut outcomes = Vec::with_capacity(commands.len());

        for command in commands {
            let outcome = if self.cancel.is_cancelled() {
                Outcome::Cancelled
            } else {
                self.dispatch(command, action)
            };
            report(command, &outcome);
            outcomes.push(outcome);

            if !self.cancel.is_cancelled() {
                thread::sleep(self.config.interval);
            }
        }

        let cancelled = outcomes.iter().filter(|o| **o == Outcome::Cancelled).count();
        if cancelled > 0 {
            info!("cancelled, {} commands not sent", cancelled);
        }
        outcomes
    }

    pub fn dispatch(&mut self, command: &CommandDescriptor, action: &Action) -> Outcome {
        let kind = action.kind();
        let opcode = match command.control_type.opcode(kind) {
            Some(opcode) => opcode,
            None => {
                debug!("{}: has no '{}', skipping", command.description, kind);
                return Outcome::Skipped(SkipReason::Unsupported(kind));
            }
        };

        let value = match action {
            Action::Get => None,
            Action::Set(value) => match validate(&command.parameter_spec, value.as_deref()) {
                Ok(value) => value,
                Err(e) => {
                    warn!("{}: {}", command.description, e);
                    return Outcome::Skipped(SkipReason::Invalid(e));
                }
            },
        };

        let request = protocol::encode(opcode, command.function_code, value.as_deref());

        let echo = (opcode, command.function_code);
        let frame = match self.exchange(&request, echo, Terminator::for_action(kind)) {
            Ok(frame) => frame,
            Err(ProtocolError::Cancelled) => return Outcome::Cancelled,
            Err(e) => {
                warn!("{}: {}", command.description, e);
                return Outcome::TransportError(e.to_string());
            }
        };

        match protocol::interpret(&frame, command.response_values.as_ref()) {
            Some(decoded) => Outcome::Success(decoded),
            None => {
                warn!("{}: couldn't parse {}", command.description, frame);
                Outcome::ParseError(frame)
            }
        }
    }

    fn exchange(
        &mut self,
        request: &str,
        echo: (u8, u16),
        terminator: Terminator,
    ) -> Result<RawFrame, ProtocolError> {
        let mut error = None;

        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                warn!("retry {} of {}", attempt, self.config.retries);
            }
            match self.exchange1(request, echo, terminator) {
                Ok(frame) => return Ok(frame),
                Err(e) if e.is_transient() => error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(error.unwrap_or(ProtocolError::Cancelled))
    }

    /// Sends `request` and returns the first frame that answers it.
    ///
    /// Input left over from earlier exchanges is dropped before sending, and
    /// frames echoing another opcode or function code are skipped.
    fn exchange1(
        &mut self,
        request: &str,
        echo: (u8, u16),
        terminator: Terminator,
    ) -> Result<RawFrame, ProtocolError> {
        self.port.discard_input()?;

        debug!("send {:?}", request);
        self.port.write_all(request.as_bytes())?;
        self.port.flush()?;

        let deadline = Instant::now() + self.config.frame_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let frame = match protocol::read_frame(
                &mut *self.port,
                terminator,
                remaining,
                &self.cancel,
            ) {
                Err(ProtocolError::TimedOut(_)) => {
                    return Err(ProtocolError::TimedOut(self.config.frame_timeout))
                }
                res => res?,
            };

            match protocol::reply_echo(&frame) {
                Some(got) if got != echo => warn!("dropping stale reply {}", frame),
                _ => return Ok(frame),
            }
        }
    }
}

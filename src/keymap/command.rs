//! Hand-off of matched command strings to the command layer

use std::fmt;

use thiserror::Error;

/// How a command was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Through a typed key chain
    Chain,
    /// Through a special `<Mod+Key>` binding
    Special,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKind::Chain => write!(f, "chain"),
            TriggerKind::Special => write!(f, "special"),
        }
    }
}

/// Receiver of execute requests from a dispatcher
pub trait CommandExecutor {
    fn execute(&mut self, command: &str, kind: TriggerKind, count: Option<u32>);
}

impl<F> CommandExecutor for F
where
    F: FnMut(&str, TriggerKind, Option<u32>),
{
    fn execute(&mut self, command: &str, kind: TriggerKind, count: Option<u32>) {
        self(command, kind, count)
    }
}

/// Errors reported by the command layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("no such command: {0}")]
    NoSuchCommand(String),
    #[error("{command}: {message}")]
    ArgumentCount { command: String, message: String },
}

/// Parses and runs a command string
pub trait CommandRunner {
    fn run(&mut self, command: &str, count: Option<u32>) -> Result<(), ExecutionError>;
}

/// Executor that runs commands, or pre-fills the command line when a bound
/// command is missing its arguments
///
/// Unknown commands are dropped. On an argument count error the command is
/// handed to `fill` as `":{command} "` so the user can finish typing it.
pub struct RunOrFill<R, F> {
    runner: R,
    fill: F,
}

impl<R, F> RunOrFill<R, F>
where
    R: CommandRunner,
    F: FnMut(&str),
{
    pub fn new(runner: R, fill: F) -> Self {
        Self { runner, fill }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }
}

impl<R, F> CommandExecutor for RunOrFill<R, F>
where
    R: CommandRunner,
    F: FnMut(&str),
{
    fn execute(&mut self, command: &str, _kind: TriggerKind, count: Option<u32>) {
        match self.runner.run(command, count) {
            Ok(()) => {}
            Err(ExecutionError::NoSuchCommand(name)) => {
                tracing::debug!("Dropping unknown command {}", name);
            }
            Err(ExecutionError::ArgumentCount { .. }) => {
                tracing::debug!("Filling statusbar with partial command {}", command);
                (self.fill)(&format!(":{} ", command));
            }
        }
    }
}

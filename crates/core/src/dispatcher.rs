//! Classification and execution of catalog commands against a [`Supervisor`].
//!
//! Console commands are written to the child's stdin. System commands drive
//! the supervisor itself:
//!
//! - `wait <amount> <unit>` pauses only the dispatching task
//! - `kill` terminates the process
//! - `start <path> [-f|-force]` starts `path`, killing a live process first
//!   only when forced
//!
//! Unknown types, sub-commands and units are skipped without error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::command_definitions::{BasicCommand, Command, CommandKind, MacroCommand, Runnable};
use crate::error::{Error, Result};
use crate::events::{ExecutedCommand, Subscribers};
use crate::supervisor::Supervisor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Parses a unit name or abbreviation, ignoring case.
    #[must_use]
    pub fn parse(unit: &str) -> Option<Self> {
        match unit.to_lowercase().as_str() {
            "millisecond" | "millisec" | "ms" => Some(Self::Millisecond),
            "second" | "sec" | "s" => Some(Self::Second),
            "minute" | "min" | "m" => Some(Self::Minute),
            "hour" | "h" => Some(Self::Hour),
            "day" | "d" => Some(Self::Day),
            _ => None,
        }
    }

    #[must_use]
    pub fn millis(self) -> u64 {
        match self {
            Self::Millisecond => 1,
            Self::Second => 1_000,
            Self::Minute => 60_000,
            Self::Hour => 3_600_000,
            Self::Day => 86_400_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    Wait(Duration),
    Kill,
    /// `path` is `None` when the query names no executable.
    Start { path: Option<PathBuf>, force: bool },
    Unknown,
}

impl SystemCommand {
    /// Parses a system query such as `wait 10 sec` or `start ./server -f`.
    ///
    /// An unrecognised sub-command yields [`SystemCommand::Unknown`] and an
    /// unrecognised time unit yields a zero wait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedWait`] when a `wait` amount is missing, is not
    /// a non-negative integer, or overflows once converted to milliseconds.
    pub fn parse(query: &str) -> Result<Self> {
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Ok(Self::Unknown);
        };

        match first.to_lowercase().as_str() {
            "wait" => parse_wait(query, &tokens).map(Self::Wait),
            "kill" => Ok(Self::Kill),
            "start" => Ok(Self::Start {
                path: tokens.get(1).map(PathBuf::from),
                force: tokens
                    .iter()
                    .skip(2)
                    .any(|token| matches!(token.to_lowercase().as_str(), "-f" | "-force")),
            }),
            _ => Ok(Self::Unknown),
        }
    }
}

fn parse_wait(query: &str, tokens: &[&str]) -> Result<Duration> {
    let malformed = || Error::MalformedWait(query.to_string());

    let amount: u64 = tokens
        .get(1)
        .and_then(|amount| amount.parse().ok())
        .ok_or_else(malformed)?;
    let unit = tokens.get(2).ok_or_else(malformed)?;

    let Some(unit) = TimeUnit::parse(unit) else {
        warn!("Unknown time unit `{}` in `{}`, not waiting", unit, query);
        return Ok(Duration::ZERO);
    };

    amount
        .checked_mul(unit.millis())
        .map(Duration::from_millis)
        .ok_or_else(malformed)
}

/// Runs basic and macro commands against the bound supervisor and reports
/// every executed unit to its subscribers.
pub struct Dispatcher {
    supervisor: Option<Supervisor>,
    executed: Subscribers<ExecutedCommand>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            supervisor: None,
            executed: Subscribers::new(),
        }
    }

    #[must_use]
    pub fn with_supervisor(supervisor: Supervisor) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.bind(supervisor);
        dispatcher
    }

    /// Points the dispatcher at `supervisor`, replacing any earlier binding.
    pub fn bind(&mut self, supervisor: Supervisor) {
        self.supervisor = Some(supervisor);
    }

    pub fn subscribe(&self) -> UnboundedReceiver<ExecutedCommand> {
        self.executed.subscribe()
    }

    fn running_supervisor(&self) -> Option<&Supervisor> {
        self.supervisor
            .as_ref()
            .filter(|supervisor| supervisor.is_running())
    }

    /// # Errors
    ///
    /// See [`Dispatcher::execute_basic`] and [`Dispatcher::execute_macro`].
    pub async fn execute(&self, runnable: &Runnable) -> Result<()> {
        match runnable {
            Runnable::Basic(basic) => self.execute_basic(basic).await,
            Runnable::Macro(macro_command) => self.execute_macro(macro_command).await,
        }
    }

    /// Runs a single named command. Does nothing unless the bound supervisor
    /// is running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedWait`] for an unparsable `wait` query.
    pub async fn execute_basic(&self, basic: &BasicCommand) -> Result<()> {
        let Some(supervisor) = self.running_supervisor() else {
            debug!("Not executing `{}`: no running process", basic.name);
            return Ok(());
        };

        info!("Executing command `{}`", basic.name);
        self.executed.publish(ExecutedCommand::Basic(basic.clone()));

        let command = &basic.command;
        let kind = command.classify();
        self.executed.publish(ExecutedCommand::Command(command.clone()));

        run_command(supervisor, kind, command).await
    }

    /// Runs every command of a macro in order. Unknown command types are
    /// skipped and nothing already run is undone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedWait`] for an unparsable `wait` query; the
    /// remaining commands are not run.
    pub async fn execute_macro(&self, macro_command: &MacroCommand) -> Result<()> {
        let Some(supervisor) = self.running_supervisor() else {
            debug!("Not executing macro `{}`: no running process", macro_command.name);
            return Ok(());
        };

        info!(
            "Executing macro `{}` ({} commands)",
            macro_command.name,
            macro_command.commands.len()
        );
        self.executed
            .publish(ExecutedCommand::Macro(macro_command.clone()));

        for command in &macro_command.commands {
            let kind = command.classify();
            self.executed.publish(ExecutedCommand::Command(command.clone()));
            run_command(supervisor, kind, command).await?;
        }

        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_command(supervisor: &Supervisor, kind: CommandKind, command: &Command) -> Result<()> {
    match kind {
        CommandKind::Console => supervisor.execute(&command.query),
        CommandKind::System => run_system_command(supervisor, &command.query).await?,
        CommandKind::Unknown => debug!("Skipping command of unknown type `{}`", command.kind),
    }

    Ok(())
}

async fn run_system_command(supervisor: &Supervisor, query: &str) -> Result<()> {
    match SystemCommand::parse(query)? {
        SystemCommand::Wait(duration) => {
            if !duration.is_zero() {
                debug!("Waiting {:?}", duration);
                tokio::time::sleep(duration).await;
            }
        }
        SystemCommand::Kill => {
            if supervisor.is_running() {
                supervisor.kill().await;
            }
        }
        SystemCommand::Start {
            path: Some(path),
            force,
        } => start(supervisor, &path, force).await,
        SystemCommand::Start { path: None, .. } => debug!("Ignoring `{}`: no path", query),
        SystemCommand::Unknown => debug!("Ignoring unknown system command `{}`", query),
    }

    Ok(())
}

async fn start(supervisor: &Supervisor, path: &Path, force: bool) {
    if !path.is_file() {
        debug!("Not starting `{}`: no such file", path.display());
        return;
    }

    if supervisor.is_running() {
        if !force {
            debug!("Not starting `{}`: a process is running", path.display());
            return;
        }
        supervisor.kill().await;
    }

    supervisor.set_executable_path(path);
    supervisor.start();
}

//! The interactive shell: turns operator input lines into supervisor and
//! dispatcher calls.
//!
//! Lines starting with `:` are shell commands; any other line is sent to the
//! supervised process as-is and remembered in the history.

use std::collections::VecDeque;
use std::path::PathBuf;

use conwrap_core::catalog::{Catalog, CommandSet};
use conwrap_core::command_definitions::{BasicCommand, Command, Runnable};
use conwrap_core::dispatcher::Dispatcher;
use conwrap_core::events::ExecutedCommand;
use conwrap_core::history::History;
use conwrap_core::supervisor::Supervisor;
use log::warn;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::output::{describe_executed, describe_runnable, print_notice};

/// Executed units kept for `:executed` and `:rerun`.
pub const EXECUTED_CAPACITY: usize = 100;

pub const HELP: &str = "\
:switch [PATH]  start PATH (or the last executable), or kill the running process
:kill           kill the running process
:list           list catalog commands for the running process
:run NAME       run a catalog command by name
:prev / :next   recall older / newer input from history
:again          send the recalled input again
:executed       list executed commands, numbered
:rerun N        run executed entry N again (basic and macro entries only)
:history        show the remembered input
:help           show this help
:quit           kill the process and exit
anything else   is sent to the process's stdin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Empty,
    Text(String),
    Switch(Option<String>),
    Kill,
    List,
    Run(String),
    Previous,
    Next,
    Again,
    Executed,
    Rerun(usize),
    History,
    Help,
    Quit,
    Unknown(String),
}

impl ShellInput {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        if line.trim().is_empty() {
            return Self::Empty;
        }

        let Some(meta) = line.trim_start().strip_prefix(':') else {
            return Self::Text(line.to_string());
        };

        let (name, argument) = match meta.trim().split_once(char::is_whitespace) {
            Some((name, argument)) => (name, Some(argument.trim().to_string())),
            None => (meta.trim(), None),
        };

        match (name.to_lowercase().as_str(), argument) {
            ("switch", argument) => Self::Switch(argument),
            ("kill", None) => Self::Kill,
            ("list", None) => Self::List,
            ("run", Some(name)) => Self::Run(name),
            ("prev", None) => Self::Previous,
            ("next", None) => Self::Next,
            ("again", None) => Self::Again,
            ("executed", None) => Self::Executed,
            ("rerun", Some(index)) => match index.parse() {
                Ok(index) => Self::Rerun(index),
                Err(_) => Self::Unknown(line.trim().to_string()),
            },
            ("history", None) => Self::History,
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Shell {
    supervisor: Supervisor,
    dispatcher: Dispatcher,
    catalog: Catalog,
    history: History,
    recalled: Option<String>,
    executed_feed: UnboundedReceiver<ExecutedCommand>,
    executed: VecDeque<ExecutedCommand>,
}

impl Shell {
    #[must_use]
    pub fn new(catalog: Catalog, history_size: usize) -> Self {
        let supervisor = Supervisor::new();
        let dispatcher = Dispatcher::with_supervisor(supervisor.clone());
        Self {
            executed_feed: dispatcher.subscribe(),
            executed: VecDeque::new(),
            dispatcher,
            supervisor,
            catalog,
            history: History::new(history_size),
            recalled: None,
        }
    }

    #[must_use]
    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn recalled(&self) -> Option<&str> {
        self.recalled.as_deref()
    }

    /// Executed units, oldest first, as of the last handled input.
    pub fn executed(&self) -> impl Iterator<Item = &ExecutedCommand> {
        self.executed.iter()
    }

    pub async fn handle_line(&mut self, line: &str) -> Control {
        self.handle(ShellInput::parse(line)).await
    }

    pub async fn handle(&mut self, input: ShellInput) -> Control {
        let control = self.dispatch_input(input).await;
        self.collect_executed();
        control
    }

    async fn dispatch_input(&mut self, input: ShellInput) -> Control {
        match input {
            ShellInput::Empty => {}
            ShellInput::Text(text) => self.send(text).await,
            ShellInput::Switch(path) => self.switch(path).await,
            ShellInput::Kill => self.supervisor.kill().await,
            ShellInput::List => self.list(),
            ShellInput::Run(name) => self.run(&name).await,
            ShellInput::Previous => {
                let entry = self.history.recall_previous().map(str::to_string);
                self.show_recalled(entry);
            }
            ShellInput::Next => {
                let entry = self.history.recall_next().map(str::to_string);
                self.show_recalled(entry);
            }
            ShellInput::Again => match self.recalled.clone() {
                Some(text) => self.send(text).await,
                None => notice("Nothing recalled yet, use :prev or :next"),
            },
            ShellInput::Executed => {
                self.collect_executed();
                for (index, executed) in self.executed.iter().enumerate() {
                    notice(&format!("{:>3}  {}", index + 1, describe_executed(executed)));
                }
            }
            ShellInput::Rerun(index) => self.rerun(index).await,
            ShellInput::History => {
                for (index, entry) in self.history.entries().enumerate() {
                    notice(&format!("{:>3}  {entry}", index + 1));
                }
            }
            ShellInput::Help => notice(HELP),
            ShellInput::Quit => {
                self.shutdown().await;
                return Control::Quit;
            }
            ShellInput::Unknown(line) => notice(&format!("Unknown shell command `{line}`, try :help")),
        }

        Control::Continue
    }

    /// Kills the process if it is still running.
    pub async fn shutdown(&self) {
        if self.supervisor.is_running() {
            self.supervisor.kill().await;
        }
    }

    /// Sends free text as an ad-hoc console command so it shows up in the
    /// audit trail like catalog commands do.
    async fn send(&mut self, text: String) {
        if !self.supervisor.is_running() {
            notice("No process is running, use :switch to start one");
            return;
        }

        let adhoc = BasicCommand {
            name: text.clone(),
            description: String::new(),
            command: Command::console(text.clone()),
        };
        if let Err(e) = self.dispatcher.execute_basic(&adhoc).await {
            warn!("Sending `{}` failed: {}", text, e);
        }
        self.history.add(text);
    }

    async fn switch(&mut self, path: Option<String>) {
        if self.supervisor.is_running() {
            self.supervisor.kill().await;
            return;
        }

        let Some(path) = path
            .map(PathBuf::from)
            .or_else(|| self.supervisor.executable_path())
        else {
            notice("No executable set, use :switch PATH");
            return;
        };

        self.supervisor.switch(&path).await;
        if self.supervisor.is_running() {
            self.list();
        } else {
            notice(&format!("Could not start `{}`", path.display()));
        }
    }

    fn current_commands(&self) -> Option<&CommandSet> {
        let name = self.supervisor.process_name()?;
        self.catalog.commands_for(&name)
    }

    fn list(&self) {
        let Some(commands) = self.current_commands().filter(|commands| !commands.is_empty()) else {
            notice("No catalog commands for this process");
            return;
        };

        for runnable in commands.runnables() {
            notice(&describe_runnable(&runnable));
        }
    }

    async fn run(&self, name: &str) {
        let Some(runnable) = self
            .current_commands()
            .and_then(|commands| commands.find(name))
        else {
            notice(&format!("No catalog command named `{name}` for this process"));
            return;
        };

        if let Err(e) = self.dispatcher.execute(&runnable).await {
            warn!("Command `{}` stopped: {}", runnable, e);
            notice(&format!("{e}"));
        }
    }

    fn collect_executed(&mut self) {
        while let Ok(executed) = self.executed_feed.try_recv() {
            self.executed.push_back(executed);
            if self.executed.len() > EXECUTED_CAPACITY {
                self.executed.pop_front();
            }
        }
    }

    /// Runs an executed basic or macro command again. Single macro steps
    /// are listed but cannot be re-run on their own.
    async fn rerun(&mut self, index: usize) {
        self.collect_executed();

        let runnable = match index.checked_sub(1).and_then(|i| self.executed.get(i)) {
            Some(ExecutedCommand::Basic(basic)) => Runnable::Basic(basic.clone()),
            Some(ExecutedCommand::Macro(macro_command)) => Runnable::Macro(macro_command.clone()),
            Some(ExecutedCommand::Command(command)) => {
                notice(&format!("Entry {index} is a single step `{command}`, it cannot be re-run"));
                return;
            }
            None => {
                notice(&format!("No executed entry {index}, see :executed"));
                return;
            }
        };

        if !self.supervisor.is_running() {
            notice("No process is running, use :switch to start one");
            return;
        }

        if let Err(e) = self.dispatcher.execute(&runnable).await {
            warn!("Command `{}` stopped: {}", runnable, e);
            notice(&format!("{e}"));
        }
    }

    fn show_recalled(&mut self, entry: Option<String>) {
        match entry {
            Some(entry) => {
                notice(&entry);
                self.recalled = Some(entry);
            }
            None => notice("History is empty"),
        }
    }
}

fn notice(message: &str) {
    if let Err(e) = print_notice(message) {
        warn!("Failed to write to the terminal: {}", e);
    }
}

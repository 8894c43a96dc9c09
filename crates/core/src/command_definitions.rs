use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single instruction, either a line for the child's stdin or a system
/// meta-command.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Command {
    #[serde(rename = "type")]
    pub kind: String,
    pub query: String,
}

impl Command {
    pub fn new(kind: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            query: query.into(),
        }
    }

    pub fn console(query: impl Into<String>) -> Self {
        Self::new("console", query)
    }

    pub fn system(query: impl Into<String>) -> Self {
        Self::new("system", query)
    }

    #[must_use]
    pub fn classify(&self) -> CommandKind {
        CommandKind::classify(&self.kind)
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "[{}] {}", self.kind, self.query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Console,
    System,
    Unknown,
}

impl CommandKind {
    /// Classifies a command `type` field, ignoring case. Anything other than
    /// `console` or `system` is [`CommandKind::Unknown`].
    #[must_use]
    pub fn classify(kind: &str) -> Self {
        match kind.to_lowercase().as_str() {
            "console" => Self::Console,
            "system" => Self::System,
            _ => Self::Unknown,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BasicCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub command: Command,
}

impl Display for BasicCommand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MacroCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Display for MacroCommand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)
    }
}

/// Something the dispatcher can run: a named single command or a named
/// sequence of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runnable {
    Basic(BasicCommand),
    Macro(MacroCommand),
}

impl Runnable {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Runnable::Basic(basic) => &basic.name,
            Runnable::Macro(macro_command) => &macro_command.name,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Runnable::Basic(basic) => &basic.description,
            Runnable::Macro(macro_command) => &macro_command.description,
        }
    }
}

impl Display for Runnable {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl From<BasicCommand> for Runnable {
    fn from(value: BasicCommand) -> Self {
        Runnable::Basic(value)
    }
}

impl From<MacroCommand> for Runnable {
    fn from(value: MacroCommand) -> Self {
        Runnable::Macro(value)
    }
}

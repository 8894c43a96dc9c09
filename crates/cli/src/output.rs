//! Terminal rendering of process output, lifecycle notices and the audit trail.

use std::io::{stdout, Write};

use conwrap_core::command_definitions::Runnable;
use conwrap_core::events::{ExecutedCommand, OutputStream, ProcessEvent};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use itertools::Itertools;

/// Color used for a line of child output. Stdout keeps the terminal default.
#[must_use]
pub fn stream_color(stream: OutputStream) -> Option<Color> {
    match stream {
        OutputStream::Stdout => None,
        OutputStream::Stderr => Some(Color::Red),
    }
}

pub fn print_line(color: Option<Color>, line: &str) -> std::io::Result<()> {
    let mut stdout = stdout().lock();
    match color {
        Some(color) => queue!(
            stdout,
            SetForegroundColor(color),
            Print(line),
            ResetColor,
            Print("\n")
        )?,
        None => queue!(stdout, Print(line), Print("\n"))?,
    }
    stdout.flush()
}

pub fn print_notice(message: &str) -> std::io::Result<()> {
    print_line(Some(Color::DarkGrey), message)
}

pub fn print_process_event(event: &ProcessEvent) -> std::io::Result<()> {
    match event {
        ProcessEvent::Output { stream, line } => print_line(stream_color(*stream), line),
        ProcessEvent::Started => print_notice("-- process started"),
        ProcessEvent::Ended => print_notice("-- process ended"),
        ProcessEvent::Updating { .. } => Ok(()),
    }
}

/// Label shown in the audit trail for an executed unit.
#[must_use]
pub fn describe_executed(executed: &ExecutedCommand) -> String {
    match executed {
        ExecutedCommand::Basic(basic) => basic.name.clone(),
        ExecutedCommand::Macro(macro_command) => macro_command.name.clone(),
        ExecutedCommand::Command(command) => format!("  {command}"),
    }
}

/// One catalog entry as listed by `:list`.
#[must_use]
pub fn describe_runnable(runnable: &Runnable) -> String {
    let detail = match runnable {
        Runnable::Basic(basic) => basic.command.query.clone(),
        Runnable::Macro(macro_command) => macro_command
            .commands
            .iter()
            .map(|command| command.query.as_str())
            .join("; "),
    };

    if runnable.description().is_empty() {
        format!("{runnable} [{detail}]")
    } else {
        format!("{runnable} - {} [{detail}]", runnable.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conwrap_core::command_definitions::{BasicCommand, Command, MacroCommand};

    #[test]
    fn test_stream_color() {
        assert_eq!(stream_color(OutputStream::Stdout), None);
        assert_eq!(stream_color(OutputStream::Stderr), Some(Color::Red));
    }

    #[test]
    fn test_describe_executed() {
        let basic = BasicCommand {
            name: "status".to_string(),
            description: String::new(),
            command: Command::console("status"),
        };
        assert_eq!(describe_executed(&ExecutedCommand::Basic(basic)), "status");
        assert_eq!(
            describe_executed(&ExecutedCommand::Command(Command::system("kill"))),
            "  [system] kill"
        );
    }

    #[test]
    fn test_describe_runnable() {
        let restart = Runnable::Macro(MacroCommand {
            name: "restart".to_string(),
            description: "Stop and start".to_string(),
            commands: vec![Command::system("kill"), Command::system("start ./app")],
        });
        assert_eq!(
            describe_runnable(&restart),
            "restart - Stop and start [kill; start ./app]"
        );

        let status = Runnable::Basic(BasicCommand {
            name: "status".to_string(),
            description: String::new(),
            command: Command::console("status"),
        });
        assert_eq!(describe_runnable(&status), "status [status]");
    }
}

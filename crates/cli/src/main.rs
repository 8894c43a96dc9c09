use std::process::ExitCode;

use clap::Parser;
use conwrap_core::error::Result;
use conwrap_core::events::{ExecutedCommand, ProcessEvent};
use conwrap_core::{config, file_handling};
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use conwrap_cli::cli_args::Args;
use conwrap_cli::output::{describe_executed, print_notice, print_process_event};
use conwrap_cli::shell::{Control, Shell};

fn spawn_process_printer(mut events: UnboundedReceiver<ProcessEvent>) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = print_process_event(&event) {
                warn!("Failed to print process event: {}", e);
            }
        }
    });
}

fn spawn_audit_printer(mut executed: UnboundedReceiver<ExecutedCommand>) {
    tokio::spawn(async move {
        while let Some(command) = executed.recv().await {
            if let Err(e) = print_notice(&format!("> {}", describe_executed(&command))) {
                warn!("Failed to print executed command: {}", e);
            }
        }
    });
}

async fn execute() -> Result<()> {
    let args = Args::parse();

    let catalog_path = config::get_catalog_path(&args.catalog_path);
    debug!("Catalog path: `{}`", catalog_path);
    let catalog = file_handling::load_catalog(&catalog_path)?;

    let mut shell = Shell::new(catalog, args.history_size);
    spawn_process_printer(shell.supervisor().subscribe());
    spawn_audit_printer(shell.dispatcher().subscribe());

    if let Some(executable) = &args.executable {
        shell.supervisor().set_executable_path(executable);
        if args.start {
            shell.handle_line(":switch").await;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if shell.handle_line(&line).await == Control::Quit {
            return Ok(());
        }
    }

    // Input closed without :quit
    shell.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

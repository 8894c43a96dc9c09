//! Conwrap Core Library
//!
//! This crate supervises a single external child process and drives it through
//! a small command language: literal console lines written to the child's
//! stdin, and system commands (`wait`, `kill`, `start`) that control the
//! child's lifecycle.
//!
//! # Key Features
//!
//! - **Process Supervision**: Start, kill and switch one child with piped stdio
//! - **Output Streaming**: Line-oriented stdout/stderr delivered as events
//! - **Command Dispatch**: Basic and macro commands classified and executed in order
//! - **Command Catalog**: JSON catalog of named commands per application
//! - **History**: Bounded recall of free-text commands
//!
//! # Examples
//!
//! ```no_run
//! use conwrap_core::dispatcher::Dispatcher;
//! use conwrap_core::file_handling::load_catalog;
//! use conwrap_core::supervisor::Supervisor;
//!
//! # async fn run() -> conwrap_core::error::Result<()> {
//! let catalog = load_catalog("./command_setting.json")?;
//! let supervisor = Supervisor::new();
//! supervisor.set_executable_path("./server");
//! supervisor.start();
//!
//! let dispatcher = Dispatcher::with_supervisor(supervisor.clone());
//! if let Some(restart) = catalog
//!     .commands_for("server")
//!     .and_then(|commands| commands.find("restart"))
//! {
//!     dispatcher.execute(&restart).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod command_definitions;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod file_handling;
pub mod history;
pub mod supervisor;

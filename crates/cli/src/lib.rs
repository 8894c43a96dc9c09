//! Conwrap CLI Library
//!
//! This crate provides the terminal shell for conwrap: it supervises one
//! child process, prints its stdout and stderr as they arrive, and lets the
//! operator send input lines or run catalog commands against it.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`shell`]: Operator input parsing and handling
//! - [`output`]: Colored rendering of process output and the audit trail
//!
//! # Examples
//!
//! ```bash
//! # Supervise ./server, starting it right away
//! cw --start ./server
//!
//! # Use a specific catalog and a longer input history
//! cw -c ~/catalogs/server.json -n 20 ./server
//! ```

pub mod cli_args;
pub mod output;
pub mod shell;

//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate.

use clap::Parser;
use conwrap_core::config::DEFAULT_HISTORY_CAPACITY;

/// Command-line arguments for the `cw` process supervisor shell.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use conwrap_cli::cli_args::Args;
///
/// let args = Args::parse_from(["cw", "--start", "./server"]);
/// assert!(args.start);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the command catalog JSON.
    ///
    /// If not provided, defaults to `./command_setting.json`.
    #[arg(long, short = 'c')]
    pub catalog_path: Option<String>,

    /// Number of free-text commands kept for recall with `:prev` and `:next`.
    #[arg(long, short = 'n', default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_size: usize,

    /// Start the executable immediately instead of waiting for `:switch`.
    #[arg(long, short = 's', action)]
    pub start: bool,

    /// The executable to supervise.
    #[arg(num_args(1))]
    pub executable: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["cw"]);

        assert!(args.catalog_path.is_none());
        assert_eq!(args.history_size, DEFAULT_HISTORY_CAPACITY);
        assert!(!args.start);
        assert!(args.executable.is_none());
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["cw", "-c", "/custom/catalog.json", "-n", "10", "-s", "./app"]);

        assert_eq!(args.catalog_path, Some("/custom/catalog.json".to_string()));
        assert_eq!(args.history_size, 10);
        assert!(args.start);
        assert_eq!(args.executable, Some("./app".to_string()));
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "cw",
            "--catalog-path",
            "/custom/catalog.json",
            "--history-size",
            "3",
            "--start",
        ]);

        assert_eq!(args.catalog_path, Some("/custom/catalog.json".to_string()));
        assert_eq!(args.history_size, 3);
        assert!(args.start);
    }

    #[test]
    fn test_args_rejects_bad_history_size() {
        let result = Args::try_parse_from(["cw", "--history-size", "many"]);
        assert!(result.is_err());
    }
}

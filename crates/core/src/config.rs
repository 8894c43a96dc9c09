//! Configuration path utilities for conwrap.
//!
//! This module resolves the command catalog location and holds the defaults
//! shared by the supervisor shell.

/// Default path for the command catalog, relative to the working directory
const DEFAULT_CATALOG_PATH: &str = "./command_setting.json";

/// Default number of free-text commands remembered by the history
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Resolves the command catalog path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// catalog path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use conwrap_core::config::get_catalog_path;
///
/// let default_path = get_catalog_path(&None);
/// assert!(default_path.ends_with("command_setting.json"));
///
/// let custom_path = get_catalog_path(&Some("/path/to/catalog.json".to_string()));
/// assert_eq!(custom_path, "/path/to/catalog.json");
/// ```
pub fn get_catalog_path(catalog_path_arg: &Option<String>) -> String {
    let catalog_path = match catalog_path_arg {
        Some(catalog_path) => catalog_path,
        None => DEFAULT_CATALOG_PATH,
    };

    shellexpand::tilde(catalog_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_catalog_path_with_custom_path() {
        let custom_path = Some("/custom/path/catalog.json".to_string());
        assert_eq!(get_catalog_path(&custom_path), "/custom/path/catalog.json");
    }

    #[test]
    fn test_get_catalog_path_with_none() {
        assert_eq!(get_catalog_path(&None), DEFAULT_CATALOG_PATH);
    }

    #[test]
    fn test_get_catalog_path_with_tilde() {
        let tilde_path = Some("~/conwrap.json".to_string());
        let result = get_catalog_path(&tilde_path);
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("conwrap.json"));
    }

    #[test]
    fn test_default_history_capacity() {
        assert_eq!(DEFAULT_HISTORY_CAPACITY, 5);
    }
}

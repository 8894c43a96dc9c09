//! Loading of the JSON command catalog.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{info, warn};

use crate::catalog::{AppSetting, Catalog};
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// Parses a catalog document: a JSON array of application settings.
///
/// A `null` document is an empty catalog.
///
/// # Errors
///
/// Returns the JSON error when the document does not match the catalog shape.
pub fn parse_catalog(json: &str) -> serde_json::Result<Catalog> {
    let settings: Option<Vec<AppSetting>> = serde_json::from_str(json)?;
    Ok(Catalog::from_settings(settings.unwrap_or_default()))
}

/// Loads the command catalog from `catalog_path`.
///
/// A missing file is not an error: a warning is logged and an empty catalog
/// is returned, so supervision works without any catalog commands.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file is not valid JSON or does not match the catalog shape
///
/// # Examples
///
/// ```no_run
/// use conwrap_core::file_handling::load_catalog;
///
/// let catalog = load_catalog("./command_setting.json")?;
/// println!("Loaded commands for {} applications", catalog.len());
/// # Ok::<(), conwrap_core::error::Error>(())
/// ```
pub fn load_catalog(catalog_path: &str) -> Result<Catalog> {
    if !Path::new(catalog_path).exists() {
        warn!(
            "Command catalog `{}` does not exist, continuing without catalog commands",
            catalog_path
        );
        return Ok(Catalog::default());
    }

    let reader = BufReader::new(get_reader("catalog", catalog_path)?);
    let settings: Option<Vec<AppSetting>> = serde_json::from_reader(reader).map_err(|e| {
        Error::json_error(
            "reading".to_string(),
            "catalog".to_string(),
            catalog_path.to_string(),
            e,
        )
    })?;

    let catalog = Catalog::from_settings(settings.unwrap_or_default());
    info!(
        "Loaded command catalog `{}` with {} applications",
        catalog_path,
        catalog.len()
    );

    Ok(catalog)
}

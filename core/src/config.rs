//! Parser configuration.
//!
//! Controls the tunable parts of normalization and coercion. The defaults
//! reproduce the documented command-line conventions; a YAML file can
//! override any subset of fields.
//!
//! # Example YAML
//!
//! ```yaml
//! terminator: "--"
//! date_format: "%b-%d-%Y"
//! time_format: "%I:%M%p"
//! split_assignments: true
//! explode_short_flags: true
//! app_data_name: BOA-APP-DATA
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the reserved item that carries the application name.
pub const APP_DATA_NAME: &str = "BOA-APP-DATA";

/// Settings for the argument engine and the type coercion table.
///
/// # Examples
///
/// ```
/// use boa_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert_eq!(config.terminator, "--");
/// assert_eq!(config.date_format, "%b-%d-%Y");
/// assert!(config.explode_short_flags);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Token that ends a list value and selects an item's default.
    pub terminator: String,
    /// `chrono` format for date values.
    pub date_format: String,
    /// `chrono` format for clock-time values.
    pub time_format: String,
    /// Split `name=value` tokens at the first `=`.
    pub split_assignments: bool,
    /// Explode `-abc` into `-a -b -c`.
    pub explode_short_flags: bool,
    /// Reserved item name stripped from declarative tables.
    pub app_data_name: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            terminator: "--".to_string(),
            date_format: "%b-%d-%Y".to_string(),
            time_format: "%I:%M%p".to_string(),
            split_assignments: true,
            explode_short_flags: true,
            app_data_name: APP_DATA_NAME.to_string(),
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoadError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::LoadError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ParserConfig = serde_yaml::from_str("terminator: \";;\"\n").unwrap();
        assert_eq!(config.terminator, ";;");
        assert_eq!(config.time_format, "%I:%M%p");
        assert_eq!(config.app_data_name, APP_DATA_NAME);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boa.yaml");
        std::fs::write(&path, "explode_short_flags: false\n").unwrap();

        let config = ParserConfig::load(&path).unwrap();
        assert!(!config.explode_short_flags);
        assert!(config.split_assignments);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ParserConfig::load("/nonexistent/boa.yaml").unwrap_err();
        assert!(matches!(err, crate::LoadError::IoError(_)));
    }
}

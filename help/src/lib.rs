//! Command tables from help documents.
//!
//! This crate derives a boa [`CommandTable`](boa_core::CommandTable) from a
//! structured help document instead of a declarative table, then parses an
//! argument vector against it.
//!
//! # Main entry points
//!
//! - [`scan_help`]: scan a help document into a command table.
//! - [`from_help`]: scan, parse the arguments, validate requirements and
//!   fill the help map in one call.
//! - [`output`]: JSON, YAML and text rendering of results and tables.
//!
//! # Example
//!
//! ```
//! use boa_core::HelpKind;
//! use boa_help::from_help;
//!
//! let help = "\
//! Usage: greet [flags]
//!
//! Commands:
//! [name | -n] 1 : who to greet
//! Flags:
//! #[times] [1] : how many times
//! Long Description:
//! name: the name is printed
//!       after the greeting
//! ";
//!
//! let result = from_help(help, &["-n", "joe", "times", "2"]);
//! assert!(!result.has_errors(), "{}", result.errors_joined());
//! assert_eq!(result.application, "greet");
//! assert_eq!(result.string("name").as_deref(), Some("joe"));
//! assert_eq!(result.int("times"), Some(2));
//! assert_eq!(result.help("-n", HelpKind::Long), "the name is printed\nafter the greeting");
//! ```

pub mod output;
pub mod scanner;

use boa_core::{ParserConfig, ResultSet, parse_with_config};
use tracing::debug;

pub use scanner::{ScanState, ScannedHelp, scan_help};

/// Scans `text` and parses `args` against the resulting table.
///
/// A terminal scan error is returned as the only error of an otherwise
/// empty result set. Non-fatal scan warnings follow the argument errors.
pub fn from_help<S: AsRef<str>>(text: &str, args: &[S]) -> ResultSet {
    from_help_with_config(text, args, &ParserConfig::default())
}

/// Like [`from_help`] with an explicit configuration.
pub fn from_help_with_config<S: AsRef<str>>(
    text: &str,
    args: &[S],
    config: &ParserConfig,
) -> ResultSet {
    let scanned = match scan_help(text) {
        Ok(scanned) => scanned,
        Err(error) => {
            debug!(error = %error, "Help document rejected");
            return ResultSet::from_error(error);
        }
    };

    let mut result = parse_with_config(&scanned.table, args, config);
    result.application = scanned.app;
    result.errors.extend(scanned.warnings);
    result
}

#[cfg(test)]
mod tests {
    use boa_core::ParseError;

    use super::*;

    #[test]
    fn test_terminal_scan_error_is_sole_error() {
        let result = from_help("no usage here\n\nCommands:\n", &["anything"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code(), "malformed_usage_line");
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_scan_warnings_follow_argument_errors() {
        let help = "Usage: app\n\nCommands:\n[size] big : b\n";
        let result = from_help(help, &["--nope"]);

        let codes: Vec<&str> = result.errors.iter().map(ParseError::code).collect();
        assert_eq!(codes, vec!["unrecognized_item", "unrecognized_parameter"]);
    }
}

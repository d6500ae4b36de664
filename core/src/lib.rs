//! Declarative command-line parsing.
//!
//! This crate turns a raw argument vector into a typed, validated
//! [`ResultSet`], driven by a [`CommandTable`] of declared items:
//!
//! - [`Item`]: one command or flag with its name, alias, [`ValueType`], [`Arity`],
//!   default, help text and the required/exclusive/flag markers.
//! - [`CommandTable`]: the table of items, built by hand or loaded from a
//!   JSON/YAML document ([`CommandTable::from_json`]).
//! - [`engine`]: argument normalization and the consumption loop.
//! - [`coerce`]: conversion of raw tokens to typed [`Value`]s.
//! - [`validate_requirements`]: required-item and exclusivity checks.
//! - [`ResultSet`]: bound items, accumulated errors, help strings and
//!   typed accessors.
//!
//! Behaviour that can be tuned (list terminator, date/time formats,
//! normalization switches) lives in [`ParserConfig`].
//!
//! # Example
//!
//! ```
//! use boa_core::*;
//!
//! let table = CommandTable::from_items([
//!     Item::new("--name", ValueType::String, Arity::Fixed(1))
//!         .with_alias("-n")
//!         .with_short_help("who to greet")
//!         .required(),
//!     Item::new("--times", ValueType::Int, Arity::Optional(1))
//!         .with_default("1")
//!         .with_ordinal(1),
//!     Item::flag("--shout").with_alias("-s").with_ordinal(2),
//! ]);
//!
//! let result = parse(&table, &["-n=joe", "-s"]);
//! assert!(!result.has_errors(), "{}", result.errors_joined());
//! assert_eq!(result.string("--name").as_deref(), Some("joe"));
//! assert_eq!(result.bool("--shout"), Some(true));
//! assert_eq!(result.int("--times"), None);
//!
//! let result = parse(&table, &["--times", "x"]);
//! assert_eq!(result.errors.len(), 2);
//! ```

pub mod coerce;
mod config;
pub mod engine;
mod error;
mod help;
mod result;
mod table;
mod types;
mod validate;

pub use config::{APP_DATA_NAME, ParserConfig};
pub use error::{LoadError, ParseError, Result};
pub use help::{HelpKind, HelpTopic, format_help};
pub use result::ResultSet;
pub use table::{CommandTable, LoadedTable, TableDocument};
pub use types::*;
pub use validate::{ValidationError, validate_items, validate_requirements, validate_table};

/// Parses `args` against `table` with the default configuration.
pub fn parse<S: AsRef<str>>(table: &CommandTable, args: &[S]) -> ResultSet {
    parse_with_config(table, args, &ParserConfig::default())
}

/// Parses `args` against `table`: normalization, consumption, requirement
/// validation, and help strings for every table item.
pub fn parse_with_config<S: AsRef<str>>(
    table: &CommandTable,
    args: &[S],
    config: &ParserConfig,
) -> ResultSet {
    let mut result = engine::consume_all(table, args, config);
    validate_requirements(table, &mut result);
    result.fill_help(table);
    result
}

/// Loads a JSON command table and parses `args` against it.
///
/// The application name comes from the reserved `BOA-APP-DATA` item.
///
/// # Errors
///
/// Returns a [`LoadError`] when the document cannot be read as a valid
/// command table. Argument errors are reported in the result set instead.
///
/// # Examples
///
/// ```
/// let json = br#"{"commands": [
///     {"name": "BOA-APP-DATA", "alias": "mover"},
///     {"name": "--dest", "alias": "-d", "value_type": "string", "arity": 1, "required": true}
/// ]}"#;
///
/// let result = boa_core::from_json(json, &["-d", "/tmp"]).unwrap();
/// assert_eq!(result.application, "mover");
/// assert_eq!(result.string("--dest").as_deref(), Some("/tmp"));
/// ```
pub fn from_json<S: AsRef<str>>(json: &[u8], args: &[S]) -> Result<ResultSet> {
    from_json_with_config(json, args, &ParserConfig::default())
}

/// Like [`from_json`] with an explicit configuration.
pub fn from_json_with_config<S: AsRef<str>>(
    json: &[u8],
    args: &[S],
    config: &ParserConfig,
) -> Result<ResultSet> {
    let loaded = CommandTable::from_json_with(json, &config.app_data_name)?;
    Ok(parse_loaded(loaded, args, config))
}

/// Parses `args` against a loaded table, carrying over its application name.
pub fn parse_loaded<S: AsRef<str>>(
    loaded: LoadedTable,
    args: &[S],
    config: &ParserConfig,
) -> ResultSet {
    let mut result = parse_with_config(&loaded.table, args, config);
    result.application = loaded.app.unwrap_or_default();
    result
}

//! Error types for table loading, help scanning and argument parsing.
//!
//! [`ParseError`] covers both kinds of problem: input-shape errors from the
//! help scanner, which are terminal, and per-argument errors from the engine
//! and requirement validator, which accumulate in a
//! [`ResultSet`](crate::ResultSet).

use thiserror::Error;

use crate::ValueType;
use crate::validate::ValidationError;

/// Errors produced while scanning a help document or parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// First line is not `Usage: <app> ...`, or the document is too short.
    #[error("first line must be 'Usage: <app> ...' followed by a blank line: {detail}")]
    MalformedUsageLine { detail: String },

    /// Neither a `Commands:` nor a `Flags:` section marker was found.
    #[error("help document has no 'Commands:' or 'Flags:' section")]
    MissingSections,

    /// The `Flags:` marker appears before the `Commands:` marker.
    #[error("'Flags:' section must come after the 'Commands:' section")]
    FlagsBeforeCommands,

    /// A line consists of nothing but meta characters.
    #[error("line {line} only contains meta characters")]
    BadMetaLine { line: usize },

    /// A meta character appears inside the item name.
    #[error("line {line}: meta character string is not at the beginning of the line")]
    MetaNotAtStart { line: usize },

    /// No item name could be decoded from a line.
    #[error("line {line}: command or flag cannot be parsed")]
    NoCommandName { line: usize },

    /// A multi-value arity was declared for a type that has no list form.
    #[error("line {line}: {value_type} argument for {item} cannot take more than one value")]
    UnsupportedType {
        item: String,
        value_type: ValueType,
        line: usize,
    },

    /// The parameter field of a line is neither empty, `...`, `n` nor `[n]`.
    #[error("line {line}: unrecognized parameter '{text}' found after {item}")]
    UnrecognizedParameter {
        item: String,
        text: String,
        line: usize,
    },

    /// A token on the command line matches no item name or alias.
    #[error("{token}: command or flag passed on command line is not recognized")]
    UnrecognizedItem { token: String },

    /// An item that requires a value was given none.
    #[error("{value_type} argument for {item} not found")]
    MissingValue { item: String, value_type: ValueType },

    /// A token could not be coerced to the item's type.
    #[error("{token}, argument for {item}, cannot be interpreted as {}", article(.value_type))]
    InvalidValue {
        item: String,
        token: String,
        value_type: ValueType,
    },

    /// A required item was absent from the command line.
    #[error("item {item} is required but was not found")]
    MissingRequiredItem { item: String },

    /// Two exclusive items were both present.
    #[error("item {item} is exclusive but was found with {other}")]
    ExclusiveConflict { item: String, other: String },
}

impl ParseError {
    /// Stable snake_case identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedUsageLine { .. } => "malformed_usage_line",
            Self::MissingSections => "missing_sections",
            Self::FlagsBeforeCommands => "flags_before_commands",
            Self::BadMetaLine { .. } => "bad_meta_line",
            Self::MetaNotAtStart { .. } => "meta_not_at_start",
            Self::NoCommandName { .. } => "no_command_name",
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::UnrecognizedParameter { .. } => "unrecognized_parameter",
            Self::UnrecognizedItem { .. } => "unrecognized_item",
            Self::MissingValue { .. } => "required_value_missing",
            Self::InvalidValue { .. } => "kind_not_satisfiable",
            Self::MissingRequiredItem { .. } => "missing_required_item",
            Self::ExclusiveConflict { .. } => "exclusive_conflict",
        }
    }

    /// Returns `true` for input-shape errors that stop the help scanner.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::MalformedUsageLine { .. }
                | Self::MissingSections
                | Self::FlagsBeforeCommands
                | Self::BadMetaLine { .. }
                | Self::MetaNotAtStart { .. }
                | Self::NoCommandName { .. }
        )
    }
}

fn article(value_type: &ValueType) -> String {
    let label = value_type.label();
    let an = matches!(label.chars().next(), Some('A' | 'E' | 'I' | 'O' | 'U'));
    if an {
        format!("an {label}")
    } else {
        format!("a {label}")
    }
}

/// Errors that can occur while loading a declarative command table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document parsed but violates table invariants.
    #[error("invalid command table: {}", join_validation(.0))]
    InvalidTable(Vec<ValidationError>),
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message_names_token_and_item() {
        let err = ParseError::InvalidValue {
            item: "--count".to_string(),
            token: "abc".to_string(),
            value_type: ValueType::Int,
        };
        assert_eq!(
            err.to_string(),
            "abc, argument for --count, cannot be interpreted as an Integer"
        );
        assert_eq!(err.code(), "kind_not_satisfiable");
        assert!(!err.is_terminal());
    }

    #[test]
    fn test_scanner_shape_errors_are_terminal() {
        assert!(ParseError::MissingSections.is_terminal());
        assert!(ParseError::BadMetaLine { line: 3 }.is_terminal());
        assert!(
            !ParseError::UnrecognizedParameter {
                item: "foo".to_string(),
                text: "x".to_string(),
                line: 4,
            }
            .is_terminal()
        );
    }
}

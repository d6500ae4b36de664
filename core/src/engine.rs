//! Argument consumption engine.
//!
//! Turns a raw argument vector into bound items in two passes:
//!
//! 1. [`normalize_args`] splits `name=value` tokens and explodes clustered
//!    short flags (`-abc` becomes `-a -b -c`).
//! 2. [`consume_all`] walks the normalized tokens with a cursor, resolves
//!    each token against the [`CommandTable`], and lets [`consume_item`]
//!    decide how many following tokens belong to that item.
//!
//! Errors never stop the walk; they accumulate in the returned
//! [`ResultSet`] and the cursor always moves forward by at least one token.

use tracing::debug;

use crate::coerce::{coerce, coerce_list};
use crate::{CommandTable, Item, ParseError, ParserConfig, ResultSet, Value};

/// Outcome of consuming one item and its value tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumption {
    /// Tokens consumed, including the item token itself. Always at least 1.
    pub count: usize,
    /// The item copy with its value and seen child tokens bound.
    pub item: Item,
    pub error: Option<ParseError>,
}

impl Consumption {
    fn bound(count: usize, mut item: Item, value: Value) -> Self {
        item.value = Some(value);
        Self {
            count,
            item,
            error: None,
        }
    }

    fn unbound(count: usize, item: Item, error: Option<ParseError>) -> Self {
        Self { count, item, error }
    }

    fn from_result(count: usize, item: Item, result: Result<Value, ParseError>) -> Self {
        match result {
            Ok(value) => Self::bound(count, item, value),
            Err(error) => Self::unbound(count, item, Some(error)),
        }
    }
}

/// Normalizes a raw argument vector.
///
/// Every token containing `=` is split in two at the first `=`. Tokens with
/// exactly one leading dash and more than one character after it are
/// exploded into one dashed token per character. The pass is idempotent.
///
/// # Examples
///
/// ```
/// use boa_core::{engine::normalize_args, ParserConfig};
///
/// let config = ParserConfig::default();
/// assert_eq!(normalize_args(&["-abc"], &config), vec!["-a", "-b", "-c"]);
/// assert_eq!(normalize_args(&["--name=joe"], &config), vec!["--name", "joe"]);
/// assert_eq!(normalize_args(&["--", "plain"], &config), vec!["--", "plain"]);
/// ```
pub fn normalize_args<S: AsRef<str>>(args: &[S], config: &ParserConfig) -> Vec<String> {
    let mut normalized = Vec::with_capacity(args.len());

    for arg in args {
        let arg = arg.as_ref();
        let pieces = match arg.split_once('=') {
            Some((name, value)) if config.split_assignments => vec![name, value],
            _ => vec![arg],
        };

        for piece in pieces {
            if config.explode_short_flags && is_short_cluster(piece) {
                normalized.extend(piece.chars().skip(1).map(|ch| format!("-{ch}")));
            } else {
                normalized.push(piece.to_string());
            }
        }
    }

    debug!(before = args.len(), after = normalized.len(), "Normalized arguments");
    normalized
}

fn is_short_cluster(token: &str) -> bool {
    match token.strip_prefix('-') {
        Some(rest) => !rest.starts_with('-') && rest.chars().count() > 1,
        None => false,
    }
}

/// Runs normalization and the consumption loop, without requirement checks.
///
/// Every resolved item is inserted under its canonical name, even when its
/// value failed to bind. Unresolved tokens record an
/// [`UnrecognizedItem`](ParseError::UnrecognizedItem) error.
pub fn consume_all<S: AsRef<str>>(
    table: &CommandTable,
    args: &[S],
    config: &ParserConfig,
) -> ResultSet {
    let tokens = normalize_args(args, config);
    let mut result = ResultSet::new();
    let mut cursor = 0;

    while cursor < tokens.len() {
        let token = &tokens[cursor];
        let Some(template) = table.resolve(token) else {
            debug!(token = %token, cursor, "Unrecognized token");
            result.push_error(ParseError::UnrecognizedItem {
                token: token.clone(),
            });
            cursor += 1;
            continue;
        };

        let consumption = consume_item(template, &tokens[cursor..], config);
        debug!(
            item = %consumption.item.name,
            cursor,
            consumed = consumption.count,
            bound = consumption.item.value.is_some(),
            "Consumed item"
        );

        cursor += consumption.count.max(1);
        if let Some(error) = consumption.error {
            result.push_error(error);
        }
        result.insert(consumption.item);
    }

    result
}

/// Consumes one item starting at `tokens[0]`, which must be the item token.
///
/// Returns the number of tokens consumed along with a bound copy of
/// `template`. The template itself is never modified.
///
/// # Examples
///
/// ```
/// use boa_core::engine::consume_item;
/// use boa_core::{Arity, Item, ParserConfig, Value, ValueType};
///
/// let item = Item::new("X", ValueType::IntList, Arity::OneOrMore);
/// let tokens: Vec<String> = ["X", "1", "2", "3", "--", "Y"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// let consumed = consume_item(&item, &tokens, &ParserConfig::default());
/// assert_eq!(consumed.count, 5);
/// assert_eq!(
///     consumed.item.value,
///     Some(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
/// );
/// assert!(consumed.error.is_none());
/// ```
pub fn consume_item(template: &Item, tokens: &[String], config: &ParserConfig) -> Consumption {
    let mut item = template.clone();

    if item.is_presence_only() {
        item.value_type = crate::ValueType::Bool;
        return Consumption::bound(1, item, Value::Bool(true));
    }

    let mut pos = 1;
    if !item.child_tokens.is_empty() {
        let mut seen: Vec<&str> = Vec::new();
        while let Some(token) = tokens.get(pos) {
            if !item.child_tokens.iter().any(|child| child == token) {
                break;
            }
            if !seen.contains(&token.as_str()) {
                seen.push(token);
            }
            pos += 1;
        }
        item.child_tokens.retain(|child| seen.contains(&child.as_str()));
    }

    if item.value_type.is_list() || !item.arity.is_single() {
        if let Some(list_type) = item.value_type.to_list() {
            item.value_type = list_type;
        }
        consume_list(item, tokens, pos, config)
    } else {
        consume_scalar(item, tokens, pos, config)
    }
}

fn consume_scalar(item: Item, tokens: &[String], pos: usize, config: &ParserConfig) -> Consumption {
    match tokens.get(pos) {
        None => absent(item, pos, config),
        Some(token) if *token == config.terminator => {
            if item.default_value.is_empty() {
                if item.value_type == crate::ValueType::String {
                    return Consumption::bound(pos + 1, item, Value::Str(String::new()));
                }
                return Consumption::unbound(pos + 1, item, None);
            }
            let value = coerce(&item.name, item.value_type, &item.default_value, config);
            Consumption::from_result(pos + 1, item, value)
        }
        Some(token) => {
            let value = coerce(&item.name, item.value_type, token, config);
            Consumption::from_result(pos + 1, item, value)
        }
    }
}

fn consume_list(item: Item, tokens: &[String], pos: usize, config: &ParserConfig) -> Consumption {
    let rest = tokens.get(pos..).unwrap_or_default();
    let (values, count) = match rest.iter().position(|token| *token == config.terminator) {
        Some(end) => (&rest[..end], pos + end + 1),
        None => (rest, tokens.len()),
    };

    if values.is_empty() {
        if item.default_value.is_empty() && item.arity == crate::Arity::ZeroOrMore {
            return Consumption::bound(count, item, Value::List(Vec::new()));
        }
        let mut consumption = absent(item, pos, config);
        consumption.count = count;
        return consumption;
    }

    let value = coerce_list(&item.name, item.value_type, values, config);
    Consumption::from_result(count, item, value)
}

/// Default, then tolerated absence, then a missing-value error.
fn absent(item: Item, pos: usize, config: &ParserConfig) -> Consumption {
    if !item.default_value.is_empty() {
        let value = coerce(&item.name, item.value_type, &item.default_value, config);
        return Consumption::from_result(pos, item, value);
    }
    if item.tolerates_absence() {
        return Consumption::unbound(pos, item, None);
    }
    let error = ParseError::MissingValue {
        item: item.name.clone(),
        value_type: item.value_type,
    };
    Consumption::unbound(pos, item, Some(error))
}

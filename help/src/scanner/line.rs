//! Decoding of a single command or flag line.
//!
//! A line has the shape `<meta><name>[ | alias] <arity> : <short help>`,
//! where the name may be wrapped in brackets to mark it optional.

use std::sync::LazyLock;

use boa_core::{Arity, Item, ParseError, ValueType};
use regex::Regex;

/// Characters recognized in the meta prefix.
const META_CHARS: [char; 11] = ['*', '+', '#', '.', '!', '%', '^', '/', '\\', '@', '&'];

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\[\s*[\w-]+(?:\s*\|\s*[\w-]+)?\s*\]|[\w-]+(?:\s*\|\s*[\w-]+)?)")
        .expect("static regex must compile")
});

static OPTIONAL_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*(\d+)\s*\]$").expect("static regex must compile"));

/// Result of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLine {
    pub item: Item,
    /// Non-fatal problems found while decoding.
    pub warnings: Vec<ParseError>,
}

/// Decodes a trimmed, non-blank line into an item.
///
/// `index` is the zero-based line index, used as the item's ordinal;
/// errors report it one-based.
///
/// # Errors
///
/// Returns [`BadMetaLine`](ParseError::BadMetaLine),
/// [`MetaNotAtStart`](ParseError::MetaNotAtStart) or
/// [`NoCommandName`](ParseError::NoCommandName), all of which stop the scan.
pub fn decode_line(text: &str, index: usize, is_flag: bool) -> Result<DecodedLine, ParseError> {
    let line = index + 1;
    let mut item = Item {
        ordinal: index,
        flag: is_flag,
        ..Item::default()
    };

    let rest = decode_meta(text, line, &mut item)?;
    let rest = decode_name(rest, line, &mut item)?;

    let (field, short_help) = match rest.split_once(':') {
        Some((field, help)) => (field, help.trim_matches([' ', '\t', '\n'])),
        None => (rest, ""),
    };
    item.short_help = short_help.to_string();

    let mut warnings = Vec::new();
    if let Some(warning) = decode_arity(field.trim(), line, &mut item) {
        warnings.push(warning);
    }
    if let Some(warning) = promote_to_list(line, &mut item) {
        warnings.push(warning);
    }

    Ok(DecodedLine { item, warnings })
}

/// Applies the leading meta run and returns the text after it.
fn decode_meta<'a>(text: &'a str, line: usize, item: &mut Item) -> Result<&'a str, ParseError> {
    let rest = text.trim_start_matches(META_CHARS);
    if rest.trim().is_empty() {
        return Err(ParseError::BadMetaLine { line });
    }

    let first_token = rest
        .trim_start()
        .split(|ch: char| ch.is_whitespace() || matches!(ch, ':' | '|' | ']'))
        .next()
        .unwrap_or_default();
    if first_token.contains(META_CHARS) {
        return Err(ParseError::MetaNotAtStart { line });
    }

    let meta_run = &text[..text.len() - rest.len()];
    for ch in meta_run.chars() {
        match ch {
            '*' => item.exclusive = true,
            '+' => item.has_default = true,
            '#' => item.value_type = ValueType::Int,
            '.' => item.value_type = ValueType::Float,
            '!' => item.value_type = ValueType::Date,
            '%' => item.value_type = ValueType::Time,
            '^' => item.value_type = ValueType::Duration,
            '/' => item.value_type = ValueType::Path,
            '\\' => item.value_type = ValueType::Url,
            '@' => item.value_type = ValueType::Email,
            '&' => item.value_type = ValueType::Ipv4,
            _ => {}
        }
    }

    Ok(rest)
}

/// Reads the name and optional alias; brackets mark the item not required.
fn decode_name<'a>(text: &'a str, line: usize, item: &mut Item) -> Result<&'a str, ParseError> {
    let Some(caps) = NAME_RE.captures(text) else {
        return Err(ParseError::NoCommandName { line });
    };
    let Some(matched) = caps.get(1) else {
        return Err(ParseError::NoCommandName { line });
    };

    let raw = matched.as_str();
    let names = match raw.strip_prefix('[') {
        Some(inner) => inner.strip_suffix(']').unwrap_or(inner),
        None => {
            item.required = true;
            raw
        }
    };

    let mut parts = names.splitn(2, '|');
    item.name = parts.next().unwrap_or_default().trim().to_string();
    item.alias = parts
        .next()
        .map(|alias| alias.trim().to_string())
        .filter(|alias| !alias.is_empty());

    Ok(&text[matched.end()..])
}

/// Interprets the parameter field: empty, `...`, `[n]` or `n`.
///
/// Without a parameter the item is presence-only; it becomes a bool unless
/// the meta prefix gave it a type.
fn decode_arity(field: &str, line: usize, item: &mut Item) -> Option<ParseError> {
    if field.is_empty() {
        presence_only(item);
        return None;
    }
    if field == "..." {
        item.arity = Arity::OneOrMore;
        return None;
    }
    if let Some(count) = OPTIONAL_COUNT_RE
        .captures(field)
        .and_then(|caps| caps.get(1))
        .and_then(|count| count.as_str().parse::<u32>().ok())
    {
        item.arity = Arity::Optional(count);
        item.optional_param = true;
        return None;
    }
    if let Ok(count) = field.parse::<u32>() {
        item.arity = Arity::Fixed(count);
        return None;
    }

    presence_only(item);
    Some(ParseError::UnrecognizedParameter {
        item: item.name.clone(),
        text: field.to_string(),
        line,
    })
}

fn presence_only(item: &mut Item) {
    item.arity = Arity::Fixed(0);
    if item.value_type == ValueType::String {
        item.value_type = ValueType::Bool;
    }
}

/// Switches multi-value items to the list form of their type.
pub(crate) fn promote_to_list(line: usize, item: &mut Item) -> Option<ParseError> {
    if item.arity.is_single() {
        return None;
    }
    match item.value_type.to_list() {
        Some(list_type) => {
            item.value_type = list_type;
            None
        }
        None => Some(ParseError::UnsupportedType {
            item: item.name.clone(),
            value_type: item.value_type,
            line,
        }),
    }
}

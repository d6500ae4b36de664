//! Help text formatting.

use serde::Serialize;

use crate::Item;

/// Header width the short help is aligned to.
const HELP_COLUMN: usize = 16;
/// Headers longer than this get a fixed gap instead of alignment.
const WIDE_HEADER: usize = 12;
const WIDE_GAP: usize = 4;

/// Which part of an item's help to return from
/// [`ResultSet::help`](crate::ResultSet::help).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HelpKind {
    Short,
    Long,
    #[default]
    Combined,
}

/// Help strings for one item of the command table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HelpTopic {
    pub ordinal: usize,
    pub alias: Option<String>,
    pub short: String,
    pub long: String,
    pub combined: String,
}

impl HelpTopic {
    pub fn from_item(item: &Item) -> Self {
        Self {
            ordinal: item.ordinal,
            alias: item.alias.clone(),
            short: item.short_help.clone(),
            long: item.long_help.clone(),
            combined: format_help(
                &item.name,
                item.alias.as_deref(),
                &item.short_help,
                &item.long_help,
            ),
        }
    }
}

/// Combines an item's short and long help into one display string.
///
/// The `name | alias` header is padded to column 16, or followed by four
/// spaces when it is longer than 12 characters. A leading `name:` is
/// stripped from the short help and from every long help line.
///
/// # Examples
///
/// ```
/// use boa_core::format_help;
///
/// assert_eq!(
///     format_help("--count", Some("-c"), "how many", ""),
///     "--count | -c    how many\n"
/// );
/// assert_eq!(
///     format_help("--recursive", Some("-r"), "descend", "--recursive: into dirs\n  and links"),
///     "--recursive | -r    descend\ninto dirs\nand links"
/// );
/// ```
pub fn format_help(name: &str, alias: Option<&str>, short: &str, long: &str) -> String {
    let name = name.trim_matches([' ', '\t']);
    let short = strip_name_prefix(short.trim_matches([' ', '\t', '\n']), name);
    let short = short.trim_matches([' ', '\t', '\n']);

    let header = match alias.filter(|alias| !alias.is_empty()) {
        Some(alias) => format!("{name} | {alias}"),
        None => name.to_string(),
    };
    let width = header.chars().count();
    let gap = if width > WIDE_HEADER {
        WIDE_GAP
    } else {
        HELP_COLUMN - width
    };

    let mut help = format!("{header}{}{short}\n", " ".repeat(gap));
    if long.is_empty() {
        return help;
    }

    let lines: Vec<&str> = long
        .split('\n')
        .map(|line| {
            strip_name_prefix(line.trim_matches([' ', '\t']), name).trim_matches([' ', '\t'])
        })
        .collect();
    help.push_str(&lines.join("\n"));
    help
}

/// Strips `name:` (blanks allowed before the colon) and then a bare colon.
fn strip_name_prefix<'a>(text: &'a str, name: &str) -> &'a str {
    let text = match text.strip_prefix(name) {
        Some(rest) if rest.trim_start_matches([' ', '\t']).starts_with(':') => {
            rest.trim_start_matches([' ', '\t'])
        }
        _ => text,
    };
    text.strip_prefix(':').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arity, ValueType};

    #[test]
    fn test_short_header_is_padded_to_column() {
        let help = format_help("foo", None, "does a foo", "");
        assert_eq!(help, format!("foo{}does a foo\n", " ".repeat(13)));
    }

    #[test]
    fn test_short_help_name_prefix_is_stripped() {
        let help = format_help("foo", None, "foo: does a foo", "");
        assert!(help.ends_with("does a foo\n"));
        assert!(!help.contains("foo:"));
    }

    #[test]
    fn test_long_lines_starting_with_name_text_are_kept() {
        let help = format_help("send", None, "sends", "send: sends now\nsender gets a copy");
        assert_eq!(help, format!("send{}sends\nsends now\nsender gets a copy", " ".repeat(12)));
    }

    #[test]
    fn test_topic_from_item_carries_combined_help() {
        let item = Item::new("--level", ValueType::Int, Arity::Fixed(1))
            .with_alias("-l")
            .with_short_help("log level")
            .with_ordinal(4);
        let topic = HelpTopic::from_item(&item);
        assert_eq!(topic.ordinal, 4);
        assert_eq!(topic.combined, "--level | -l    log level\n");
    }
}

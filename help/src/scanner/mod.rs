//! Help-document scanner.
//!
//! A help document is free text with a fixed section grammar:
//!
//! ```text
//! Usage: <app> ...
//!
//! Commands:
//! <meta><name>[ | alias] <arity> : <short help>
//! Flags:
//! <meta><name>[ | alias] <arity> : <short help>
//! Long Description:
//! <name>: <long help>
//!         <more long help>
//!
//! More:
//! ...
//! ```
//!
//! The scanner is a small state machine ([`ScanState`]). The usage state
//! checks the first line and records the application name; the item state
//! decodes every line between the opening section marker and the first
//! long-description or more marker into an [`Item`](boa_core::Item).

mod line;
mod long;
mod sections;

use std::sync::LazyLock;

use boa_core::{CommandTable, ParseError};
use regex::Regex;
use tracing::{debug, warn};

pub use line::{DecodedLine, decode_line};
pub use long::long_description;
pub use sections::SectionLimits;

static USAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Uu]sage: ").expect("static regex must compile"));

/// Minimum number of lines: usage, blank, and a section marker.
const MIN_LINES: usize = 3;

/// States of the help scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Usage,
    CommandsAndFlags,
    Done,
}

/// Command table derived from a help document.
#[derive(Debug, Clone, Default)]
pub struct ScannedHelp {
    pub app: String,
    pub table: CommandTable,
    /// Non-fatal problems, in line order.
    pub warnings: Vec<ParseError>,
}

/// Scans a help document into a command table.
///
/// # Errors
///
/// Returns the first input-shape error; see [`ParseError::is_terminal`].
///
/// # Examples
///
/// ```
/// use boa_core::{Arity, ValueType};
/// use boa_help::scan_help;
///
/// let scanned = scan_help("Usage: app\n\nCommands:\nfoo : does a foo\n").unwrap();
/// assert_eq!(scanned.app, "app");
/// assert_eq!(scanned.table.len(), 1);
///
/// let foo = scanned.table.get("foo").unwrap();
/// assert_eq!(foo.arity, Arity::Fixed(0));
/// assert_eq!(foo.value_type, ValueType::Bool);
/// assert_eq!(foo.short_help, "does a foo");
/// ```
pub fn scan_help(text: &str) -> Result<ScannedHelp, ParseError> {
    HelpScanner::new(text).run()
}

struct HelpScanner<'a> {
    lines: Vec<&'a str>,
    limits: SectionLimits,
    scanned: ScannedHelp,
}

impl<'a> HelpScanner<'a> {
    fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let limits = SectionLimits::locate(&lines);
        Self {
            lines,
            limits,
            scanned: ScannedHelp::default(),
        }
    }

    fn run(mut self) -> Result<ScannedHelp, ParseError> {
        let mut state = ScanState::Usage;
        loop {
            state = match state {
                ScanState::Usage => self.scan_usage()?,
                ScanState::CommandsAndFlags => self.scan_items()?,
                ScanState::Done => break,
            };
        }
        Ok(self.scanned)
    }

    fn scan_usage(&mut self) -> Result<ScanState, ParseError> {
        let first = self.lines.first().copied().unwrap_or_default();
        if !USAGE_LINE.is_match(first) {
            return Err(malformed("first line does not start with 'Usage: '"));
        }
        let Some(app) = first.split_whitespace().nth(1) else {
            return Err(malformed("usage line has no application name"));
        };
        if self.lines.len() < MIN_LINES {
            return Err(malformed("document ends after the usage line"));
        }

        self.scanned.app = app.to_string();
        debug!(app = %app, limits = ?self.limits, "Scanned usage line");
        Ok(ScanState::CommandsAndFlags)
    }

    fn scan_items(&mut self) -> Result<ScanState, ParseError> {
        let Some(start) = self.limits.item_start() else {
            return Err(ParseError::MissingSections);
        };
        if let (Some(commands), Some(flags)) = (self.limits.commands, self.limits.flags) {
            if flags < commands {
                return Err(ParseError::FlagsBeforeCommands);
            }
        }

        let end = self.limits.item_end(start, self.lines.len());
        debug!(start, end, "Decoding command and flag lines");

        for index in start..end {
            if Some(index) == self.limits.flags {
                continue;
            }
            let text = self.lines[index].trim_matches([' ', '\t']);
            if text.is_empty() {
                continue;
            }

            let DecodedLine { mut item, warnings } =
                decode_line(text, index, self.limits.is_flag_line(index))?;
            for warning in &warnings {
                warn!(line = index + 1, "{warning}");
            }
            self.scanned.warnings.extend(warnings);

            item.long_help = long_description(&self.lines, &self.limits, &item.name);
            if let Some(previous) = self.scanned.table.insert(item) {
                debug!(item = %previous.name, "Later line replaces earlier item");
            }
        }

        Ok(ScanState::Done)
    }
}

fn malformed(detail: &str) -> ParseError {
    ParseError::MalformedUsageLine {
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use boa_core::ValueType;

    use super::*;

    #[test]
    fn test_usage_must_be_at_column_zero() {
        let err = scan_help("  Usage: app\n\nCommands:\nfoo : x\n").unwrap_err();
        assert_eq!(err.code(), "malformed_usage_line");
    }

    #[test]
    fn test_lowercase_usage_is_accepted() {
        let scanned = scan_help("usage: tool [flags]\n\nFlags:\n-v : verbose\n").unwrap();
        assert_eq!(scanned.app, "tool");
        assert!(scanned.table.get("-v").is_some_and(|item| item.flag));
    }

    #[test]
    fn test_too_short_document_is_rejected() {
        let err = scan_help("Usage: app\n\n").unwrap_err();
        assert_eq!(err.code(), "malformed_usage_line");
    }

    #[test]
    fn test_missing_sections_is_terminal() {
        let err = scan_help("Usage: app\n\nfoo : x\n").unwrap_err();
        assert_eq!(err, ParseError::MissingSections);
        assert!(err.is_terminal());
    }

    #[test]
    fn test_flags_before_commands_is_rejected() {
        let err = scan_help("Usage: app\n\nFlags:\n-v : v\nCommands:\nrun : r\n").unwrap_err();
        assert_eq!(err, ParseError::FlagsBeforeCommands);
    }

    #[test]
    fn test_flag_section_marks_items_as_flags() {
        let doc = "Usage: app\n\nCommands:\nrun 1 : run a file\n\nFlags:\n#*count : counts things\n";
        let scanned = scan_help(doc).unwrap();

        let run = scanned.table.get("run").unwrap();
        assert!(!run.flag);
        assert_eq!(run.ordinal, 3);

        let count = scanned.table.get("count").unwrap();
        assert_eq!(count.value_type, ValueType::Int);
        assert!(count.exclusive);
        assert!(count.flag);
    }

    #[test]
    fn test_terminal_line_error_stops_scan() {
        let doc = "Usage: app\n\nCommands:\nrun : r\n*** \nlater : l\n";
        let err = scan_help(doc).unwrap_err();
        assert_eq!(err, ParseError::BadMetaLine { line: 5 });
    }

    #[test]
    fn test_warnings_do_not_stop_scan() {
        let doc = "Usage: app\n\nCommands:\nsize big : b\nlater : l\n";
        let scanned = scan_help(doc).unwrap();
        assert_eq!(scanned.warnings.len(), 1);
        assert!(scanned.table.contains("later"));
    }
}

//! Section marker detection for help documents.

use std::sync::LazyLock;

use regex::Regex;

static COMMANDS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Commands[\t ]*:").expect("static regex must compile"));
static FLAGS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Flags[\t ]*:").expect("static regex must compile"));
static LONG_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Long Description[\t ]*:").expect("static regex must compile"));
static MORE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^More[\t ]*:").expect("static regex must compile"));

/// Line indices of the first occurrence of each section marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionLimits {
    pub commands: Option<usize>,
    pub flags: Option<usize>,
    pub long: Option<usize>,
    pub more: Option<usize>,
}

impl SectionLimits {
    /// Records the first line matching each marker.
    pub fn locate(lines: &[&str]) -> Self {
        Self {
            commands: first_match(lines, &COMMANDS_MARKER),
            flags: first_match(lines, &FLAGS_MARKER),
            long: first_match(lines, &LONG_MARKER),
            more: first_match(lines, &MORE_MARKER),
        }
    }

    /// First line after the opening section marker.
    pub fn item_start(&self) -> Option<usize> {
        match (self.commands, self.flags) {
            (Some(commands), _) => Some(commands + 1),
            (None, Some(flags)) => Some(flags + 1),
            (None, None) => None,
        }
    }

    /// End (exclusive) of the item region: the first long-description or
    /// more marker after `start`, else the end of the document.
    pub fn item_end(&self, start: usize, line_count: usize) -> usize {
        [self.long, self.more]
            .into_iter()
            .flatten()
            .filter(|&marker| marker >= start)
            .min()
            .unwrap_or(line_count)
    }

    /// End (exclusive) of the long-description region.
    pub fn long_end(&self, line_count: usize) -> usize {
        match (self.long, self.more) {
            (Some(long), Some(more)) if more > long => more,
            _ => line_count,
        }
    }

    /// Returns `true` when line `index` lies in the flags section.
    pub fn is_flag_line(&self, index: usize) -> bool {
        self.flags.is_some_and(|flags| index > flags)
    }
}

fn first_match(lines: &[&str], marker: &Regex) -> Option<usize> {
    lines.iter().position(|line| marker.is_match(line))
}

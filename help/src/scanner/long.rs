//! Long description lookup.

use super::sections::SectionLimits;

/// Returns the long description block for `name`, or an empty string.
///
/// The block starts at the first line after the long-description marker
/// that begins with `name` followed by a colon, and runs to the next blank
/// line. The `name:` prefix is stripped from every line.
pub fn long_description(lines: &[&str], limits: &SectionLimits, name: &str) -> String {
    let Some(marker) = limits.long else {
        return String::new();
    };
    if name.is_empty() {
        return String::new();
    }

    let end = limits.long_end(lines.len()).min(lines.len());
    let region = lines.get(marker + 1..end).unwrap_or_default();
    let Some(start) = region.iter().position(|line| opens_block(line, name)) else {
        return String::new();
    };

    region[start..]
        .iter()
        .take_while(|line| !line.trim_matches([' ', '\t']).is_empty())
        .map(|line| strip_prefix(line, name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn opens_block(line: &str, name: &str) -> bool {
    line.strip_prefix(name)
        .is_some_and(|rest| rest.trim_start_matches([' ', '\t']).starts_with(':'))
}

fn strip_prefix<'a>(line: &'a str, name: &str) -> &'a str {
    let line = if opens_block(line, name) {
        &line[name.len()..]
    } else {
        line
    };
    line.trim_matches([' ', '\t'])
        .trim_matches(':')
        .trim_matches([' ', '\t'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: [&str; 12] = [
        "Usage: app",
        "",
        "Commands:",
        "run : runs it",
        "Long Description:",
        "walk: not the one",
        "run : first line",
        "  continues here",
        "",
        "run: a later block",
        "More:",
        "run: after more",
    ];

    #[test]
    fn test_block_runs_to_blank_line() {
        let limits = SectionLimits::locate(&DOC);
        assert_eq!(
            long_description(&DOC, &limits, "run"),
            "first line\ncontinues here"
        );
    }

    #[test]
    fn test_unknown_name_and_missing_marker_give_empty_text() {
        let limits = SectionLimits::locate(&DOC);
        assert_eq!(long_description(&DOC, &limits, "jump"), "");

        let no_long = SectionLimits {
            long: None,
            ..limits
        };
        assert_eq!(long_description(&DOC, &no_long, "run"), "");
    }

    #[test]
    fn test_lookup_stops_at_more_marker() {
        let doc = ["Usage: app", "", "Commands:", "go : goes", "Long Description:", "More:", "go: hidden"];
        let limits = SectionLimits::locate(&doc);
        assert_eq!(long_description(&doc, &limits, "go"), "");
    }

    #[test]
    fn test_name_must_be_followed_by_colon() {
        let doc = ["Usage: app", "", "Commands:", "run : r", "Long Description:", "runner: no", "run: yes"];
        let limits = SectionLimits::locate(&doc);
        assert_eq!(long_description(&doc, &limits, "run"), "yes");
    }
}

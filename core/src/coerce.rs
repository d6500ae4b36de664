//! Type coercion table.
//!
//! Converts raw command-line tokens into typed [`Value`]s according to an
//! item's [`ValueType`]. Every failure is a
//! [`ParseError::InvalidValue`] naming the offending token and the item.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use regex::Regex;
use url::Url;

use crate::{EmailAddress, ParseError, ParserConfig, Value, ValueType};

// SAFETY: These regexes are compile-time constants and are validated by tests.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:\(?(?:00|\+)([1-4]\d\d|[1-9]\d?)\)?)?[-. \\/]?)?((?:\(?\d+\)?[-. \\/]?)*)(?:[-. \\/]?(?:#|ext\.?|extension|x)[-. \\/]?(\d+))?$",
    )
    .expect("static regex must compile")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:ns|us|µs|μs|ms|s|m|h))+$")
        .expect("static regex must compile")
});

static DURATION_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+\.?[0-9]*|\.[0-9]+)(ns|us|µs|μs|ms|s|m|h)")
        .expect("static regex must compile")
});

const ATOM: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+";
const QUOTED: &str = r#""(?:[^"\\]|\\.)*""#;

static ADDR_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    let dot_atom = format!(r"{ATOM}(?:\.{ATOM})*");
    let pattern = format!(r"^(?:{dot_atom}|{QUOTED})@(?:{dot_atom}|\[[^\[\]\\]*\])$");
    Regex::new(&pattern).expect("static regex must compile")
});

static NAME_ADDR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:"((?:[^"\\]|\\.)*)"|([^<>"]*?))\s*<([^<>]+)>\s*$"#)
        .expect("static regex must compile")
});

/// Coerces one token to the scalar form of `value_type`.
///
/// # Examples
///
/// ```
/// use boa_core::{coerce::coerce_scalar, ParserConfig, Value, ValueType};
///
/// let config = ParserConfig::default();
/// let value = coerce_scalar("--count", ValueType::Int, "42", &config).unwrap();
/// assert_eq!(value, Value::Int(42));
///
/// let err = coerce_scalar("--count", ValueType::Int, "4x2", &config).unwrap_err();
/// assert_eq!(err.code(), "kind_not_satisfiable");
/// ```
pub fn coerce_scalar(
    item: &str,
    value_type: ValueType,
    token: &str,
    config: &ParserConfig,
) -> Result<Value, ParseError> {
    let invalid = || ParseError::InvalidValue {
        item: item.to_string(),
        token: token.to_string(),
        value_type,
    };

    let value = match value_type.scalar() {
        ValueType::Bool => Value::Bool(token.parse().map_err(|_| invalid())?),
        ValueType::Int => Value::Int(token.parse().map_err(|_| invalid())?),
        ValueType::Float => Value::Float(token.parse().map_err(|_| invalid())?),
        ValueType::Time => Value::Time(
            NaiveTime::parse_from_str(token, &config.time_format).map_err(|_| invalid())?,
        ),
        ValueType::Date => Value::Date(
            NaiveDate::parse_from_str(token, &config.date_format).map_err(|_| invalid())?,
        ),
        ValueType::Duration => Value::Duration(parse_duration(token).ok_or_else(invalid)?),
        ValueType::Path => Value::Path(expand_path(token).ok_or_else(invalid)?),
        ValueType::Url => Value::Url(Url::parse(token).map_err(|_| invalid())?),
        ValueType::Ipv4 => Value::Ipv4(token.parse::<Ipv4Addr>().map_err(|_| invalid())?),
        ValueType::Email => Value::Email(parse_email(token).ok_or_else(invalid)?),
        ValueType::Phone if is_phone_number(token) => Value::Phone(token.to_string()),
        ValueType::Phone => return Err(invalid()),
        _ => Value::Str(token.to_string()),
    };

    Ok(value)
}

/// Coerces every token to the scalar form of `value_type`.
///
/// Fails on the first token that cannot be coerced; no partial list is
/// returned.
pub fn coerce_list(
    item: &str,
    value_type: ValueType,
    tokens: &[String],
    config: &ParserConfig,
) -> Result<Value, ParseError> {
    tokens
        .iter()
        .map(|token| coerce_scalar(item, value_type, token, config))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

/// Coerces one token according to whether `value_type` is a list form.
pub fn coerce(
    item: &str,
    value_type: ValueType,
    token: &str,
    config: &ParserConfig,
) -> Result<Value, ParseError> {
    let value = coerce_scalar(item, value_type, token, config)?;
    if value_type.is_list() {
        Ok(Value::List(vec![value]))
    } else {
        Ok(value)
    }
}

/// Parses a signed decimal-plus-unit duration such as `2h45m`, `-1.5h` or
/// `300ms`. A bare `0` is accepted.
///
/// # Examples
///
/// ```
/// use boa_core::coerce::parse_duration;
/// use chrono::TimeDelta;
///
/// assert_eq!(parse_duration("2h45m"), Some(TimeDelta::minutes(165)));
/// assert_eq!(parse_duration("-1.5s"), Some(TimeDelta::milliseconds(-1500)));
/// assert_eq!(parse_duration("10"), None);
/// ```
pub fn parse_duration(raw: &str) -> Option<TimeDelta> {
    if matches!(raw, "0" | "+0" | "-0") {
        return Some(TimeDelta::zero());
    }
    if !DURATION_RE.is_match(raw) {
        return None;
    }

    let negative = raw.starts_with('-');
    let mut total: i128 = 0;
    for caps in DURATION_SEGMENT_RE.captures_iter(raw) {
        let unit = match &caps[2] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            _ => 3_600 * 1_000_000_000,
        };
        total = total.checked_add(segment_nanos(&caps[1], unit)?)?;
    }

    let nanos = i64::try_from(if negative { -total } else { total }).ok()?;
    Some(TimeDelta::nanoseconds(nanos))
}

fn segment_nanos(number: &str, unit: i128) -> Option<i128> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit)?;

    // Precision past 18 digits cannot change the nanosecond count.
    let frac = frac
        .char_indices()
        .nth(18)
        .map_or(frac, |(end, _)| &frac[..end]);
    if !frac.is_empty() {
        let digits: i128 = frac.parse().ok()?;
        let scale = 10_i128.pow(u32::try_from(frac.len()).ok()?);
        nanos = nanos.checked_add(digits * unit / scale)?;
    }
    Some(nanos)
}

/// Parses an RFC 5322 mailbox: either `local@domain` or
/// `Display Name <local@domain>`.
///
/// # Examples
///
/// ```
/// use boa_core::coerce::parse_email;
///
/// let mailbox = parse_email("Barry Gibbs <bg@example.com>").unwrap();
/// assert_eq!(mailbox.name.as_deref(), Some("Barry Gibbs"));
/// assert_eq!(mailbox.address, "bg@example.com");
/// assert!(parse_email("not-an-address").is_none());
/// ```
pub fn parse_email(raw: &str) -> Option<EmailAddress> {
    let trimmed = raw.trim();
    if ADDR_SPEC_RE.is_match(trimmed) {
        return Some(EmailAddress {
            name: None,
            address: trimmed.to_string(),
        });
    }

    let caps = NAME_ADDR_RE.captures(trimmed)?;
    let address = caps.get(3)?.as_str().trim();
    if !ADDR_SPEC_RE.is_match(address) {
        return None;
    }
    let name = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty());

    Some(EmailAddress {
        name,
        address: address.to_string(),
    })
}

/// Validates a phone number against a permissive international pattern
/// (optional country code, grouped digits, optional extension).
pub fn is_phone_number(raw: &str) -> bool {
    raw.chars().any(|ch| ch.is_ascii_digit()) && PHONE_RE.is_match(raw)
}

/// Expands a leading `~`, then makes the path absolute.
fn expand_path(raw: &str) -> Option<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    std::path::absolute(Path::new(expanded.as_ref())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn test_numeric_failures_name_token_and_item() {
        for (value_type, token) in [
            (ValueType::Int, "12.5"),
            (ValueType::Int, "ten"),
            (ValueType::Float, "1.2.3"),
            (ValueType::IntList, "0x10"),
        ] {
            let err = coerce_scalar("--n", value_type, token, &config()).unwrap_err();
            match err {
                ParseError::InvalidValue { item, token: bad, .. } => {
                    assert_eq!(item, "--n");
                    assert_eq!(bad, token);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_temporal_formats() {
        let date = coerce_scalar("d", ValueType::Date, "Jan-02-2006", &config()).unwrap();
        assert_eq!(
            date,
            Value::Date(NaiveDate::from_ymd_opt(2006, 1, 2).unwrap())
        );

        let time = coerce_scalar("t", ValueType::Time, "3:04PM", &config()).unwrap();
        assert_eq!(
            time,
            Value::Time(NaiveTime::from_hms_opt(15, 4, 0).unwrap())
        );

        assert!(coerce_scalar("d", ValueType::Date, "2006-01-02", &config()).is_err());
        assert!(coerce_scalar("t", ValueType::Time, "15:04", &config()).is_err());
    }

    #[test]
    fn test_duration_grammar() {
        assert_eq!(parse_duration("1h10m20s"), Some(TimeDelta::seconds(4220)));
        assert_eq!(parse_duration("300ms"), Some(TimeDelta::milliseconds(300)));
        assert_eq!(parse_duration("1.5us"), Some(TimeDelta::nanoseconds(1500)));
        assert_eq!(parse_duration("0"), Some(TimeDelta::zero()));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration("5 minutes"), None);
    }

    #[test]
    fn test_duration_rejects_non_ascii_digits() {
        assert_eq!(parse_duration("1.1١١١١١١١١١h"), None);
        assert_eq!(parse_duration("٣s"), None);

        let err = coerce_scalar("--wait", ValueType::Duration, "1.1١١١١١١١١١h", &config())
            .unwrap_err();
        assert_eq!(err.code(), "kind_not_satisfiable");
    }

    #[test]
    fn test_duration_fraction_beyond_nanoseconds_is_truncated() {
        assert_eq!(
            parse_duration("1.12345678912345678912345s"),
            Some(TimeDelta::nanoseconds(1_123_456_789))
        );
    }

    #[test]
    fn test_phone_numbers() {
        assert!(is_phone_number("+44 20 7946 0958"));
        assert!(is_phone_number("(555) 123-4567 ext. 89"));
        assert!(is_phone_number("555.123.4567"));
        assert!(!is_phone_number("call me"));
        assert!(!is_phone_number(""));
    }

    #[test]
    fn test_email_forms() {
        assert_eq!(
            parse_email("jo@example.com").unwrap().address,
            "jo@example.com"
        );
        assert!(parse_email("\"Jo Smith\" <jo@example.com>").is_some());
        assert!(parse_email("jo@").is_none());
        assert!(parse_email("<>").is_none());
    }

    #[test]
    fn test_url_and_ipv4() {
        assert!(coerce_scalar("u", ValueType::Url, "https://example.com/a?b=c", &config()).is_ok());
        assert!(coerce_scalar("u", ValueType::Url, "example.com", &config()).is_err());
        assert_eq!(
            coerce_scalar("ip", ValueType::Ipv4, "10.0.0.1", &config()).unwrap(),
            Value::Ipv4(Ipv4Addr::new(10, 0, 0, 1))
        );
        assert!(coerce_scalar("ip", ValueType::Ipv4, "10.0.0.256", &config()).is_err());
        assert!(coerce_scalar("ip", ValueType::Ipv4, "::1", &config()).is_err());
    }

    #[test]
    fn test_path_is_made_absolute() {
        let value = coerce_scalar("p", ValueType::Path, "some/file.txt", &config()).unwrap();
        match value {
            Value::Path(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("some/file.txt"));
            }
            other => panic!("unexpected value: {other:?}"),
        }
        assert!(coerce_scalar("p", ValueType::Path, "", &config()).is_err());
    }

    #[test]
    fn test_path_dollar_sign_is_literal() {
        let value = coerce_scalar("--out", ValueType::Path, "report$1.txt", &config()).unwrap();
        match value {
            Value::Path(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("report$1.txt"));
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_list_fails_on_first_bad_token() {
        let tokens = vec!["1".to_string(), "x".to_string(), "y".to_string()];
        let err = coerce_list("--ids", ValueType::IntList, &tokens, &config()).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                item: "--ids".to_string(),
                token: "x".to_string(),
                value_type: ValueType::IntList,
            }
        );

        let tokens = vec!["1".to_string(), "2".to_string()];
        assert_eq!(
            coerce_list("--ids", ValueType::IntList, &tokens, &config()).unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }
}

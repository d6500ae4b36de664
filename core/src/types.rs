//! Item model for declarative command lines.
//!
//! This module defines the data model shared by both entry points: the
//! declarative table loader and the help-document scanner produce the same
//! [`Item`] templates, and the argument engine binds a [`Value`] onto a copy
//! of each template it resolves.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

/// Semantic value type of an item.
///
/// Every scalar type except [`ValueType::Bool`] has a list ("sliced") form
/// that consumes a run of tokens.
///
/// # Examples
///
/// ```
/// use boa_core::ValueType;
///
/// assert_eq!(ValueType::Int.to_list(), Some(ValueType::IntList));
/// assert_eq!(ValueType::Bool.to_list(), None);
/// assert_eq!(ValueType::IntList.scalar(), ValueType::Int);
/// assert!(ValueType::PathList.is_list());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Presence-only value.
    Bool,
    #[default]
    String,
    StringList,
    Int,
    IntList,
    Float,
    FloatList,
    /// Clock time such as `3:04PM`.
    Time,
    TimeList,
    /// Signed duration such as `2h45m`.
    Duration,
    DurationList,
    /// Calendar date such as `Jan-02-2006`.
    Date,
    DateList,
    Path,
    PathList,
    Url,
    UrlList,
    Ipv4,
    Ipv4List,
    Email,
    EmailList,
    Phone,
    PhoneList,
}

impl ValueType {
    /// Returns `true` for the list forms.
    pub fn is_list(self) -> bool {
        self != self.scalar()
    }

    /// Returns the scalar form of a list type (scalars map to themselves).
    pub fn scalar(self) -> Self {
        match self {
            Self::StringList => Self::String,
            Self::IntList => Self::Int,
            Self::FloatList => Self::Float,
            Self::TimeList => Self::Time,
            Self::DurationList => Self::Duration,
            Self::DateList => Self::Date,
            Self::PathList => Self::Path,
            Self::UrlList => Self::Url,
            Self::Ipv4List => Self::Ipv4,
            Self::EmailList => Self::Email,
            Self::PhoneList => Self::Phone,
            other => other,
        }
    }

    /// Returns the list form, or `None` when the type has none.
    pub fn to_list(self) -> Option<Self> {
        let list = match self.scalar() {
            Self::String => Self::StringList,
            Self::Int => Self::IntList,
            Self::Float => Self::FloatList,
            Self::Time => Self::TimeList,
            Self::Duration => Self::DurationList,
            Self::Date => Self::DateList,
            Self::Path => Self::PathList,
            Self::Url => Self::UrlList,
            Self::Ipv4 => Self::Ipv4List,
            Self::Email => Self::EmailList,
            Self::Phone => Self::PhoneList,
            _ => return None,
        };
        Some(list)
    }

    /// Human-readable name of the semantic type, shared by scalar and list forms.
    pub fn label(self) -> &'static str {
        match self.scalar() {
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Int => "Integer",
            Self::Float => "Float",
            Self::Time => "Time",
            Self::Duration => "Time Duration",
            Self::Date => "Date",
            Self::Path => "Path",
            Self::Url => "URL",
            Self::Ipv4 => "IPv4 Address",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list() {
            write!(f, "{} list", self.label())
        } else {
            f.write_str(self.label())
        }
    }
}

/// Encoded integer for [`Arity::OneOrMore`].
pub const ONE_OR_MORE: i64 = -100;
/// Encoded integer for [`Arity::ZeroOrMore`].
pub const ZERO_OR_MORE: i64 = -99;

/// How many value tokens an item consumes.
///
/// Serialized as a single integer: `n >= 0` is a fixed count, `-1..=-98`
/// a fixed but optional count, `-100` one-or-more and `-99` zero-or-more.
///
/// # Examples
///
/// ```
/// use boa_core::Arity;
///
/// assert_eq!(Arity::try_from(-3).unwrap(), Arity::Optional(3));
/// assert_eq!(i64::from(Arity::OneOrMore), -100);
/// assert!(Arity::ZeroOrMore.tolerates_absence());
/// assert!(!Arity::Fixed(1).tolerates_absence());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Arity {
    Fixed(u32),
    Optional(u32),
    OneOrMore,
    ZeroOrMore,
}

impl Default for Arity {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

impl Arity {
    /// Returns `true` for an arity that never takes a value.
    pub fn is_none(self) -> bool {
        matches!(self, Self::Fixed(0) | Self::Optional(0))
    }

    /// Returns `true` when a missing value is not an error.
    pub fn tolerates_absence(self) -> bool {
        matches!(self, Self::Optional(_) | Self::ZeroOrMore)
    }

    /// Returns `true` for the open-ended arities.
    pub fn is_variadic(self) -> bool {
        matches!(self, Self::OneOrMore | Self::ZeroOrMore)
    }

    /// Returns `true` when the arity consumes at most one value token.
    pub fn is_single(self) -> bool {
        matches!(
            self,
            Self::Fixed(0) | Self::Fixed(1) | Self::Optional(0) | Self::Optional(1)
        )
    }
}

impl TryFrom<i64> for Arity {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            ONE_OR_MORE => Ok(Self::OneOrMore),
            ZERO_OR_MORE => Ok(Self::ZeroOrMore),
            n if n >= 0 => u32::try_from(n)
                .map(Self::Fixed)
                .map_err(|_| format!("arity {n} is too large")),
            n if n > ZERO_OR_MORE => u32::try_from(-n)
                .map(Self::Optional)
                .map_err(|_| format!("arity {n} is too large")),
            n => Err(format!("arity {n} is not a recognized encoding")),
        }
    }
}

impl From<Arity> for i64 {
    fn from(arity: Arity) -> Self {
        match arity {
            Arity::Fixed(n) => i64::from(n),
            Arity::Optional(n) => -i64::from(n),
            Arity::OneOrMore => ONE_OR_MORE,
            Arity::ZeroOrMore => ZERO_OR_MORE,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Optional(n) => write!(f, "[{n}]"),
            Self::OneOrMore => f.write_str("1.."),
            Self::ZeroOrMore => f.write_str("0.."),
        }
    }
}

/// A parsed RFC 5322 mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    /// Display name, when the mailbox was written as `Name <addr>`.
    pub name: Option<String>,
    /// The `local@domain` part.
    pub address: String,
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// A value bound to an item after coercion.
///
/// List items bind [`Value::List`] whose elements all share the scalar
/// variant of the item's [`ValueType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Time(NaiveTime),
    Date(NaiveDate),
    Duration(TimeDelta),
    Path(PathBuf),
    Url(Url),
    Email(EmailAddress),
    Phone(String),
    Ipv4(Ipv4Addr),
    List(Vec<Value>),
}

impl Value {
    /// Returns the list elements, or `None` for a scalar.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) | Self::Phone(s) => f.write_str(s),
            Self::Time(t) => write!(f, "{}", t.format("%-I:%M%p")),
            Self::Date(d) => write!(f, "{}", d.format("%b-%d-%Y")),
            Self::Duration(d) => fmt_duration(*d, f),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u.as_str()),
            Self::Email(e) => write!(f, "{e}"),
            Self::Ipv4(ip) => write!(f, "{ip}"),
            Self::List(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Writes a duration as `2h45m0s`, `1.5s` or `300ms`.
fn fmt_duration(d: TimeDelta, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if d.is_zero() {
        return f.write_str("0s");
    }
    if d < TimeDelta::zero() {
        f.write_str("-")?;
    }
    let d = d.abs();
    let secs = d.num_seconds();
    let nanos = d.subsec_nanos();
    if secs == 0 {
        return match nanos {
            n if n % 1_000_000 == 0 => write!(f, "{}ms", n / 1_000_000),
            n if n % 1_000 == 0 => write!(f, "{}us", n / 1_000),
            n => write!(f, "{n}ns"),
        };
    }
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        write!(f, "{hours}h")?;
    }
    if hours > 0 || minutes > 0 {
        write!(f, "{minutes}m")?;
    }
    if nanos == 0 {
        write!(f, "{seconds}s")
    } else {
        let frac = format!("{nanos:09}");
        write!(f, "{seconds}.{}s", frac.trim_end_matches('0'))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            other => serializer.collect_str(other),
        }
    }
}

/// One declared command or flag.
///
/// Items are templates: the command table owns them unchanged, and the
/// argument engine works on clones with [`Item::value`] bound.
///
/// # Examples
///
/// ```
/// use boa_core::{Arity, Item, ValueType};
///
/// let item = Item::new("--count", ValueType::Int, Arity::Fixed(1))
///     .with_alias("-c")
///     .with_default("1")
///     .with_short_help("how many times");
/// assert_eq!(item.alias.as_deref(), Some("-c"));
/// assert!(item.value.is_none());
///
/// let verbose = Item::flag("--verbose");
/// assert_eq!(verbose.value_type, ValueType::Bool);
/// assert!(verbose.flag);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Position in declaration or scan order.
    #[serde(rename = "id")]
    pub ordinal: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub value_type: ValueType,
    pub arity: Arity,
    /// A missing value is tolerated even under fixed arity.
    pub optional_param: bool,
    /// Raw text substituted when a value is absent.
    pub default_value: String,
    /// Set by the `+` meta character in help documents. A marker only;
    /// the default text itself lives in [`Item::default_value`].
    pub has_default: bool,
    pub required: bool,
    pub exclusive: bool,
    /// Declared as a flag rather than a command; exclusivity is only
    /// checked between items of the same kind.
    pub flag: bool,
    /// Sub-selector tokens consumed before the item's own value.
    pub child_tokens: Vec<String>,
    pub short_help: String,
    pub long_help: String,
    #[serde(skip)]
    pub value: Option<Value>,
}

impl Item {
    /// Creates an item with the given name, type and arity.
    pub fn new(name: &str, value_type: ValueType, arity: Arity) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            arity,
            ..Default::default()
        }
    }

    /// Creates a presence-only flag.
    pub fn flag(name: &str) -> Self {
        Self {
            flag: true,
            ..Self::new(name, ValueType::Bool, Arity::Fixed(0))
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default_value = default.to_string();
        self
    }

    pub fn with_short_help(mut self, help: &str) -> Self {
        self.short_help = help.to_string();
        self
    }

    pub fn with_children(mut self, children: &[&str]) -> Self {
        self.child_tokens = children.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn optional_param(mut self) -> Self {
        self.optional_param = true;
        self
    }

    pub fn as_flag(mut self) -> Self {
        self.flag = true;
        self
    }

    /// Returns `true` when the item never takes a value token.
    pub fn is_presence_only(&self) -> bool {
        self.flag_like() || self.arity.is_none()
    }

    /// Returns `true` when a missing value is not an error.
    pub fn tolerates_absence(&self) -> bool {
        self.optional_param || self.arity.tolerates_absence()
    }

    fn flag_like(&self) -> bool {
        self.value_type == ValueType::Bool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_integer_encoding() {
        assert_eq!(Arity::try_from(0).unwrap(), Arity::Fixed(0));
        assert_eq!(Arity::try_from(2).unwrap(), Arity::Fixed(2));
        assert_eq!(Arity::try_from(-1).unwrap(), Arity::Optional(1));
        assert_eq!(Arity::try_from(-100).unwrap(), Arity::OneOrMore);
        assert_eq!(Arity::try_from(-99).unwrap(), Arity::ZeroOrMore);
        assert!(Arity::try_from(-101).is_err());
        assert_eq!(i64::from(Arity::Optional(4)), -4);
    }

    #[test]
    fn test_item_deserializes_with_defaults() {
        let item: Item = serde_json::from_str(
            r#"{"name": "--count", "value_type": "int_list", "arity": -100, "required": true}"#,
        )
        .unwrap();

        assert_eq!(item.name, "--count");
        assert_eq!(item.value_type, ValueType::IntList);
        assert_eq!(item.arity, Arity::OneOrMore);
        assert!(item.required);
        assert!(item.alias.is_none());
        assert!(item.child_tokens.is_empty());
    }

    #[test]
    fn test_value_serializes_scalars_and_lists() {
        let value = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[1,2]");

        let date = Value::Date(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"Jan-02-2022\"");
    }

    #[test]
    fn test_duration_display() {
        let d = TimeDelta::hours(2) + TimeDelta::minutes(45);
        assert_eq!(Value::Duration(d).to_string(), "2h45m0s");
        assert_eq!(Value::Duration(TimeDelta::milliseconds(300)).to_string(), "300ms");
        assert_eq!(Value::Duration(TimeDelta::milliseconds(-1500)).to_string(), "-1.5s");
    }

    #[test]
    fn test_value_type_labels_share_scalar_name() {
        assert_eq!(ValueType::EmailList.label(), "Email Address");
        assert_eq!(ValueType::EmailList.to_string(), "Email Address list");
        assert_eq!(ValueType::Duration.to_string(), "Time Duration");
    }
}

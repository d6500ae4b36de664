//! Per-invocation parse results.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use url::Url;

use crate::help::{HelpKind, HelpTopic};
use crate::{CommandTable, EmailAddress, Item, ParseError, Value};

/// Bound items, accumulated errors and help strings for one parse call.
///
/// Accessors return `None` when the item is absent, has no bound value, or
/// holds a value of a different type.
///
/// # Examples
///
/// ```
/// use boa_core::*;
///
/// let table = CommandTable::from_items([
///     Item::new("--count", ValueType::Int, Arity::Fixed(1)).with_alias("-c"),
///     Item::new("--tags", ValueType::StringList, Arity::OneOrMore).with_ordinal(1),
/// ]);
///
/// let result = parse(&table, &["-c", "3", "--tags", "a", "b"]);
/// assert!(!result.has_errors());
/// assert_eq!(result.int("--count"), Some(3));
/// assert_eq!(result.string_list("--tags"), Some(vec!["a".to_string(), "b".to_string()]));
/// assert_eq!(result.string("--count"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub application: String,
    pub items: BTreeMap<String, Item>,
    pub errors: Vec<ParseError>,
    pub help: BTreeMap<String, HelpTopic>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result set whose only error is `error`.
    pub fn from_error(error: ParseError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// Inserts a bound item under its canonical name.
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.name.clone(), item);
    }

    pub fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.items.get(name)?.value.as_ref()
    }

    /// Child tokens seen after `name` on the command line.
    pub fn children(&self, name: &str) -> Option<&[String]> {
        self.items.get(name).map(|item| item.child_tokens.as_slice())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.errors.last()
    }

    /// All errors, one per line.
    pub fn errors_joined(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Records help topics for every item of `table`.
    pub fn fill_help(&mut self, table: &CommandTable) {
        for item in table.iter() {
            self.help
                .insert(item.name.clone(), HelpTopic::from_item(item));
        }
    }

    /// Returns help for an item name or alias; empty when unknown.
    pub fn help(&self, topic: &str, kind: HelpKind) -> &str {
        let topic = self
            .help
            .get(topic)
            .or_else(|| {
                self.help
                    .values()
                    .find(|help| help.alias.as_deref() == Some(topic))
            });
        match (topic, kind) {
            (Some(help), HelpKind::Short) => &help.short,
            (Some(help), HelpKind::Long) => &help.long,
            (Some(help), HelpKind::Combined) => &help.combined,
            (None, _) => "",
        }
    }

    /// Combined help for every item, in declaration order.
    pub fn help_page(&self) -> String {
        let mut topics: Vec<&HelpTopic> = self.help.values().collect();
        topics.sort_by_key(|topic| topic.ordinal);
        topics
            .iter()
            .map(|topic| topic.combined.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.scalar(name, |value| match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.scalar(name, as_string)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.scalar(name, as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.scalar(name, as_float)
    }

    pub fn time(&self, name: &str) -> Option<NaiveTime> {
        self.scalar(name, as_time)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.scalar(name, as_date)
    }

    pub fn duration(&self, name: &str) -> Option<TimeDelta> {
        self.scalar(name, as_duration)
    }

    pub fn path(&self, name: &str) -> Option<PathBuf> {
        self.scalar(name, as_path)
    }

    pub fn url(&self, name: &str) -> Option<Url> {
        self.scalar(name, as_url)
    }

    pub fn email(&self, name: &str) -> Option<EmailAddress> {
        self.scalar(name, as_email)
    }

    pub fn phone(&self, name: &str) -> Option<String> {
        self.scalar(name, as_phone)
    }

    pub fn ipv4(&self, name: &str) -> Option<Ipv4Addr> {
        self.scalar(name, as_ipv4)
    }

    pub fn string_list(&self, name: &str) -> Option<Vec<String>> {
        self.list(name, as_string)
    }

    pub fn int_list(&self, name: &str) -> Option<Vec<i64>> {
        self.list(name, as_int)
    }

    pub fn float_list(&self, name: &str) -> Option<Vec<f64>> {
        self.list(name, as_float)
    }

    pub fn time_list(&self, name: &str) -> Option<Vec<NaiveTime>> {
        self.list(name, as_time)
    }

    pub fn date_list(&self, name: &str) -> Option<Vec<NaiveDate>> {
        self.list(name, as_date)
    }

    pub fn duration_list(&self, name: &str) -> Option<Vec<TimeDelta>> {
        self.list(name, as_duration)
    }

    pub fn path_list(&self, name: &str) -> Option<Vec<PathBuf>> {
        self.list(name, as_path)
    }

    pub fn url_list(&self, name: &str) -> Option<Vec<Url>> {
        self.list(name, as_url)
    }

    pub fn email_list(&self, name: &str) -> Option<Vec<EmailAddress>> {
        self.list(name, as_email)
    }

    pub fn phone_list(&self, name: &str) -> Option<Vec<String>> {
        self.list(name, as_phone)
    }

    pub fn ipv4_list(&self, name: &str) -> Option<Vec<Ipv4Addr>> {
        self.list(name, as_ipv4)
    }

    fn scalar<T>(&self, name: &str, extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
        extract(self.value(name)?)
    }

    fn list<T>(&self, name: &str, extract: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
        self.value(name)?.as_list()?.iter().map(extract).collect()
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn as_time(value: &Value) -> Option<NaiveTime> {
    match value {
        Value::Time(t) => Some(*t),
        _ => None,
    }
}

fn as_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        _ => None,
    }
}

fn as_duration(value: &Value) -> Option<TimeDelta> {
    match value {
        Value::Duration(d) => Some(*d),
        _ => None,
    }
}

fn as_path(value: &Value) -> Option<PathBuf> {
    match value {
        Value::Path(p) => Some(p.clone()),
        _ => None,
    }
}

fn as_url(value: &Value) -> Option<Url> {
    match value {
        Value::Url(u) => Some(u.clone()),
        _ => None,
    }
}

fn as_email(value: &Value) -> Option<EmailAddress> {
    match value {
        Value::Email(e) => Some(e.clone()),
        _ => None,
    }
}

fn as_phone(value: &Value) -> Option<String> {
    match value {
        Value::Phone(p) => Some(p.clone()),
        _ => None,
    }
}

fn as_ipv4(value: &Value) -> Option<Ipv4Addr> {
    match value {
        Value::Ipv4(ip) => Some(*ip),
        _ => None,
    }
}

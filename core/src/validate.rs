//! Command-table and requirement validation.
//!
//! Two passes live here. [`validate_items`] and [`validate_table`] check the
//! structural invariants of a table before it is used: non-empty unique
//! names, unique aliases that never shadow a name, and bool items that never
//! take more than one value. [`validate_requirements`] runs after the
//! argument engine and records missing required items and exclusivity
//! conflicts in the result set.
//!
//! # Examples
//!
//! ```
//! use boa_core::*;
//!
//! let table = CommandTable::from_items([
//!     Item::flag("--all").with_alias("-a"),
//!     Item::flag("--brief").with_alias("-b"),
//! ]);
//! assert!(validate_table(&table).is_empty());
//!
//! // Invalid: alias equal to another item's name
//! let bad = CommandTable::from_items([
//!     Item::flag("--all").with_alias("-b"),
//!     Item::flag("-b"),
//! ]);
//! assert!(!validate_table(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::error::ParseError;
use crate::{CommandTable, Item, ResultSet};

/// Command-table validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Item name is empty or whitespace-only.
    #[error("item name cannot be empty")]
    EmptyName,
    /// Two items share a name.
    #[error("duplicate item name: {0}")]
    DuplicateName(String),
    /// Two items share an alias.
    #[error("duplicate alias: {0}")]
    DuplicateAlias(String),
    /// An alias is identical to some item's name.
    #[error("alias {0} is also used as an item name")]
    AliasShadowsName(String),
    /// A bool item declares an arity that takes more than one value.
    #[error("bool item {0} cannot take a list of values")]
    BoolList(String),
}

/// Validates a list of item records, as read from a document.
///
/// All problems are reported, in item order.
pub fn validate_items(items: &[Item]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut names: HashSet<&str> = HashSet::new();
    for item in items {
        if item.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName);
            continue;
        }
        if !names.insert(item.name.as_str()) {
            errors.push(ValidationError::DuplicateName(item.name.clone()));
        }
    }

    let mut aliases: HashSet<&str> = HashSet::new();
    for item in items {
        let Some(alias) = item.alias.as_deref() else {
            continue;
        };
        if names.contains(alias) {
            errors.push(ValidationError::AliasShadowsName(alias.to_string()));
        } else if !aliases.insert(alias) {
            errors.push(ValidationError::DuplicateAlias(alias.to_string()));
        }
    }

    for item in items {
        if item.value_type == crate::ValueType::Bool
            && !item.arity.is_none()
            && !item.arity.is_single()
        {
            errors.push(ValidationError::BoolList(item.name.clone()));
        }
    }

    errors
}

/// Validates a built command table.
pub fn validate_table(table: &CommandTable) -> Vec<ValidationError> {
    let items: Vec<Item> = table.ordered().into_iter().cloned().collect();
    validate_items(&items)
}

/// Appends requirement errors to a result set produced by the engine.
///
/// Each absent required item yields one
/// [`MissingRequiredItem`](ParseError::MissingRequiredItem). Each present
/// exclusive item conflicts with every other present item of the same kind
/// (flag or command); every conflicting pair is recorded exactly once, in
/// declaration order.
///
/// # Examples
///
/// ```
/// use boa_core::*;
///
/// let table = CommandTable::from_items([
///     Item::flag("--json").exclusive().with_ordinal(0),
///     Item::flag("--yaml").exclusive().with_ordinal(1),
///     Item::new("--out", ValueType::Path, Arity::Fixed(1)).required().with_ordinal(2),
/// ]);
///
/// let result = parse(&table, &["--json", "--yaml"]);
/// let codes: Vec<&str> = result.errors.iter().map(|e| e.code()).collect();
/// assert_eq!(codes, vec!["missing_required_item", "exclusive_conflict"]);
/// ```
pub fn validate_requirements(table: &CommandTable, result: &mut ResultSet) {
    let ordered = table.ordered();

    for item in &ordered {
        if item.required && !result.contains(&item.name) {
            debug!(item = %item.name, "Required item absent");
            result.push_error(ParseError::MissingRequiredItem {
                item: item.name.clone(),
            });
        }
    }

    let present: Vec<&Item> = ordered
        .iter()
        .copied()
        .filter(|item| result.contains(&item.name))
        .collect();

    let mut recorded: HashSet<(&str, &str)> = HashSet::new();
    for item in present.iter().filter(|item| item.exclusive) {
        for other in &present {
            if other.name == item.name || other.flag != item.flag {
                continue;
            }
            let pair = if item.name < other.name {
                (item.name.as_str(), other.name.as_str())
            } else {
                (other.name.as_str(), item.name.as_str())
            };
            if !recorded.insert(pair) {
                continue;
            }
            debug!(item = %item.name, other = %other.name, "Exclusive conflict");
            result.push_error(ParseError::ExclusiveConflict {
                item: item.name.clone(),
                other: other.name.clone(),
            });
        }
    }
}

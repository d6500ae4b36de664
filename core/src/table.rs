//! Command tables: the item declarations shared by both entry points.
//!
//! A [`CommandTable`] maps item names to [`Item`] templates. It is built
//! once, either by hand, from a declarative JSON/YAML document, or by the
//! help-document scanner, and is only read while arguments are parsed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::APP_DATA_NAME;
use crate::error::{LoadError, Result};
use crate::validate::validate_items;
use crate::Item;

/// Mapping from item name to item template.
///
/// # Examples
///
/// ```
/// use boa_core::{Arity, CommandTable, Item, ValueType};
///
/// let mut table = CommandTable::new();
/// table.insert(Item::new("--name", ValueType::String, Arity::Fixed(1)).with_alias("-n"));
/// table.insert(Item::flag("--verbose"));
///
/// assert_eq!(table.resolve("--name").unwrap().name, "--name");
/// assert_eq!(table.resolve("-n").unwrap().name, "--name");
/// assert_eq!(table.resolve("verbose").unwrap().name, "--verbose");
/// assert!(table.resolve("--missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandTable {
    items: BTreeMap<String, Item>,
}

/// Serialized form of a declarative table: a list of item records under a
/// `commands` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDocument {
    pub commands: Vec<Item>,
}

/// A table loaded from a document, with the application name taken from
/// the reserved app-data item.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub app: Option<String>,
    pub table: CommandTable,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item keyed by its name, returning any item it replaced.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.name.clone(), item)
    }

    pub fn remove(&mut self, name: &str) -> Option<Item> {
        self.items.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates items in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Returns items in declaration order (ordinal, then name).
    pub fn ordered(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.name.cmp(&b.name)));
        items
    }

    /// Resolves a command-line token to an item: exact name first, then the
    /// `--`-prefixed name, then alias.
    pub fn resolve(&self, token: &str) -> Option<&Item> {
        if let Some(item) = self.items.get(token) {
            return Some(item);
        }
        if let Some(item) = self.items.get(&format!("--{token}")) {
            return Some(item);
        }
        self.items
            .values()
            .find(|item| item.alias.as_deref() == Some(token))
    }

    /// Builds a table from items, keyed by name.
    ///
    /// When two items share an ordinal every item is renumbered in the
    /// order given, so items built without [`Item::with_ordinal`] stay
    /// distinct for ordering and exclusivity.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut items: Vec<Item> = items.into_iter().collect();
        assign_declaration_order(&mut items);

        let mut table = Self::new();
        for item in items {
            table.insert(item);
        }
        table
    }

    /// Returns the serializable document form, items in declaration order.
    pub fn to_document(&self) -> TableDocument {
        TableDocument {
            commands: self.ordered().into_iter().cloned().collect(),
        }
    }

    /// Loads a table from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](LoadError::JsonError) on malformed input and
    /// [`InvalidTable`](LoadError::InvalidTable) when the items violate
    /// table invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use boa_core::CommandTable;
    ///
    /// let json = br#"{"commands": [
    ///     {"name": "BOA-APP-DATA", "alias": "greeter"},
    ///     {"name": "--name", "value_type": "string", "arity": 1}
    /// ]}"#;
    ///
    /// let loaded = CommandTable::from_json(json).unwrap();
    /// assert_eq!(loaded.app.as_deref(), Some("greeter"));
    /// assert_eq!(loaded.table.len(), 1);
    /// ```
    pub fn from_json(json: &[u8]) -> Result<LoadedTable> {
        Self::from_json_with(json, APP_DATA_NAME)
    }

    /// Like [`from_json`](Self::from_json) with a custom app-data item name.
    pub fn from_json_with(json: &[u8], app_data_name: &str) -> Result<LoadedTable> {
        let document: TableDocument = serde_json::from_slice(json)?;
        Self::from_document(document, app_data_name)
    }

    /// Loads a table from a YAML document with the same schema as JSON.
    pub fn from_yaml(yaml: &str) -> Result<LoadedTable> {
        Self::from_yaml_with(yaml, APP_DATA_NAME)
    }

    /// Like [`from_yaml`](Self::from_yaml) with a custom app-data item name.
    pub fn from_yaml_with(yaml: &str, app_data_name: &str) -> Result<LoadedTable> {
        let document: TableDocument = serde_yaml::from_str(yaml)?;
        Self::from_document(document, app_data_name)
    }

    /// Validates a document and strips the app-data item.
    pub fn from_document(document: TableDocument, app_data_name: &str) -> Result<LoadedTable> {
        let mut app = None;
        let mut items = Vec::with_capacity(document.commands.len());
        for item in document.commands {
            if item.name == app_data_name {
                app = item.alias;
                continue;
            }
            items.push(item);
        }

        assign_declaration_order(&mut items);

        let errors = validate_items(&items);
        if !errors.is_empty() {
            return Err(LoadError::InvalidTable(errors));
        }

        debug!(app = ?app, items = items.len(), "Loaded declarative command table");
        Ok(LoadedTable {
            app,
            table: Self::from_items(items),
        })
    }
}

/// Records without explicit ids all default to 0; fall back to
/// declaration order when any ordinal repeats.
fn assign_declaration_order(items: &mut [Item]) {
    let mut seen = HashSet::new();
    if !items.iter().all(|item| seen.insert(item.ordinal)) {
        for (index, item) in items.iter_mut().enumerate() {
            item.ordinal = index;
        }
    }
}

impl FromIterator<Item> for CommandTable {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

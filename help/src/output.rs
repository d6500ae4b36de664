//! Output formatting for result sets and command tables.

use std::collections::BTreeMap;

use boa_core::{APP_DATA_NAME, CommandTable, Item, ResultSet, TableDocument, Value, ValueType};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Serialize)]
struct ResultReport<'a> {
    application: &'a str,
    items: BTreeMap<&'a str, ItemReport<'a>>,
    errors: Vec<ErrorReport>,
}

#[derive(Debug, Serialize)]
struct ItemReport<'a> {
    value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    children: &'a [String],
}

#[derive(Debug, Serialize)]
struct ErrorReport {
    code: &'static str,
    message: String,
}

/// Formats a parse result in the requested output format.
pub fn format_result(result: &ResultSet, format: OutputFormat) -> Result<String, String> {
    let report = ResultReport {
        application: &result.application,
        items: result
            .items
            .iter()
            .map(|(name, item)| (name.as_str(), item_report(item)))
            .collect(),
        errors: result
            .errors
            .iter()
            .map(|error| ErrorReport {
                code: error.code(),
                message: error.to_string(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Text => Ok(result_to_text(&report)),
    }
}

/// Formats a command table in the requested output format.
///
/// JSON and YAML output is a loadable table document; a non-empty `app` is
/// written as the reserved app-data item.
pub fn format_table(app: &str, table: &CommandTable, format: OutputFormat) -> Result<String, String> {
    let mut document = table.to_document();
    if !app.is_empty() {
        let mut app_item = Item::flag(APP_DATA_NAME).with_alias(app);
        app_item.flag = false;
        document.commands.insert(0, app_item);
    }

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&document)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&document).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Text => Ok(table_to_text(app, &document)),
    }
}

fn item_report(item: &Item) -> ItemReport<'_> {
    ItemReport {
        value_type: item.value_type,
        value: item.value.as_ref(),
        children: &item.child_tokens,
    }
}

fn result_to_text(report: &ResultReport<'_>) -> String {
    let mut out = String::new();

    if !report.application.is_empty() {
        out.push_str(&format!("Application: {}\n", report.application));
    }

    if !report.items.is_empty() {
        out.push_str("\nItems:\n");
        let width = report.items.keys().map(|name| name.len()).max().unwrap_or(4);
        for (name, item) in &report.items {
            let value = item
                .value
                .map_or_else(|| "-".to_string(), ToString::to_string);
            out.push_str(&format!("  {name:<width$}  {value}"));
            if !item.children.is_empty() {
                out.push_str(&format!("  ({})", item.children.join(", ")));
            }
            out.push('\n');
        }
    }

    if !report.errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in &report.errors {
            out.push_str(&format!("  [{}] {}\n", error.code, error.message));
        }
    }

    out
}

fn table_to_text(app: &str, document: &TableDocument) -> String {
    let mut out = String::new();

    if !app.is_empty() {
        out.push_str(&format!("Usage: {app}\n\n"));
    }

    for item in document.commands.iter().filter(|item| item.name != APP_DATA_NAME) {
        let kind = if item.flag { "flag" } else { "command" };
        let mut markers = Vec::new();
        if item.required {
            markers.push("required");
        }
        if item.exclusive {
            markers.push("exclusive");
        }
        if item.has_default {
            markers.push("default");
        }
        let markers = if markers.is_empty() {
            String::new()
        } else {
            format!(" [{}]", markers.join(", "))
        };
        out.push_str(&format!(
            "{kind} {}: {} x{}{markers}\n",
            item.name, item.value_type, item.arity
        ));
        out.push_str(&boa_core::format_help(
            &item.name,
            item.alias.as_deref(),
            &item.short_help,
            &item.long_help,
        ));
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

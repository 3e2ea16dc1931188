//! Output rendering.
//!
//! Supports a bordered table, tab-separated text, compact and pretty JSON,
//! YAML, and JMESPath queries over the JSON form. Everything renders to a
//! `String` so callers can print all-or-nothing.

use std::fmt;
use std::str::FromStr;

use comfy_table::{Cell, Table};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::list::ResourceList;
use crate::resource::ResourceKind;

/// Output mode selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Bordered grid with a header row.
    Table,
    /// Tab-separated rows without a header.
    Text,
    /// Compact JSON.
    Json,
    /// Indented JSON.
    JsonPretty,
    /// YAML.
    Yaml,
}

impl OutputMode {
    /// Name accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Text => "text",
            Self::Json => "json",
            Self::JsonPretty => "json-pp",
            Self::Yaml => "yaml",
        }
    }

    /// Modes a query result can be printed in.
    #[must_use]
    pub const fn accepts_query(self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::Text)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Self::Table),
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-pp" => Ok(Self::JsonPretty),
            "yaml" => Ok(Self::Yaml),
            other => Err(ApiError::validation(format!(
                "unknown output '{other}', expected one of: table, text, json, json-pp, yaml"
            ))),
        }
    }
}

/// Values that can be laid out as rows under named columns.
pub trait TableDisplay {
    /// Column headers.
    fn headers(&self) -> Vec<String>;

    /// Cell values, one inner vector per row.
    fn rows(&self) -> Vec<Vec<Value>>;
}

impl<K: ResourceKind> TableDisplay for ResourceList<K> {
    fn headers(&self) -> Vec<String> {
        self.columns().into_iter().map(ToString::to_string).collect()
    }

    fn rows(&self) -> Vec<Vec<Value>> {
        ResourceList::rows(self)
    }
}

/// A validated output mode plus optional query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    mode: OutputMode,
    query: Option<String>,
}

impl OutputFormat {
    /// Creates a formatter without a query.
    #[must_use]
    pub const fn new(mode: OutputMode) -> Self {
        Self { mode, query: None }
    }

    /// Creates a formatter with an optional query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if a query is combined with the table
    /// or yaml mode, or the query does not compile.
    pub fn with_query(mode: OutputMode, query: Option<&str>) -> Result<Self> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        if let Some(query) = query {
            if !mode.accepts_query() {
                return Err(ApiError::validation(
                    "If you provide a jmes --query, the output must be 'json', 'json-pp', or 'text'",
                ));
            }
            jmespath::compile(query)
                .map_err(|e| ApiError::validation(format!("invalid query '{query}': {e}")))?;
        }
        Ok(Self {
            mode,
            query: query.map(ToString::to_string),
        })
    }

    /// The selected mode.
    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    /// The query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Renders a tabular value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or query evaluation fails.
    pub fn render<T>(&self, value: &T) -> Result<String>
    where
        T: Serialize + TableDisplay,
    {
        if self.query.is_some() || !matches!(self.mode, OutputMode::Table | OutputMode::Text) {
            return self.render_value(&serde_json::to_value(value)?);
        }

        let headers = value.headers();
        let rows = value.rows();
        Ok(match self.mode {
            OutputMode::Table => render_table(&headers, &rows),
            _ => render_text_rows(&rows),
        })
    }

    /// Renders a plain JSON value (a single resource, a raw payload).
    ///
    /// Table mode has no columns to work with here and falls back to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or query evaluation fails.
    pub fn render_value(&self, value: &Value) -> Result<String> {
        let queried;
        let value = match &self.query {
            Some(query) => {
                queried = search(query, value)?;
                &queried
            }
            None => value,
        };

        match (self.mode, self.query.is_some()) {
            (OutputMode::Json, _) => Ok(format!("{}\n", serde_json::to_string(value)?)),
            (OutputMode::JsonPretty, _) => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
            (OutputMode::Text, true) => Ok(text_dump(value)),
            (OutputMode::Text, false) => Ok(match value {
                Value::Array(items) => render_text_rows(
                    &items.iter().map(|item| vec![item.clone()]).collect::<Vec<_>>(),
                ),
                other => format!("{}\n", cell(other)),
            }),
            (OutputMode::Table | OutputMode::Yaml, _) => serde_yaml::to_string(value)
                .map_err(|e| ApiError::protocol(format!("YAML serialization failed: {e}"))),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(OutputMode::Table)
    }
}

/// Evaluates a JMESPath expression against a JSON value.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] if the expression is invalid or fails to
/// evaluate.
pub fn search(query: &str, data: &Value) -> Result<Value> {
    let expression = jmespath::compile(query)
        .map_err(|e| ApiError::validation(format!("invalid query '{query}': {e}")))?;
    let result = expression
        .search(data)
        .map_err(|e| ApiError::validation(format!("query '{query}' failed: {e}")))?;
    Ok(serde_json::to_value(&*result)?)
}

/// Cell text: strings as-is, `null` empty, anything else compact JSON.
#[must_use]
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_table(headers: &[String], rows: &[Vec<Value>]) -> String {
    let mut table = Table::new();
    table.set_header(headers.iter().map(Cell::new));
    for row in rows {
        table.add_row(row.iter().map(|value| Cell::new(cell(value))));
    }
    format!("{table}\n")
}

fn render_text_rows(rows: &[Vec<Value>]) -> String {
    rows.iter()
        .map(|row| {
            let mut line = row.iter().map(cell).collect::<Vec<_>>().join("\t");
            line.push('\n');
            line
        })
        .collect()
}

/// Flattens a query result to tab-separated text.
///
/// An array prints one line per element, anything else one line. Objects
/// print their values ordered by key. Nested arrays print their length and
/// nested objects print as an empty cell so rows keep the same width.
#[must_use]
pub fn text_dump(data: &Value) -> String {
    let mut out = String::new();
    match data {
        Value::Array(items) => {
            for item in items {
                dump_row(item, &mut out);
            }
        }
        other => dump_row(other, &mut out),
    }
    out
}

fn dump_row(row: &Value, out: &mut String) {
    let values: Vec<&Value> = match row {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries.into_iter().map(|(_, v)| v).collect()
        }
        Value::Array(items) => items.iter().collect(),
        scalar => vec![scalar],
    };
    let cells: Vec<String> = values.into_iter().map(dump_cell).collect();
    out.push_str(&cells.join("\t"));
    out.push('\n');
}

fn dump_cell(value: &Value) -> String {
    match value {
        Value::Array(items) => items.len().to_string(),
        Value::Object(_) => String::new(),
        other => cell(other),
    }
}

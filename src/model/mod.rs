use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Header that names the grouping column.
pub const CATEGORY_COLUMN: &str = "Category";
/// Header that names the numeric column.
pub const VALUE_COLUMN: &str = "Value";

/// A raw spreadsheet cell as read from the first worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No content.
    Empty,
    /// Text content, kept verbatim.
    Text(String),
    /// Integer or floating point content.
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Dates (ISO 8601) and durations, carried as their display text.
    Other(String),
    /// Spreadsheet error values such as `#N/A`.
    Error(String),
}

impl Cell {
    /// Display text of the cell; empty cells render as an empty string.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) | Cell::Other(value) | Cell::Error(value) => value.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
        }
    }
}

/// The header row and the data rows of the input worksheet.
///
/// Rows may be empty and the required columns are not guaranteed to exist;
/// that is checked when the table is projected into [`Record`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Trimmed header texts. Empty when the worksheet has no rows at all.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Returns the index of the leftmost column with the given header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

/// One input row reduced to the two columns the summary cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: Cell,
    pub value: Cell,
}

/// A record whose category is present and whose value coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub category: String,
    pub value: f64,
}

/// Records that survived cleaning, with the number that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTable {
    pub rows: Vec<CleanRecord>,
    pub dropped: usize,
}

impl CleanedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-category totals. Iteration follows ascending category order, which
/// keeps the serialised output stable across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    totals: BTreeMap<String, f64>,
}

impl AggregationResult {
    /// Adds `value` to the running total of `category`.
    pub fn add(&mut self, category: &str, value: f64) {
        match self.totals.get_mut(category) {
            Some(total) => *total += value,
            None => {
                self.totals.insert(category.to_string(), value);
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.totals.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of every category total.
    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals
            .iter()
            .map(|(category, total)| (category.as_str(), *total))
    }

    /// Materialises the totals as output entries in category order.
    pub fn entries(&self) -> Vec<SummaryEntry> {
        self.iter()
            .map(|(category, value)| SummaryEntry {
                category: category.to_string(),
                value,
            })
            .collect()
    }
}

/// One element of the published JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

/// States a summary run moves through. A run that fails stops before the
/// next state and never reaches [`Stage::Written`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    NotStarted,
    Loaded,
    Validated,
    Cleaned,
    Aggregated,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not-started",
            Stage::Loaded => "loaded",
            Stage::Validated => "validated",
            Stage::Cleaned => "cleaned",
            Stage::Aggregated => "aggregated",
            Stage::Written => "written",
        };
        f.write_str(name)
    }
}

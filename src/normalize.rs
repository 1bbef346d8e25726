//! Turn loosely typed model records into fixed-shape sheet rows.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::pricing::{parse_price, MarkupPolicy};
use crate::schema::SchemaVersion;

/// Date format written into the sheet.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

// First four-digit year of this century. No word boundaries: trims such as
// "2026款" have a letter right after the year.
static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"20[0-9]{2}").unwrap());

/// Fields a model may report for a price-list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Brand,
    Model,
    Trim,
    Color,
    ModelYear,
    Year,
    Price,
    PriceCny,
    PriceFob,
}

impl Field {
    /// JSON keys accepted for the field, in lookup order.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Field::Brand => &["brand"],
            Field::Model => &["model"],
            Field::Trim => &["version", "trim"],
            Field::Color => &["color"],
            Field::ModelYear => &["model_year"],
            Field::Year => &["year"],
            Field::Price => &["price"],
            Field::PriceCny => &["price_cny"],
            Field::PriceFob => &["price_fob"],
        }
    }

    /// Value used when the model leaves the field out.
    pub fn default_value(self) -> &'static str {
        ""
    }
}

/// One row as the model returned it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Text of a field, trimmed. Numbers keep their JSON spelling; absent,
    /// null and empty values give [`Field::default_value`].
    pub fn text(&self, field: Field) -> String {
        field
            .keys()
            .iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(value_text)
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| field.default_value().to_string())
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A value written into one sheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// A normalized row ready for the sheet. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    schema: SchemaVersion,
    date: String,
    brand: String,
    model: String,
    trim: String,
    color: String,
    model_year: String,
    year: String,
    price_local: Cell,
    price_fob: String,
    markup: Cell,
}

impl CanonicalRow {
    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }
    pub fn date(&self) -> &str {
        &self.date
    }
    pub fn brand(&self) -> &str {
        &self.brand
    }
    pub fn model(&self) -> &str {
        &self.model
    }
    pub fn trim(&self) -> &str {
        &self.trim
    }
    pub fn color(&self) -> &str {
        &self.color
    }
    pub fn model_year(&self) -> &str {
        &self.model_year
    }
    pub fn year(&self) -> &str {
        &self.year
    }
    /// Factory price: parsed for the legacy layout, verbatim for the extended one.
    pub fn price_local(&self) -> &Cell {
        &self.price_local
    }
    pub fn price_fob(&self) -> &str {
        &self.price_fob
    }
    pub fn markup(&self) -> &Cell {
        &self.markup
    }

    /// Cells in header order for the row's schema generation.
    pub fn into_cells(self) -> Vec<Cell> {
        match self.schema {
            SchemaVersion::Legacy => vec![
                self.brand.into(),
                self.model.into(),
                self.trim.into(),
                self.color.into(),
                self.price_local,
                self.markup,
                self.date.into(),
            ],
            SchemaVersion::Extended => vec![
                self.brand.into(),
                self.model.into(),
                self.trim.into(),
                self.color.into(),
                self.model_year.into(),
                self.year.into(),
                self.price_local,
                self.price_fob.into(),
                self.markup,
                self.date.into(),
            ],
        }
    }
}

/// First `20xx` token in a trim description, or an empty string.
pub fn derive_model_year(trim: &str) -> String {
    RE_YEAR
        .find(trim)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn marked_up(raw: &str, policy: &MarkupPolicy) -> Cell {
    match parse_price(raw) {
        Some(price) => Cell::Number(policy.apply(price)),
        None => {
            if !raw.is_empty() {
                debug!(raw, "price is not numeric, leaving markup empty");
            }
            Cell::empty()
        }
    }
}

/// Maps raw records to rows for one schema generation and markup policy.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    schema: SchemaVersion,
    markup: MarkupPolicy,
}

impl Normalizer {
    pub fn new(schema: SchemaVersion, markup: MarkupPolicy) -> Self {
        Self { schema, markup }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn markup(&self) -> MarkupPolicy {
        self.markup
    }

    pub fn normalize(&self, record: &RawRecord, today: NaiveDate) -> CanonicalRow {
        let trim = record.text(Field::Trim);

        let mut model_year = record.text(Field::ModelYear);
        if model_year.is_empty() {
            model_year = derive_model_year(&trim);
        }
        let mut year = record.text(Field::Year);
        if year.is_empty() {
            year = model_year.clone();
        }

        let (price_local, price_fob, markup) = match self.schema {
            SchemaVersion::Legacy => {
                let raw = record.text(Field::Price);
                let local = parse_price(&raw)
                    .map_or_else(|| Cell::Text(raw.clone()), Cell::Number);
                let markup = marked_up(&raw, &self.markup);
                (local, String::new(), markup)
            }
            SchemaVersion::Extended => {
                let fob = record.text(Field::PriceFob);
                let markup = marked_up(&fob, &self.markup);
                (Cell::Text(record.text(Field::PriceCny)), fob, markup)
            }
        };

        let row = CanonicalRow {
            schema: self.schema,
            date: today.format(DATE_FORMAT).to_string(),
            brand: record.text(Field::Brand),
            model: record.text(Field::Model),
            trim,
            color: record.text(Field::Color),
            model_year,
            year,
            price_local,
            price_fob,
            markup,
        };
        trace!(?row, "normalized record");
        row
    }

    pub fn normalize_all(&self, records: &[RawRecord], today: NaiveDate) -> Vec<CanonicalRow> {
        records.iter().map(|r| self.normalize(r, today)).collect()
    }
}

//! Schema generations for extracted price lists.
//!
//! A generation fixes the prompt, the output bound, the sheet header and the
//! default markup policy. The active generation is picked once from config.

use std::fmt;
use std::str::FromStr;

use crate::ai::prompts::{EXTENDED_PRICE_PROMPT, LEGACY_PRICE_PROMPT};
use crate::pricing::{MarkupPolicy, Rounding, DEFAULT_MARKUP_PERCENT};

const LEGACY_HEADER: [&str; 7] = [
    "Бренд",
    "Модель",
    "Комплектация",
    "Цвет",
    "Цена завода (USD)",
    "Цена +5%",
    "Дата обновления",
];

const EXTENDED_HEADER: [&str; 10] = [
    "Бренд",
    "Модель",
    "Версия",
    "Цвет",
    "Модельный год",
    "Год",
    "Цена завода (CNY)",
    "Цена FOB (USD)",
    "Цена FOB +5%",
    "Дата обновления",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    /// brand / model / trim / color / price
    #[default]
    Legacy,
    /// brand / model / version / color / model_year / year / price_cny / price_fob
    Extended,
}

impl SchemaVersion {
    pub fn prompt(self) -> &'static str {
        match self {
            SchemaVersion::Legacy => LEGACY_PRICE_PROMPT,
            SchemaVersion::Extended => EXTENDED_PRICE_PROMPT,
        }
    }

    /// Upper bound on the model's output tokens for one image.
    pub fn max_tokens(self) -> u32 {
        match self {
            SchemaVersion::Legacy => 4096,
            SchemaVersion::Extended => 8096,
        }
    }

    /// Labels the first row of the destination sheet must carry.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            SchemaVersion::Legacy => &LEGACY_HEADER,
            SchemaVersion::Extended => &EXTENDED_HEADER,
        }
    }

    pub fn header_row(self) -> Vec<String> {
        self.header().iter().map(|s| s.to_string()).collect()
    }

    pub fn default_rounding(self) -> Rounding {
        match self {
            SchemaVersion::Legacy => Rounding::NearestInteger,
            SchemaVersion::Extended => Rounding::NearestHundred,
        }
    }

    pub fn default_markup(self) -> MarkupPolicy {
        MarkupPolicy::new(DEFAULT_MARKUP_PERCENT, self.default_rounding())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "v1" => Ok(SchemaVersion::Legacy),
            "extended" | "v2" => Ok(SchemaVersion::Extended),
            other => Err(format!("unknown price schema '{other}'")),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Legacy => f.write_str("legacy"),
            SchemaVersion::Extended => f.write_str("extended"),
        }
    }
}

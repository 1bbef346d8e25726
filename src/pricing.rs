//! Price coercion and markup rules.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

/// Markup applied when no percentage is configured.
pub const DEFAULT_MARKUP_PERCENT: f64 = 5.0;

const CURRENCY_SYMBOLS: [char; 6] = ['$', '¥', '￥', '€', '£', '₽'];

/// How a marked-up price is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    NearestInteger,
    NearestHundred,
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "1" => Ok(Rounding::NearestInteger),
            "hundred" | "100" => Ok(Rounding::NearestHundred),
            other => Err(format!("unknown rounding '{other}', expected 'integer' or 'hundred'")),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::NearestInteger => f.write_str("integer"),
            Rounding::NearestHundred => f.write_str("hundred"),
        }
    }
}

/// A fixed percentage markup plus its rounding rule, chosen once per deployment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkupPolicy {
    pub percent: f64,
    pub rounding: Rounding,
}

impl MarkupPolicy {
    pub fn new(percent: f64, rounding: Rounding) -> Self {
        Self { percent, rounding }
    }

    /// Multiplier applied to the base price, `1.05` for a 5% markup.
    pub fn multiplier(&self) -> f64 {
        1.0 + self.percent / 100.0
    }

    /// Raise `price` by the markup and round it. Halves go to the even
    /// neighbour, so `10.5` becomes `10` and `52.5` hundreds become `5200`.
    pub fn apply(&self, price: f64) -> f64 {
        let raised = price * self.multiplier();
        match self.rounding {
            Rounding::NearestInteger => raised.round_ties_even(),
            Rounding::NearestHundred => (raised / 100.0).round_ties_even() * 100.0,
        }
    }
}

/// Parse a price cell such as `"119,800"`, `"$ 14 700"` or `"¥95000"`.
///
/// Commas, then whitespace, then one leading currency symbol are removed
/// before parsing. Returns `None` for anything that is not a finite number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',')
        .filter(|c| !c.is_whitespace())
        .collect();
    let cleaned = cleaned
        .strip_prefix(CURRENCY_SYMBOLS.as_slice())
        .unwrap_or(&cleaned);

    let parsed = cleaned.parse::<f64>().ok().filter(|v| v.is_finite());
    trace!(raw, ?parsed, "parsed price");
    parsed
}

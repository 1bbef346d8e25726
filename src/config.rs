use std::env;

use anyhow::{anyhow, Context, Result};

use crate::ai::config::AiConfig;
use crate::pricing::{MarkupPolicy, Rounding, DEFAULT_MARKUP_PERCENT};
use crate::schema::SchemaVersion;

pub const DEFAULT_SHEET_NAME: &str = "Наташа готовые экспорт";

#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub credentials_json: Option<String>,
    pub access_token: Option<String>,
    pub api_url: Option<String>,
}

impl SheetsConfig {
    /// `None` when the spreadsheet id or both credential sources are missing.
    pub fn from_env() -> Option<Self> {
        let spreadsheet_id = non_empty_var("SPREADSHEET_ID")?;
        let credentials_json = non_empty_var("GOOGLE_CREDENTIALS_JSON");
        let access_token = non_empty_var("GOOGLE_ACCESS_TOKEN");
        if credentials_json.is_none() && access_token.is_none() {
            return None;
        }
        Some(Self {
            spreadsheet_id,
            sheet_name: non_empty_var("SHEET_NAME")
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            credentials_json,
            access_token,
            api_url: non_empty_var("SHEETS_API_URL"),
        })
    }
}

/// Process configuration, read once at startup and passed into constructors.
#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub ai: AiConfig,
    pub sheets: SheetsConfig,
    pub schema: SchemaVersion,
    pub markup: MarkupPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let telegram_token =
            non_empty_var("TELEGRAM_TOKEN").ok_or_else(|| anyhow!("TELEGRAM_TOKEN is not set"))?;
        let ai = AiConfig::from_env().ok_or_else(|| anyhow!("ANTHROPIC_API_KEY is not set"))?;
        let sheets = SheetsConfig::from_env().ok_or_else(|| {
            anyhow!(
                "SPREADSHEET_ID and GOOGLE_CREDENTIALS_JSON (or GOOGLE_ACCESS_TOKEN) must be set"
            )
        })?;

        let schema = match non_empty_var("PRICE_SCHEMA") {
            Some(v) => v.parse::<SchemaVersion>().map_err(|e| anyhow!(e))?,
            None => SchemaVersion::default(),
        };
        let percent = match non_empty_var("MARKUP_PERCENT") {
            Some(v) => v
                .trim()
                .parse::<f64>()
                .with_context(|| format!("MARKUP_PERCENT '{v}' is not a number"))?,
            None => DEFAULT_MARKUP_PERCENT,
        };
        let rounding = match non_empty_var("MARKUP_ROUNDING") {
            Some(v) => v.parse::<Rounding>().map_err(|e| anyhow!(e))?,
            None => schema.default_rounding(),
        };

        Ok(Self {
            telegram_token,
            ai,
            sheets,
            schema,
            markup: MarkupPolicy::new(percent, rounding),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

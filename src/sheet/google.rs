use std::sync::Arc;

use google_cloud_auth::credentials::CredentialsFile;
use google_cloud_auth::project::Config as AuthConfig;
use google_cloud_auth::token::DefaultTokenSourceProvider;
use google_cloud_token::{TokenSource, TokenSourceProvider};
use reqwest::{header::AUTHORIZATION, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::SheetsConfig;
use crate::error::SheetError;
use crate::normalize::Cell;
use crate::sheet::SheetSink;

pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

pub const SHEETS_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

/// How requests to the Sheets API are authorized.
#[derive(Clone)]
pub enum SheetsAuth {
    /// A ready OAuth access token.
    Token(String),
    /// Service-account credentials, refreshed by the token source.
    ServiceAccount(Arc<dyn TokenSource>),
}

impl SheetsAuth {
    pub async fn service_account(credentials_json: &str) -> Result<Self, SheetError> {
        let credentials = CredentialsFile::new_from_str(credentials_json)
            .await
            .map_err(|e| SheetError::Auth(e.to_string()))?;
        let config = AuthConfig::default().with_scopes(&SHEETS_SCOPES);
        let provider =
            DefaultTokenSourceProvider::new_with_credentials(config, Box::new(credentials))
                .await
                .map_err(|e| SheetError::Auth(e.to_string()))?;
        Ok(SheetsAuth::ServiceAccount(provider.token_source()))
    }

    async fn header_value(&self) -> Result<String, SheetError> {
        match self {
            SheetsAuth::Token(token) => Ok(format!("Bearer {token}")),
            SheetsAuth::ServiceAccount(source) => source
                .token()
                .await
                .map_err(|e| SheetError::Auth(e.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

/// A single tab of a Google spreadsheet, written through the Sheets v4 API.
#[derive(Clone)]
pub struct GoogleSheetsSink {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    sheet_name: String,
    auth: SheetsAuth,
}

impl GoogleSheetsSink {
    pub fn new(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        auth: SheetsAuth,
    ) -> Result<Self, SheetError> {
        let base_url = Url::parse(base_url).map_err(|_| SheetError::InvalidUrl(base_url.into()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            auth,
        })
    }

    /// Build the sink from config, authorizing with a static token when one
    /// is configured and with the service account otherwise.
    pub async fn from_config(config: &SheetsConfig) -> Result<Self, SheetError> {
        let auth = match (&config.access_token, &config.credentials_json) {
            (Some(token), _) => SheetsAuth::Token(token.clone()),
            (None, Some(json)) => SheetsAuth::service_account(json).await?,
            (None, None) => {
                return Err(SheetError::Auth(
                    "no Google credentials or access token configured".into(),
                ))
            }
        };
        let base = config.api_url.as_deref().unwrap_or(SHEETS_API_URL);
        Self::new(base, &config.spreadsheet_id, &config.sheet_name, auth)
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// The tab name quoted for A1 notation.
    fn quoted_sheet(&self) -> String {
        format!("'{}'", self.sheet_name.replace('\'', "''"))
    }

    fn url(&self, tail: &[&str]) -> Result<Url, SheetError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets"])
            .extend(tail);
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, SheetError> {
        let resp = request
            .header(AUTHORIZATION, self.auth.header_value().await?)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "Sheets API error");
            return Err(SheetError::Status { status, body });
        }
        Ok(resp)
    }

    async fn sheet_id(&self) -> Result<i64, SheetError> {
        let mut url = self.url(&[self.spreadsheet_id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        let meta: SpreadsheetMeta = self.send(self.http.get(url)).await?.json().await?;
        meta.sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.title == self.sheet_name)
            .map(|p| p.sheet_id)
            .ok_or_else(|| SheetError::MissingSheet(self.sheet_name.clone()))
    }
}

impl SheetSink for GoogleSheetsSink {
    #[instrument(level = "trace", skip(self), fields(sheet = %self.sheet_name))]
    async fn first_row(&self) -> Result<Vec<String>, SheetError> {
        let range = format!("{}!1:1", self.quoted_sheet());
        let url = self.url(&[self.spreadsheet_id.as_str(), "values", range.as_str()])?;
        let data: ValueRange = self.send(self.http.get(url)).await?.json().await?;
        let first = data.values.into_iter().next().unwrap_or_default();
        debug!(cells = first.len(), "read first row");
        Ok(first)
    }

    #[instrument(level = "trace", skip(self, row), fields(sheet = %self.sheet_name))]
    async fn insert_first_row(&self, row: &[String]) -> Result<(), SheetError> {
        let sheet_id = self.sheet_id().await?;
        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let body = serde_json::json!({
            "requests": [{
                "insertDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": 0,
                        "endIndex": 1
                    },
                    "inheritFromBefore": false
                }
            }]
        });
        self.send(self.http.post(self.url(&[batch.as_str()])?).json(&body))
            .await?;

        let range = format!("{}!A1", self.quoted_sheet());
        let mut url = self.url(&[self.spreadsheet_id.as_str(), "values", range.as_str()])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = serde_json::json!({ "values": [row] });
        self.send(self.http.put(url).json(&body)).await?;
        debug!(sheet_id, "inserted header row");
        Ok(())
    }

    #[instrument(
        level = "trace",
        skip(self, rows),
        fields(sheet = %self.sheet_name, count = rows.len())
    )]
    async fn append_rows(&self, rows: &[Vec<Cell>]) -> Result<(), SheetError> {
        let target = format!("{}:append", self.quoted_sheet());
        let mut url = self.url(&[self.spreadsheet_id.as_str(), "values", target.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = serde_json::json!({ "values": rows });
        self.send(self.http.post(url).json(&body)).await?;
        Ok(())
    }
}

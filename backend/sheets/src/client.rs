use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use intake_core::SinkError;

use crate::token::TokenProvider;

pub const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const SINK: &str = "google_sheets";

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

/// Thin REST client over the Drive and Sheets endpoints the sink uses.
pub struct SheetsClient {
    client: Client,
    tokens: Arc<TokenProvider>,
    drive_base: String,
    sheets_base: String,
}

impl SheetsClient {
    pub fn new(client: Client, tokens: Arc<TokenProvider>) -> Self {
        Self {
            client,
            tokens,
            drive_base: DRIVE_API.to_string(),
            sheets_base: SHEETS_API.to_string(),
        }
    }

    pub fn with_endpoints(mut self, drive_base: impl Into<String>, sheets_base: impl Into<String>) -> Self {
        self.drive_base = drive_base.into().trim_end_matches('/').to_string();
        self.sheets_base = sheets_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Id of the first non-trashed spreadsheet with exactly this name.
    pub async fn find_spreadsheet(&self, name: &str) -> Result<String, SinkError> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let request = self
            .client
            .get(format!("{}/files", self.drive_base))
            .query(&[("q", query.as_str()), ("fields", "files(id)"), ("pageSize", "1")]);

        let list: FileList = parse(self.send(request).await?).await?;
        let id = list
            .files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| unavailable(format!("spreadsheet {name:?} not found")))?;
        debug!(spreadsheet = name, id = %id, "Resolved spreadsheet");
        Ok(id)
    }

    pub async fn first_sheet_title(&self, spreadsheet_id: &str) -> Result<String, SinkError> {
        let request = self
            .client
            .get(format!("{}/spreadsheets/{spreadsheet_id}", self.sheets_base))
            .query(&[("fields", "sheets.properties.title")]);

        let spreadsheet: Spreadsheet = parse(self.send(request).await?).await?;
        spreadsheet
            .sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| unavailable(format!("spreadsheet {spreadsheet_id} has no sheets")))
    }

    /// Append one row after the last populated row of `sheet_title`.
    pub async fn append_row(&self, spreadsheet_id: &str, sheet_title: &str, row: [&str; 3]) -> Result<(), SinkError> {
        let range = urlencoding::encode(&a1_range(sheet_title)).into_owned();
        let request = self
            .client
            .post(format!(
                "{}/spreadsheets/{spreadsheet_id}/values/{range}:append",
                self.sheets_base
            ))
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }));

        self.send(request).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SinkError> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = format!("HTTP {status}: {body}");
        if status.is_client_error() {
            Err(SinkError::Rejected { sink: SINK.to_string(), message })
        } else {
            Err(unavailable(message))
        }
    }
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, SinkError> {
    response
        .json()
        .await
        .map_err(|e| unavailable(format!("unexpected response: {e}")))
}

fn unavailable(message: String) -> SinkError {
    SinkError::Unavailable { sink: SINK.to_string(), message }
}

/// A1 reference to the top-left cell of a sheet, quoting the title.
pub fn a1_range(sheet_title: &str) -> String {
    format!("'{}'!A1", sheet_title.replace('\'', "''"))
}

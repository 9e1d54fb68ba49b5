use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use intake_core::{ContactRecord, RecordSink, SinkError};

use crate::client::{SheetsClient, DRIVE_API, SHEETS_API};
use crate::credentials::ServiceAccountKey;
use crate::token::TokenProvider;

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub credentials_path: PathBuf,
    pub sheet_name: String,
    /// Skips the Drive lookup by name when set.
    pub sheet_id: Option<String>,
}

struct Target {
    api: SheetsClient,
    spreadsheet_id: String,
    sheet_title: String,
}

/// [`RecordSink`] that appends `[Name, Email, Phone]` rows to a spreadsheet.
///
/// Credentials and the target sheet are resolved on the first append, so the
/// service starts even when the key file is missing. A failed resolution is
/// retried on the next append.
pub struct SheetsSink {
    settings: SheetsSettings,
    client: Client,
    drive_base: String,
    sheets_base: String,
    target: OnceCell<Target>,
}

impl SheetsSink {
    pub fn new(settings: SheetsSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
            drive_base: DRIVE_API.to_string(),
            sheets_base: SHEETS_API.to_string(),
            target: OnceCell::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_endpoints(mut self, drive_base: impl Into<String>, sheets_base: impl Into<String>) -> Self {
        self.drive_base = drive_base.into();
        self.sheets_base = sheets_base.into();
        self
    }

    async fn target(&self) -> Result<&Target, SinkError> {
        self.target.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Target, SinkError> {
        let unavailable = |message: String| SinkError::Unavailable {
            sink: self.name().to_string(),
            message,
        };

        let key = ServiceAccountKey::from_file(&self.settings.credentials_path)
            .map_err(|e| unavailable(e.to_string()))?;
        let tokens = TokenProvider::new(self.client.clone(), key).map_err(|e| unavailable(e.to_string()))?;
        let api = SheetsClient::new(self.client.clone(), Arc::new(tokens))
            .with_endpoints(self.drive_base.clone(), self.sheets_base.clone());

        let spreadsheet_id = match &self.settings.sheet_id {
            Some(id) => id.clone(),
            None => api.find_spreadsheet(&self.settings.sheet_name).await?,
        };
        let sheet_title = api.first_sheet_title(&spreadsheet_id).await?;

        info!(
            spreadsheet = %self.settings.sheet_name,
            spreadsheet_id = %spreadsheet_id,
            sheet = %sheet_title,
            "Connected to Google Sheets"
        );
        Ok(Target {
            api,
            spreadsheet_id,
            sheet_title,
        })
    }
}

#[async_trait]
impl RecordSink for SheetsSink {
    fn name(&self) -> &str {
        "google_sheets"
    }

    async fn append(&self, record: &ContactRecord) -> Result<(), SinkError> {
        let target = self.target().await?;
        target
            .api
            .append_row(&target.spreadsheet_id, &target.sheet_title, record.to_row())
            .await?;
        debug!(spreadsheet_id = %target.spreadsheet_id, "Row appended");
        Ok(())
    }
}

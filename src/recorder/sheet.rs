use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::quiz::results::ResultRecord;
use crate::recorder::ResultRecorder;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Results kept in a Google spreadsheet, one row per session.
#[derive(Clone)]
pub struct SheetRecorder {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: String,
}

#[derive(Debug, serde::Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetRecorder {
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            access_token: access_token.into(),
        }
    }

    fn range(&self) -> String {
        format!("{}!A:F", self.sheet_name)
    }

    fn values_url(&self, last_segment: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid sheets API base {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Sheets API base {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", last_segment]);
        Ok(url)
    }

    fn lookup_url(&self) -> Result<Url> {
        let mut url = self.values_url(&self.range())?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE");
        Ok(url)
    }

    /// Cells are stored as sent, never parsed as formulas or numbers.
    fn append_url(&self) -> Result<Url> {
        let mut url = self.values_url(&format!("{}:append", self.range()))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        Ok(url)
    }

    async fn fetch_rows(&self) -> Result<Vec<Vec<Value>>> {
        let url = self.lookup_url()?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?;
        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }

    async fn append_rows(&self, rows: Vec<Vec<Value>>) -> Result<()> {
        let url = self.append_url()?;

        self.client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": rows }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl ResultRecorder for SheetRecorder {
    async fn last_accuracy(&self, name: &str) -> Result<Option<f64>> {
        let rows = self.fetch_rows().await?;
        last_accuracy_in(&rows, name)
    }

    async fn append(&self, record: &ResultRecord) -> Result<()> {
        let existing = self.fetch_rows().await?;
        self.append_rows(rows_to_append(&existing, record)).await?;

        log::debug!("Appended result of {} to sheet {}", record.name, self.sheet_name);
        Ok(())
    }
}

fn header_row() -> Vec<Value> {
    ResultRecord::HEADER.iter().map(|h| json!(h)).collect()
}

/// The header goes out with the first record of an empty sheet.
fn rows_to_append(existing: &[Vec<Value>], record: &ResultRecord) -> Vec<Vec<Value>> {
    let mut rows = Vec::with_capacity(2);
    if existing.is_empty() {
        rows.push(header_row());
    }
    rows.push(record_row(record));
    rows
}

fn record_row(record: &ResultRecord) -> Vec<Value> {
    vec![
        json!(record.name),
        json!(record.score),
        json!(record.attempted),
        json!(record.accuracy),
        json!(record.improvement),
        json!(record.timestamp),
    ]
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn last_accuracy_in(rows: &[Vec<Value>], name: &str) -> Result<Option<f64>> {
    let last = rows
        .iter()
        .filter(|row| row.first().and_then(cell_text).as_deref() == Some(name))
        .last();

    match last {
        None => Ok(None),
        Some(row) => row
            .get(3)
            .and_then(cell_number)
            .map(Some)
            .ok_or_else(|| Error::Sheet(format!("Row for {} has no readable accuracy", name))),
    }
}

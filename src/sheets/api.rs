//! Google Sheets REST client. Auth is a bearer token handed in through the
//! config; no credential flows happen here.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use tracing::info;

use super::grid::Grid;
use crate::config::Config;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// Dimensions of a freshly created week sheet
const NEW_SHEET_ROWS: u32 = 300;
const NEW_SHEET_COLS: u32 = 20;

pub struct SheetsClient {
    http: reqwest::Client,
    token: String,
    spreadsheet_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub title: String,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, cfg: &Config) -> Self {
        Self {
            http,
            token: cfg.sheets_token.clone(),
            spreadsheet_id: cfg.spreadsheet_id.clone(),
        }
    }

    /// All sheets in the spreadsheet, in creation order.
    pub async fn list_sheets(&self) -> Result<Vec<SheetProperties>> {
        let url = format!(
            "{}/{}?fields=sheets.properties",
            SHEETS_API, self.spreadsheet_id
        );
        let meta: SpreadsheetMeta = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()
            .context("Failed to list sheets")?
            .json()
            .await?;

        let mut sheets: Vec<SheetProperties> =
            meta.sheets.into_iter().map(|s| s.properties).collect();
        sheets.sort_by_key(|s| s.index);
        Ok(sheets)
    }

    pub async fn create_sheet(&self, title: &str, rows: u32, cols: u32) -> Result<()> {
        let url = format!("{}/{}:batchUpdate", SHEETS_API, self.spreadsheet_id);
        let body = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols },
                    }
                }
            }]
        });
        self.http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to create sheet {:?}", title))?;
        Ok(())
    }

    /// Pick the worksheet for this run: a fresh week sheet when the workout
    /// title marks the first day of the week, otherwise the newest sheet.
    pub async fn select_worksheet(
        &self,
        title: &str,
        first_day: &str,
        today: NaiveDate,
    ) -> Result<Worksheet<'_>> {
        if title == first_day {
            let name = week_title(today);
            info!("First day of the split: creating {:?}", name);
            self.create_sheet(&name, NEW_SHEET_ROWS, NEW_SHEET_COLS).await?;
            return Ok(Worksheet { client: self, title: name });
        }

        let sheets = self.list_sheets().await?;
        let last = sheets.last().context("Spreadsheet has no sheets")?;
        Ok(Worksheet {
            client: self,
            title: last.title.clone(),
        })
    }
}

/// Handle to one worksheet; implements [`Grid`] over the values endpoints.
pub struct Worksheet<'a> {
    client: &'a SheetsClient,
    pub title: String,
}

impl Grid for Worksheet<'_> {
    async fn read(&self, row: u32, col: u32) -> Result<String> {
        let range = a1(&self.title, row, col);
        let url = values_url(&self.client.spreadsheet_id, &range)?;
        let body: serde_json::Value = self
            .client
            .http
            .get(url)
            .bearer_auth(&self.client.token)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to read {}", range))?
            .json()
            .await?;

        // An unwritten cell comes back without a "values" key
        Ok(body["values"][0][0].as_str().unwrap_or_default().to_string())
    }

    async fn write(&mut self, row: u32, col: u32, value: &str) -> Result<()> {
        let range = a1(&self.title, row, col);
        let mut url = values_url(&self.client.spreadsheet_id, &range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = serde_json::json!({ "values": [[value]] });
        self.client
            .http
            .put(url)
            .bearer_auth(&self.client.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to write {}", range))?;
        Ok(())
    }
}

/// Name for a new week sheet. The split starts on Sunday, so any day other
/// than Monday belongs to the ISO week six days out.
pub fn week_title(today: NaiveDate) -> String {
    let week = if today.weekday().number_from_monday() == 1 {
        today.iso_week().week()
    } else {
        (today + Duration::days(6)).iso_week().week()
    };
    format!("Week {}", week)
}

/// A1 reference for a (row, col) pair, e.g. ("Week 45", 2, 2) → 'Week 45'!B2.
pub fn a1(sheet: &str, row: u32, col: u32) -> String {
    format!("'{}'!{}{}", sheet.replace('\'', "''"), col_letters(col), row)
}

fn col_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        letters.push(b'A' + ((col - 1) % 26) as u8);
        col = (col - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// URL of the values endpoint for one A1 range, with the range
/// percent-encoded as a path segment.
fn values_url(spreadsheet_id: &str, range: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(SHEETS_API).context("Invalid Sheets API base URL")?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Sheets API base URL cannot carry path segments"))?
        .push(spreadsheet_id)
        .push("values")
        .push(range);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_references() {
        assert_eq!(a1("Week 45", 2, 2), "'Week 45'!B2");
        assert_eq!(a1("Week 45", 12, 27), "'Week 45'!AA12");
        assert_eq!(a1("Bob's", 1, 1), "'Bob''s'!A1");
    }

    #[test]
    fn column_letters() {
        assert_eq!(col_letters(1), "A");
        assert_eq!(col_letters(26), "Z");
        assert_eq!(col_letters(27), "AA");
        assert_eq!(col_letters(52), "AZ");
    }

    #[test]
    fn values_url_encodes_the_range_segment() {
        let url = values_url("sheet-id", "'Week 45'!B2").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/'Week%2045'!B2"
        );
    }

    #[test]
    fn values_url_encodes_slashes_in_sheet_titles() {
        let url = values_url("sheet-id", "'Chest/Back'!B2").unwrap();
        assert!(url.path().ends_with("/values/'Chest%2FBack'!B2"));
    }

    #[test]
    fn monday_uses_the_current_week() {
        // 2018-11-05 was a Monday, ISO week 45
        let monday = NaiveDate::from_ymd_opt(2018, 11, 5).unwrap();
        assert_eq!(week_title(monday), "Week 45");
    }

    #[test]
    fn other_days_use_the_week_six_days_out() {
        // Wednesday of ISO week 45; six days out lands in week 46
        let wednesday = NaiveDate::from_ymd_opt(2018, 11, 7).unwrap();
        assert_eq!(week_title(wednesday), "Week 46");
    }
}

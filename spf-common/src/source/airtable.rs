//! Airtable REST client
//!
//! Lists every record of one table, following the `offset` cursor until the
//! API stops returning one.

use serde::Deserialize;
use std::time::Duration;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::AirtableSettings;
use crate::record::{FieldValue, Record};
use crate::{Error, Result};

const AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
const PAGE_SIZE: &str = "100";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const INITIAL_RETRY_BACKOFF: Duration = Duration::from_secs(1);
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);

/// Retries of one page request after HTTP 429 before giving up
pub const MAX_RATE_LIMIT_RETRIES: u32 = 5;

/// One page of `GET /v0/{base}/{table}`
#[derive(Debug, Deserialize)]
struct ListRecordsPage {
    records: Vec<AirtableRecord>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
}

impl AirtableRecord {
    fn into_record(self) -> Record {
        self.fields
            .into_iter()
            .map(|(column, value)| {
                let value = FieldValue::from_json(&value);
                (column, value)
            })
            .collect()
    }
}

/// Airtable table reader
pub struct AirtableClient {
    http: reqwest::Client,
    settings: AirtableSettings,
    base_url: String,
    retry_backoff: Duration,
}

impl AirtableClient {
    pub fn new(settings: AirtableSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            settings,
            base_url: AIRTABLE_API_URL.to_string(),
            retry_backoff: INITIAL_RETRY_BACKOFF,
        })
    }

    /// Point the client at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn table_url(&self) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid Airtable URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Airtable URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push(&self.settings.base_id)
            .push(&self.settings.table_name);
        Ok(url)
    }

    /// Initial wait after a rate-limited (429) response; doubles per retry
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Fetch every record's `fields` object as a [`Record`]
    pub async fn fetch_all_records(&self) -> Result<Vec<Record>> {
        let url = self.table_url()?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let (page_records, next) = self.fetch_page(&url, offset.as_deref()).await?;
            pages += 1;
            debug!(page = pages, records = page_records.len(), "Fetched Airtable page");

            records.extend(page_records);

            match next {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        info!(
            "Fetched {} records from Airtable table '{}' in {} page(s)",
            records.len(),
            self.settings.table_name,
            pages
        );
        Ok(records)
    }

    /// One page request, retrying rate-limited responses with exponential backoff
    async fn fetch_page(
        &self,
        url: &reqwest::Url,
        offset: Option<&str>,
    ) -> Result<(Vec<Record>, Option<String>)> {
        let mut attempt = 0u32;
        let mut backoff = self.retry_backoff;

        loop {
            attempt += 1;

            let mut request = self
                .http
                .get(url.clone())
                .bearer_auth(&self.settings.api_key)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(cursor) = offset {
                request = request.query(&[("offset", cursor)]);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS
                && attempt <= MAX_RATE_LIMIT_RETRIES
            {
                warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Airtable rate limit hit, will retry after backoff"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_RETRY_BACKOFF);
                continue;
            }

            let body = response.error_for_status()?.text().await?;
            return parse_page(&body);
        }
    }
}

/// Decode one list-records response body
pub fn parse_page(body: &str) -> Result<(Vec<Record>, Option<String>)> {
    let page: ListRecordsPage = serde_json::from_str(body)?;
    let records = page.records.into_iter().map(AirtableRecord::into_record).collect();
    Ok((records, page.offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AirtableSettings {
        AirtableSettings {
            api_key: "key".to_string(),
            base_id: "appXYZ".to_string(),
            table_name: "Speaker Prospects".to_string(),
        }
    }

    #[test]
    fn test_parse_page() {
        let body = r#"{
            "records": [
                {"id": "rec1", "createdTime": "2025-01-01T00:00:00.000Z",
                 "fields": {"Name": "Jane Doe", "Axel's rating": 94,
                            "Workshops": ["2511 Barclays Confirmed"]}},
                {"id": "rec2", "createdTime": "2025-01-01T00:00:00.000Z"}
            ],
            "offset": "itrNEXT"
        }"#;

        let (records, offset) = parse_page(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(offset.as_deref(), Some("itrNEXT"));
        assert_eq!(records[0].get("Axel's rating"), &FieldValue::Number(94.0));
        assert_eq!(
            records[0].get("Workshops"),
            &FieldValue::List(vec!["2511 Barclays Confirmed".to_string()])
        );
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_table_url_encodes_table_name() {
        let client = AirtableClient::new(settings()).unwrap();
        let url = client.table_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appXYZ/Speaker%20Prospects"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = AirtableClient::new(settings()).unwrap().with_base_url("not a url");
        assert!(matches!(client.table_url(), Err(Error::Config(_))));
    }
}

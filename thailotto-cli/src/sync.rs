use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use thailotto_db::models::{DrawRecord, TwoDigit};
use thailotto_db::store::HistoryStore;

pub const DEFAULT_API_URL: &str = "https://lotto.api.rayriffy.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const BACK_TWO_ID: &str = "runningNumberBackTwo";
const API_DATE_FORMATS: &[&str] = &["%d %B %Y", "%d %b %Y"];

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    response: ApiResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    date: String,
    running_numbers: Vec<RunningNumber>,
}

#[derive(Debug, Deserialize)]
struct RunningNumber {
    #[serde(default)]
    id: String,
    number: Vec<String>,
}

/// `Ok(None)` when the payload's date is not in an English layout
/// (the API sometimes answers with Thai calendar text).
pub fn parse_result(body: &str) -> Result<Option<DrawRecord>> {
    let envelope: ApiEnvelope =
        serde_json::from_str(body).context("unexpected API response structure")?;
    let response = envelope.response;

    let Some(date) = API_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(response.date.trim(), fmt).ok())
    else {
        info!(raw = %response.date, "skipping non-standard date format");
        return Ok(None);
    };

    let entry = response
        .running_numbers
        .iter()
        .find(|r| r.id == BACK_TWO_ID)
        .or_else(|| response.running_numbers.first())
        .context("API response has no running numbers")?;
    let raw_number = entry.number.first().context("running number entry is empty")?;
    let number: TwoDigit = raw_number
        .parse()
        .with_context(|| format!("API returned a malformed result for {date}"))?;

    Ok(Some(DrawRecord::new(date, number)))
}

pub struct ResultsClient {
    http: Client,
    base_url: String,
}

impl ResultsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, url: &str) -> Result<Option<String>> {
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;
        Ok(Some(resp.text()?))
    }

    pub fn fetch_latest(&self) -> Result<Option<DrawRecord>> {
        let url = format!("{}/latest", self.base_url);
        match self.get(&url)? {
            Some(body) => parse_result(&body),
            None => Ok(None),
        }
    }

    /// Result of the draw held on `date`, if there was one.
    pub fn fetch_on(&self, date: NaiveDate) -> Result<Option<DrawRecord>> {
        let url = format!("{}/lotto/{}", self.base_url, date.format("%Y-%m-%d"));
        match self.get(&url)? {
            Some(body) => parse_result(&body),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Added(DrawRecord),
    AlreadyCurrent(DrawRecord),
    Unavailable,
}

pub fn sync_latest(store: &mut dyn HistoryStore, client: &ResultsClient) -> Result<SyncOutcome> {
    info!("checking for new draw results");
    let Some(record) = client.fetch_latest()? else {
        return Ok(SyncOutcome::Unavailable);
    };
    if store.append(&record)? {
        info!(date = %record.date, number = %record.number, "new result added");
        Ok(SyncOutcome::Added(record))
    } else {
        info!("history already current");
        Ok(SyncOutcome::AlreadyCurrent(record))
    }
}

/// Fetches the same month/day over the `years` years before `anchor`.
/// Missing or failing years are skipped.
pub fn backfill(
    store: &mut dyn HistoryStore,
    client: &ResultsClient,
    anchor: NaiveDate,
    years: u32,
) -> Result<u32> {
    let pb = ProgressBar::new(years as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );

    let mut inserted = 0;
    for back in (1..=years as i32).rev() {
        let year = anchor.year() - back;
        pb.set_message(format!("{:02}/{:02}/{}", anchor.day(), anchor.month(), year));
        if let Some(date) = NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day()) {
            match client.fetch_on(date) {
                Ok(Some(record)) => {
                    if store.append(&record)? {
                        inserted += 1;
                    }
                }
                Ok(None) => debug!(%date, "no draw on this date"),
                Err(e) => warn!(%date, "backfill request failed: {:#}", e),
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("backfill done");
    Ok(inserted)
}

//! Yahoo Finance chart API price adapter.
//!
//! Issues `GET {base_url}/{symbol}?range=..&interval=..` and reads the first
//! chart result. Bar timestamps are UTC seconds; adding the exchange's
//! `gmtoffset` before truncating gives the local trading date.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::domain::error::ForecastError;
use crate::domain::price_series::PriceRecord;
use crate::domain::settings::ProviderSettings;
use crate::ports::price_port::{HistoryQuery, PricePort};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) nextclose";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug)]
pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::provider(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ForecastError> {
        Self::new(settings.base_url.clone(), settings.timeout)
    }

    pub fn build_url(&self, query: &HistoryQuery) -> String {
        format!(
            "{}/{}?range={}&interval={}",
            self.base_url,
            urlencoding::encode(&query.symbol),
            query.range(),
            query.interval.as_str()
        )
    }
}

fn trading_date(timestamp: i64, gmtoffset: i64) -> Result<NaiveDate, ForecastError> {
    DateTime::from_timestamp(timestamp.saturating_add(gmtoffset), 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| ForecastError::provider(format!("timestamp out of range: {timestamp}")))
}

/// Decode a chart response body into raw records. A missing or empty result
/// set is not an error here; the loader reports it as unavailable data.
pub fn parse_chart(json: &str) -> Result<Vec<PriceRecord>, ForecastError> {
    let response: ChartResponse = serde_json::from_str(json)
        .map_err(|e| ForecastError::provider(format!("malformed chart response: {e}")))?;

    if let Some(error) = response.chart.error {
        return Err(ForecastError::provider(format!(
            "chart API error [{}]: {}",
            error.code.as_deref().unwrap_or("unknown"),
            error.description.as_deref().unwrap_or("no description")
        )));
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let gmtoffset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if data.timestamp.len() != closes.len() {
        return Err(ForecastError::provider(format!(
            "chart response has {} timestamps but {} closes",
            data.timestamp.len(),
            closes.len()
        )));
    }

    data.timestamp
        .iter()
        .zip(closes)
        .map(|(&ts, close)| Ok(PriceRecord::new(trading_date(ts, gmtoffset)?, close)))
        .collect()
}

impl PricePort for YahooAdapter {
    fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, ForecastError> {
        let url = self.build_url(query);
        tracing::debug!(%url, "requesting chart");

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "chart request failed");
                ForecastError::provider(format!("request to chart API failed: {e}"))
            })?;

        let body = response
            .text()
            .map_err(|e| ForecastError::provider(format!("failed to read chart response: {e}")))?;

        let records = parse_chart(&body)?;
        tracing::info!(symbol = %query.symbol, records = records.len(), "fetched price history");
        Ok(records)
    }
}

//! CSV file price adapter.
//!
//! Reads `<base_path>/<symbol>.csv` (a leading `^` is dropped from the file
//! name) with a `date,close` header. An empty, `null` or `NaN` close is a
//! missing close. The lookback window is anchored on the newest row, so a
//! static file behaves like a provider queried on that day.

use crate::domain::error::ForecastError;
use crate::domain::price_series::PriceRecord;
use crate::ports::price_port::{HistoryQuery, PricePort};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", symbol.trim_start_matches('^')))
    }
}

fn parse_close(raw: &str, line: usize) -> Result<Option<f64>, ForecastError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|e| ForecastError::provider(format!("invalid close on line {line}: {e}")))
}

impl PricePort for CsvAdapter {
    fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, ForecastError> {
        let path = self.csv_path(&query.symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| ForecastError::provider(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let line = i + 2;
            let record =
                result.map_err(|e| ForecastError::provider(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| ForecastError::provider(format!("missing date column on line {line}")))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                ForecastError::provider(format!("invalid date on line {line}: {e}"))
            })?;
            let close = parse_close(record.get(1).unwrap_or(""), line)?;

            records.push(PriceRecord::new(date, close));
        }

        let Some(newest) = records.iter().map(|r| r.date).max() else {
            tracing::debug!(path = %path.display(), "price file has no rows");
            return Ok(records);
        };
        let cutoff = newest - chrono::Duration::days(i64::from(query.lookback_days));
        records.retain(|r| r.date > cutoff);

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            %cutoff,
            "read price history"
        );
        Ok(records)
    }
}

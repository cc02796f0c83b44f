//! Series loader: fetches raw records and cleans them into a `PriceSeries`.
//!
//! Cleaning policy lives here and nowhere else:
//! - records without a finite close are dropped,
//! - remaining records are ordered by date,
//! - on a repeated date the later record in provider order wins.

use crate::domain::error::ForecastError;
use crate::domain::price_series::{PricePoint, PriceRecord, PriceSeries};
use crate::ports::price_port::{HistoryQuery, PricePort};

pub struct SeriesLoader<'a> {
    port: &'a dyn PricePort,
    query: HistoryQuery,
}

impl<'a> SeriesLoader<'a> {
    pub fn new(port: &'a dyn PricePort) -> Self {
        Self {
            port,
            query: HistoryQuery::daily_close(),
        }
    }

    pub fn query(&self) -> &HistoryQuery {
        &self.query
    }

    /// Fetch and clean. Every call hits the provider; nothing is cached.
    pub fn load_series(&self) -> Result<PriceSeries, ForecastError> {
        let records = self.port.fetch_history(&self.query)?;
        clean_records(&self.query.symbol, records)
    }
}

pub fn clean_records(symbol: &str, records: Vec<PriceRecord>) -> Result<PriceSeries, ForecastError> {
    let mut points: Vec<PricePoint> = records
        .iter()
        .filter_map(|r| {
            r.usable_close().map(|close| PricePoint {
                date: r.date,
                close,
            })
        })
        .collect();

    if points.is_empty() {
        return Err(ForecastError::DataUnavailable {
            symbol: symbol.to_string(),
        });
    }

    // Stable sort keeps provider order among equal dates, so the last of a
    // run of duplicates is the later record.
    points.sort_by_key(|p| p.date);
    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for p in points {
        match deduped.last_mut() {
            Some(prev) if prev.date == p.date => *prev = p,
            _ => deduped.push(p),
        }
    }

    PriceSeries::new(deduped)
}

#![allow(dead_code)]

use chrono::NaiveDate;
use nextclose::domain::error::ForecastError;
pub use nextclose::domain::price_series::PriceRecord;
use nextclose::ports::price_port::{HistoryQuery, PricePort};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted price source. Returns the same records (or error) on every call
/// and counts how often it was asked.
pub struct MockPricePort {
    pub records: Vec<PriceRecord>,
    pub error: Option<String>,
    pub delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            error: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_records(mut self, records: Vec<PriceRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_closes(self, closes: &[f64]) -> Self {
        self.with_records(records_from_closes("2024-01-01", closes))
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PricePort for MockPricePort {
    fn fetch_history(&self, _query: &HistoryQuery) -> Result<Vec<PriceRecord>, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(reason) = &self.error {
            return Err(ForecastError::DataProvider {
                reason: reason.clone(),
            });
        }
        Ok(self.records.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive calendar days starting at `start`, one per close.
pub fn records_from_closes(start: &str, closes: &[f64]) -> Vec<PriceRecord> {
    let start = parse_date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceRecord::new(start + chrono::Duration::days(i as i64), Some(close)))
        .collect()
}

pub fn linear_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

/// Cumulative sum of `steps` starting from `start`, one close per step.
pub fn walk_from_steps(start: f64, steps: &[f64]) -> Vec<f64> {
    steps
        .iter()
        .scan(start, |level, step| {
            *level += step;
            Some(*level)
        })
        .collect()
}

/// Seeded random walk with uniform steps in [-10, 10).
pub fn random_walk(n: usize, seed: u64, start: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let steps: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
    walk_from_steps(start, &steps)
}

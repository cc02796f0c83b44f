//! Price history port trait.

use crate::domain::error::ForecastError;
use crate::domain::price_series::PriceRecord;

/// Sampling interval requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

/// What to fetch: one symbol, a trailing window, one sampling interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub symbol: String,
    pub lookback_days: u32,
    pub interval: Interval,
}

impl HistoryQuery {
    pub const SYMBOL: &'static str = "^GSPC";
    pub const LOOKBACK_DAYS: u32 = 365;

    /// The fixed query used by the forecasting pipeline.
    pub fn daily_close() -> Self {
        Self {
            symbol: Self::SYMBOL.to_string(),
            lookback_days: Self::LOOKBACK_DAYS,
            interval: Interval::Daily,
        }
    }

    /// Provider range string for the lookback window ("1y" for a year).
    pub fn range(&self) -> String {
        if self.lookback_days % 365 == 0 {
            format!("{}y", self.lookback_days / 365)
        } else {
            format!("{}d", self.lookback_days)
        }
    }
}

/// Source of raw daily price records. Implementations return records in
/// whatever order the provider yields them; cleaning happens in the loader.
/// Transport or provider faults map to `ForecastError::DataProvider`.
pub trait PricePort {
    fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, ForecastError>;
}

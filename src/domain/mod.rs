//! Core domain types and logic.

pub mod arima;
pub mod error;
pub mod forecaster;
pub mod loader;
pub mod optimizer;
pub mod price_series;
pub mod settings;

//! Next-close forecaster and the load → fit → forecast pipeline.

use std::fmt;

use crate::domain::arima::{self, FittedModel, ModelSpec};
use crate::domain::error::ForecastError;
use crate::domain::loader::SeriesLoader;
use crate::domain::price_series::PriceSeries;
use crate::ports::price_port::PricePort;

/// Predicted next-period close, in the unit of the input series. Always
/// finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast(f64);

impl Forecast {
    pub(crate) fn new(value: f64) -> Result<Self, ForecastError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ForecastError::model_fit(format!("forecast is not finite ({value})")))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Stateless: holds only the model order.
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    spec: ModelSpec,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster {
    pub fn new() -> Self {
        Self {
            spec: ModelSpec::ARIMA_111,
        }
    }

    pub fn spec(&self) -> ModelSpec {
        self.spec
    }

    /// Fit the model without extracting the forecast, for reporting.
    pub fn fit(&self, series: &PriceSeries) -> Result<FittedModel, ForecastError> {
        arima::fit(self.spec, &series.closes())
    }

    /// The series is consumed: it belongs to this one invocation.
    pub fn predict_next_close(&self, series: PriceSeries) -> Result<Forecast, ForecastError> {
        self.fit(&series)?.forecast()
    }
}

/// Load a fresh series from `port` and forecast its next close.
pub fn forecast_next_close(port: &dyn PricePort) -> Result<Forecast, ForecastError> {
    let series = SeriesLoader::new(port).load_series()?;
    Forecaster::new().predict_next_close(series)
}

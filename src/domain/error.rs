//! Domain error types.

/// Top-level error type for nextclose.
///
/// The first four variants are the forecasting pipeline's own failure kinds
/// and are surfaced to callers unmodified. The rest come from the ambient
/// layers (series construction, configuration, I/O).
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("data provider error: {reason}")]
    DataProvider { reason: String },

    #[error("no usable price data for {symbol}")]
    DataUnavailable { symbol: String },

    #[error("insufficient data: have {observations} observations, need {minimum}")]
    InsufficientData { observations: usize, minimum: usize },

    #[error("model fit failed: {reason}")]
    ModelFit { reason: String },

    #[error("malformed price series: {reason}")]
    MalformedSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    pub(crate) fn provider(reason: impl Into<String>) -> Self {
        ForecastError::DataProvider {
            reason: reason.into(),
        }
    }

    pub(crate) fn model_fit(reason: impl Into<String>) -> Self {
        ForecastError::ModelFit {
            reason: reason.into(),
        }
    }
}

impl From<&ForecastError> for std::process::ExitCode {
    fn from(err: &ForecastError) -> Self {
        let code: u8 = match err {
            ForecastError::Io(_) => 1,
            ForecastError::ConfigParse { .. }
            | ForecastError::ConfigMissing { .. }
            | ForecastError::ConfigInvalid { .. } => 2,
            ForecastError::DataProvider { .. } => 3,
            ForecastError::DataUnavailable { .. }
            | ForecastError::InsufficientData { .. }
            | ForecastError::MalformedSeries { .. } => 4,
            ForecastError::ModelFit { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn messages_name_the_failure() {
        let err = ForecastError::InsufficientData {
            observations: 4,
            minimum: 13,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: have 4 observations, need 13"
        );

        let err = ForecastError::DataUnavailable {
            symbol: "^GSPC".into(),
        };
        assert_eq!(err.to_string(), "no usable price data for ^GSPC");
    }

    #[test]
    fn exit_codes_distinguish_error_kinds() {
        let provider = ForecastError::provider("timeout");
        let fit = ForecastError::model_fit("did not converge");
        let config = ForecastError::ConfigMissing {
            section: "provider".into(),
            key: "csv_dir".into(),
        };

        assert_eq!(ExitCode::from(&provider), ExitCode::from(3));
        assert_eq!(ExitCode::from(&fit), ExitCode::from(5));
        assert_eq!(ExitCode::from(&config), ExitCode::from(2));
    }
}

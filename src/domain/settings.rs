//! Deployment settings and their validation.
//!
//! Only deployment concerns are configurable: which provider to use, how to
//! reach it, and where the web server listens. Symbol, lookback window and
//! model order are compile-time constants.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::ForecastError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSource {
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub source: ProviderSource,
    pub base_url: String,
    pub timeout: Duration,
    pub csv_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebSettings {
    pub listen: SocketAddr,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub web: WebSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                source: ProviderSource::Yahoo,
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
                csv_dir: None,
            },
            web: WebSettings {
                listen: SocketAddr::from(([0, 0, 0, 0], 8000)),
                request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
        }
    }
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ForecastError> {
        Ok(Self {
            provider: provider_settings(config)?,
            web: web_settings(config)?,
        })
    }
}

fn provider_settings(config: &dyn ConfigPort) -> Result<ProviderSettings, ForecastError> {
    let source = match config
        .get_string("provider", "source")
        .map(|s| s.trim().to_lowercase())
        .as_deref()
    {
        None | Some("yahoo") => ProviderSource::Yahoo,
        Some("csv") => ProviderSource::Csv,
        Some(other) => {
            return Err(invalid(
                "provider",
                "source",
                format!("unknown source '{other}' (expected yahoo or csv)"),
            ));
        }
    };

    let base_url = config
        .get_string("provider", "base_url")
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string());
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid("provider", "base_url", "must be an http(s) URL"));
    }

    let csv_dir = config
        .get_string("provider", "csv_dir")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    if source == ProviderSource::Csv && csv_dir.is_none() {
        return Err(ForecastError::ConfigMissing {
            section: "provider".into(),
            key: "csv_dir".into(),
        });
    }

    Ok(ProviderSettings {
        source,
        base_url,
        timeout: seconds(config, "provider", "timeout_secs", DEFAULT_PROVIDER_TIMEOUT_SECS)?,
        csv_dir,
    })
}

fn web_settings(config: &dyn ConfigPort) -> Result<WebSettings, ForecastError> {
    let listen_str = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    let listen = listen_str
        .trim()
        .parse::<SocketAddr>()
        .map_err(|e| invalid("web", "listen", e.to_string()))?;

    Ok(WebSettings {
        listen,
        request_timeout: seconds(config, "web", "request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?,
    })
}

/// A positive whole number of seconds. A non-numeric value is an error, not a
/// silent fallback to the default.
fn seconds(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u64,
) -> Result<Duration, ForecastError> {
    let secs = match config.get_string(section, key) {
        None => default,
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(section, key, "expected a whole number of seconds"))?,
    };
    if secs == 0 {
        return Err(invalid(section, key, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ForecastError {
    ForecastError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

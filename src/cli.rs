//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::ForecastError;
use crate::domain::forecaster::{Forecast, Forecaster};
use crate::domain::loader::SeriesLoader;
use crate::domain::settings::{ProviderSettings, ProviderSource, Settings};
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(
    name = "nextclose",
    version,
    about = "Forecast the next S&P 500 daily close with ARIMA(1,1,1)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the last year of closes and print the next-day forecast
    Forecast {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also print the fitted coefficients to stderr
        #[arg(long)]
        verbose: bool,
    },
    /// Show the loaded price series without fitting
    Series {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Forecast { config, verbose } => {
            run_forecast(config.as_deref(), verbose).map(|forecast| println!("{forecast}"))
        }
        Command::Series { config } => run_series(config.as_deref()).map(|line| println!("{line}")),
        Command::Serve { config } => run_serve(config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Settings from the INI file at `path`, or the built-in defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ForecastError> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            let config = FileConfigAdapter::from_file(path)?;
            Settings::from_config(&config)
        }
        None => Ok(Settings::default()),
    }
}

pub fn build_price_port(
    settings: &ProviderSettings,
) -> Result<Arc<dyn PricePort + Send + Sync>, ForecastError> {
    match settings.source {
        ProviderSource::Csv => {
            let dir = settings
                .csv_dir
                .clone()
                .ok_or_else(|| ForecastError::ConfigMissing {
                    section: "provider".into(),
                    key: "csv_dir".into(),
                })?;
            tracing::debug!(dir = %dir.display(), "using CSV price source");
            Ok(Arc::new(CsvAdapter::new(dir)))
        }
        #[cfg(feature = "yahoo")]
        ProviderSource::Yahoo => {
            tracing::debug!(base_url = %settings.base_url, "using Yahoo price source");
            Ok(Arc::new(
                crate::adapters::yahoo_adapter::YahooAdapter::from_settings(settings)?,
            ))
        }
        #[cfg(not(feature = "yahoo"))]
        ProviderSource::Yahoo => Err(ForecastError::ConfigInvalid {
            section: "provider".into(),
            key: "source".into(),
            reason: "built without the yahoo feature".into(),
        }),
    }
}

pub fn run_forecast(config_path: Option<&Path>, verbose: bool) -> Result<Forecast, ForecastError> {
    let settings = load_settings(config_path)?;
    let port = build_price_port(&settings.provider)?;

    let series = SeriesLoader::new(port.as_ref()).load_series()?;
    let model = Forecaster::new().fit(&series)?;

    if verbose {
        eprintln!("model:        {}", model.spec());
        eprintln!("observations: {}", model.observations());
        eprintln!("ar:           {:.6}", model.ar());
        eprintln!("ma:           {:.6}", model.ma());
        eprintln!("sigma2:       {:.6}", model.sigma2());
        match (model.log_likelihood(), model.aic()) {
            (Some(ll), Some(aic)) => {
                eprintln!("loglik:       {ll:.4}");
                eprintln!("aic:          {aic:.4}");
            }
            _ => eprintln!("loglik:       n/a (constant series)"),
        }
        eprintln!("iterations:   {}", model.iterations());
    }

    let forecast = model.forecast()?;
    tracing::info!(%forecast, observations = series.len(), "forecast computed");
    Ok(forecast)
}

/// One-line summary of the series the forecaster would see.
pub fn run_series(config_path: Option<&Path>) -> Result<String, ForecastError> {
    let settings = load_settings(config_path)?;
    let port = build_price_port(&settings.provider)?;
    let loader = SeriesLoader::new(port.as_ref());
    let series = loader.load_series()?;

    match (series.first(), series.last()) {
        (Some(first), Some(last)) => Ok(format!(
            "{}: {} closes, {} to {}, last close {:.2}",
            loader.query().symbol,
            series.len(),
            first.date,
            last.date,
            last.close
        )),
        _ => Err(ForecastError::DataUnavailable {
            symbol: loader.query().symbol.clone(),
        }),
    }
}

fn run_serve(config_path: Option<&Path>) -> Result<(), ForecastError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, serve};

        let settings = load_settings(config_path)?;
        let price_port = build_price_port(&settings.provider)?;
        // The blocking HTTP client must not be dropped on a runtime thread;
        // this handle keeps the last reference alive until after shutdown.
        let _outlive_runtime = Arc::clone(&price_port);

        let runtime = tokio::runtime::Runtime::new()?;
        eprintln!("Starting web server on {}", settings.web.listen);

        let state = AppState {
            price_port,
            request_timeout: settings.web.request_timeout,
        };
        runtime.block_on(serve(state, settings.web.listen))
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        Err(ForecastError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: "built without the web feature".into(),
        })
    }
}

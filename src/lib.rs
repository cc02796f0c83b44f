//! nextclose: next trading day S&P 500 close forecaster.
//!
//! Hexagonal architecture: series cleaning and the ARIMA(1,1,1) model in
//! [`domain`], port traits in [`ports`], price providers, configuration and
//! the web server in [`adapters`], command dispatch in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

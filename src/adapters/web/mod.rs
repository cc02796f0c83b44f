//! Web server adapter.
//!
//! Serves the forecast as an HTML page and as JSON. Every request runs the
//! full pipeline against a fresh fetch; nothing is cached between requests.

mod error;
mod handlers;
mod templates;

pub use error::{WebError, status_from_error};
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::error::ForecastError;
use crate::ports::price_port::PricePort;

pub struct AppState {
    pub price_port: Arc<dyn PricePort + Send + Sync>,
    pub request_timeout: Duration,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/forecast", get(handlers::api_forecast))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, listen: SocketAddr) -> Result<(), ForecastError> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

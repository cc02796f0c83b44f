//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::forecaster::{Forecast, forecast_next_close};
use crate::ports::price_port::HistoryQuery;

use super::{AppState, WebError};

#[derive(Debug, Serialize)]
pub struct ForecastBody {
    pub symbol: &'static str,
    pub forecast: f64,
}

/// Run the blocking pipeline off the async workers. On timeout the join
/// handle is dropped and whatever the task eventually returns is discarded.
async fn run_forecast(state: &AppState) -> Result<Forecast, WebError> {
    let port = Arc::clone(&state.price_port);
    let task = tokio::task::spawn_blocking(move || forecast_next_close(port.as_ref()));

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(result)) => {
            let forecast = result?;
            tracing::info!(%forecast, "forecast computed");
            Ok(forecast)
        }
        Ok(Err(join_err)) => {
            tracing::error!(error = %join_err, "forecast task failed");
            Err(WebError::internal())
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.request_timeout.as_secs_f64(),
                "forecast timed out"
            );
            Err(WebError::timeout())
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let forecast = run_forecast(&state).await?.to_string();
    let template = super::templates::ForecastTemplate {
        symbol: HistoryQuery::SYMBOL,
        forecast: &forecast,
    };
    let html = template.render().map_err(|e| {
        tracing::error!(error = %e, "failed to render forecast page");
        WebError::internal()
    })?;
    Ok(Html(html).into_response())
}

pub async fn api_forecast(State(state): State<Arc<AppState>>) -> Response {
    match run_forecast(&state).await {
        Ok(forecast) => Json(ForecastBody {
            symbol: HistoryQuery::SYMBOL,
            forecast: forecast.value(),
        })
        .into_response(),
        Err(err) => err.into_json_response(),
    }
}

pub async fn not_found() -> WebError {
    WebError::not_found()
}

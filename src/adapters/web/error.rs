//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::error::ForecastError;

/// A failed request. `message` is what the visitor sees; the underlying
/// error is logged where it is converted, never rendered.
#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "The requested page does not exist.")
    }

    pub fn timeout() -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            "The forecast took too long to compute. Please try again later.",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong while producing the forecast.",
        )
    }

    /// JSON rendering for `/api` routes.
    pub fn into_json_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            status: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn status_from_error(err: &ForecastError) -> StatusCode {
    match err {
        ForecastError::DataProvider { .. } => StatusCode::BAD_GATEWAY,
        ForecastError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ForecastError::InsufficientData { .. } | ForecastError::ModelFit { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ForecastError::MalformedSeries { .. }
        | ForecastError::ConfigParse { .. }
        | ForecastError::ConfigMissing { .. }
        | ForecastError::ConfigInvalid { .. }
        | ForecastError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_GATEWAY => "Market data could not be retrieved from the provider.",
        StatusCode::SERVICE_UNAVAILABLE => "No market data is available right now.",
        StatusCode::UNPROCESSABLE_ENTITY => "A forecast could not be produced from the available data.",
        _ => "Something went wrong while producing the forecast.",
    }
}

impl From<ForecastError> for WebError {
    fn from(err: ForecastError) -> Self {
        let status = status_from_error(&err);
        tracing::error!(error = %err, status = status.as_u16(), "forecast failed");
        Self::new(status, public_message(status))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = super::templates::ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

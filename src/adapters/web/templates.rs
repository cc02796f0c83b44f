//! HTML templates using Askama.

use askama::Template;

#[derive(Template)]
#[template(path = "forecast.html")]
pub struct ForecastTemplate<'a> {
    pub symbol: &'a str,
    /// Already rounded to two decimals.
    pub forecast: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

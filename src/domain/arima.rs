//! ARIMA(1,1,1) fitted by exact maximum likelihood.
//!
//! The series is differenced `d` times; the differences are modelled as a
//! zero-mean ARMA(1,1):
//!
//!   x[t] = φ·x[t-1] + e[t] + θ·e[t-1],   e ~ N(0, σ²)
//!
//! The exact Gaussian likelihood comes from a Kalman filter on the
//! state-space form with state (x[t], θ·e[t]), started from the stationary
//! covariance. σ² is concentrated out, leaving a two-parameter problem
//! solved with Nelder–Mead inside the box |φ|, |θ| <= 0.999 (stationary and
//! invertible). The one-step forecast on the differenced scale is the
//! filter's final state prediction; undoing the differencing maps it back to
//! price scale.

use std::f64::consts::PI;
use std::fmt;

use crate::domain::error::ForecastError;
use crate::domain::forecaster::Forecast;
use crate::domain::optimizer::NelderMead;

/// Largest admissible |φ| and |θ|.
pub const COEFFICIENT_BOUND: f64 = 0.999;

const START_AR_LIMIT: f64 = 0.9;

/// ARIMA order (p, d, q). Fixed at (1, 1, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    p: usize,
    d: usize,
    q: usize,
}

impl ModelSpec {
    pub const ARIMA_111: ModelSpec = ModelSpec { p: 1, d: 1, q: 1 };

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn q(&self) -> usize {
        self.q
    }

    /// Shortest series the fit accepts.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 10
    }

    /// Estimated parameters: AR and MA coefficients plus σ².
    pub fn parameter_count(&self) -> usize {
        self.p + self.q + 1
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Result of fitting `ModelSpec` to one series. Consumed by `forecast`.
#[derive(Debug, Clone)]
pub struct FittedModel {
    spec: ModelSpec,
    ar: f64,
    ma: f64,
    sigma2: f64,
    /// `None` when the differenced series is identically zero.
    log_likelihood: Option<f64>,
    iterations: usize,
    observations: usize,
    next_difference: f64,
    /// Last value of each lower-order difference, Δ⁰y .. Δ^(d-1)y.
    integration_tail: Vec<f64>,
}

impl FittedModel {
    pub fn spec(&self) -> ModelSpec {
        self.spec
    }

    pub fn ar(&self) -> f64 {
        self.ar
    }

    pub fn ma(&self) -> f64 {
        self.ma
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.log_likelihood
    }

    pub fn aic(&self) -> Option<f64> {
        self.log_likelihood
            .map(|ll| -2.0 * ll + 2.0 * self.spec.parameter_count() as f64)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of differenced observations the likelihood was computed on.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// One-step-ahead forecast on the original price scale.
    pub fn forecast(self) -> Result<Forecast, ForecastError> {
        let value = self.next_difference + self.integration_tail.iter().sum::<f64>();
        Forecast::new(value)
    }
}

/// Apply `order` rounds of first differencing.
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Last value of Δ^k y for k in 0..order. Summed with a forecast of Δ^order y
/// they give the forecast level.
fn integration_tail(data: &[f64], order: usize) -> Vec<f64> {
    let mut tail = Vec::with_capacity(order);
    let mut current = data.to_vec();
    for _ in 0..order {
        if let Some(last) = current.last() {
            tail.push(*last);
        }
        current = difference(&current, 1);
    }
    tail
}

#[derive(Debug, Clone, Copy)]
struct Filtered {
    neg_log_likelihood: f64,
    sigma2: f64,
    next_prediction: f64,
}

/// Kalman filter for zero-mean ARMA(1,1) with σ² concentrated out.
///
/// With no measurement noise the filter collapses to the innovations form:
/// prediction `x̂[t+1] = φ·x[t] + θ·v[t]/F[t]` and variance
/// `F[t+1] = 1 + θ² − θ²/F[t]`, started at the stationary variance
/// `F[1] = (1 + 2φθ + θ²)/(1 − φ²)`.
///
/// Returns `None` outside the admissible box or when the likelihood is
/// undefined.
fn filter(phi: f64, theta: f64, x: &[f64]) -> Option<Filtered> {
    if !(phi.abs() <= COEFFICIENT_BOUND && theta.abs() <= COEFFICIENT_BOUND) || x.is_empty() {
        return None;
    }

    let mut f = (1.0 + 2.0 * phi * theta + theta * theta) / (1.0 - phi * phi);
    let mut prediction = 0.0;
    let mut sum_sq = 0.0;
    let mut sum_log_f = 0.0;

    for &obs in x {
        if !(f.is_finite() && f > 0.0) {
            return None;
        }
        let v = obs - prediction;
        sum_sq += v * v / f;
        sum_log_f += f.ln();
        prediction = phi * obs + theta * v / f;
        f = 1.0 + theta * theta - theta * theta / f;
    }

    let n = x.len() as f64;
    let sigma2 = sum_sq / n;
    if !(sigma2.is_finite() && sigma2 > 0.0) {
        return None;
    }

    let neg_log_likelihood = 0.5 * n * ((2.0 * PI).ln() + sigma2.ln() + 1.0) + 0.5 * sum_log_f;
    if !neg_log_likelihood.is_finite() || !prediction.is_finite() {
        return None;
    }

    Some(Filtered {
        neg_log_likelihood,
        sigma2,
        next_prediction: prediction,
    })
}

/// Lag-1 autocorrelation about zero, clamped to a safe starting range.
fn starting_ar(x: &[f64]) -> f64 {
    let denom: f64 = x.iter().map(|v| v * v).sum();
    if denom <= 0.0 {
        return 0.0;
    }
    let num: f64 = x.windows(2).map(|w| w[0] * w[1]).sum();
    let r = num / denom;
    if !r.is_finite() {
        return 0.0;
    }
    r.clamp(-START_AR_LIMIT, START_AR_LIMIT)
}

/// Fit `spec` to `closes` (oldest first).
pub fn fit(spec: ModelSpec, closes: &[f64]) -> Result<FittedModel, ForecastError> {
    let required = spec.min_observations();
    if closes.len() < required {
        return Err(ForecastError::InsufficientData {
            observations: closes.len(),
            minimum: required,
        });
    }
    if closes.iter().any(|c| !c.is_finite()) {
        return Err(ForecastError::model_fit("series contains non-finite values"));
    }

    let diffs = difference(closes, spec.d);
    if diffs.iter().any(|x| !x.is_finite()) {
        return Err(ForecastError::model_fit("differenced series overflows f64"));
    }
    let tail = integration_tail(closes, spec.d);

    // A constant series differences to zeros: every (φ, θ) predicts zero
    // change and σ² is zero, so the likelihood has no maximum.
    if diffs.iter().all(|x| *x == 0.0) {
        return Ok(FittedModel {
            spec,
            ar: 0.0,
            ma: 0.0,
            sigma2: 0.0,
            log_likelihood: None,
            iterations: 0,
            observations: diffs.len(),
            next_difference: 0.0,
            integration_tail: tail,
        });
    }

    let objective = |params: &[f64]| match filter(params[0], params[1], &diffs) {
        Some(filtered) => filtered.neg_log_likelihood,
        None => f64::INFINITY,
    };
    let start = [starting_ar(&diffs), 0.0];
    let optimum = NelderMead::default().minimize(objective, &start);

    if !optimum.converged {
        return Err(ForecastError::model_fit(format!(
            "optimizer did not converge after {} iterations",
            optimum.iterations
        )));
    }
    if !optimum.value.is_finite() {
        return Err(ForecastError::model_fit("likelihood is not finite at the optimum"));
    }

    let (ar, ma) = (optimum.x[0], optimum.x[1]);
    if !(ar.is_finite() && ma.is_finite()) {
        return Err(ForecastError::model_fit(format!(
            "non-finite coefficient estimate (ar={ar}, ma={ma})"
        )));
    }

    let filtered = filter(ar, ma, &diffs)
        .ok_or_else(|| ForecastError::model_fit("likelihood undefined at fitted coefficients"))?;

    Ok(FittedModel {
        spec,
        ar,
        ma,
        sigma2: filtered.sigma2,
        log_likelihood: Some(-filtered.neg_log_likelihood),
        iterations: optimum.iterations,
        observations: diffs.len(),
        next_difference: filtered.next_prediction,
        integration_tail: tail,
    })
}

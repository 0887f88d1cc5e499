//! # Sample Covariance
//!
//! $$
//! \hat C(h)=\frac{1}{M(N-h)}\sum_{m=1}^{M}\sum_{n=0}^{N-h-1}\big(X^{(m)}_{n+h}-\hat\mu\big)\big(X^{(m)}_n-\hat\mu\big)^{\mathsf T}
//! $$
//!
//! Empirical moments of a batch of realizations of a stationary process,
//! pooled over realizations and time.
//!
use ndarray::s;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::Result;
use crate::error::SimulationError;
use crate::stochastic::Realization;

fn check_batch(realizations: &[Realization]) -> Result<(usize, usize)> {
  let first = realizations
    .first()
    .ok_or_else(|| SimulationError::invalid_argument("no realizations given"))?;
  let shape = first.values().dim();
  if realizations.iter().any(|r| r.values().dim() != shape) {
    return Err(SimulationError::invalid_argument(
      "realizations must share their length and dimension",
    ));
  }
  Ok(shape)
}

/// Per-component mean over every realization and time point.
pub fn sample_mean(realizations: &[Realization]) -> Result<Array1<f64>> {
  let (n, d) = check_batch(realizations)?;
  let mut sum = Array1::<f64>::zeros(d);
  for r in realizations {
    sum += &r.values().sum_axis(Axis(0));
  }
  Ok(sum / (n * realizations.len()) as f64)
}

/// Cross-covariance `E[X(t + lag·Δt) X(t)ᵀ]` estimated from all pairs at
/// distance `lag` grid steps.
pub fn sample_covariance(realizations: &[Realization], lag: usize) -> Result<Array2<f64>> {
  let (n, d) = check_batch(realizations)?;
  if lag >= n {
    return Err(SimulationError::invalid_argument(format!(
      "lag {lag} must be shorter than the realization length {n}"
    )));
  }
  let mean = sample_mean(realizations)?;

  let mut acc = Array2::<f64>::zeros((d, d));
  for r in realizations {
    let centered = r.values() - &mean;
    let ahead = centered.slice(s![lag.., ..]);
    let behind = centered.slice(s![..n - lag, ..]);
    acc += &ahead.t().dot(&behind);
  }
  Ok(acc / ((n - lag) * realizations.len()) as f64)
}

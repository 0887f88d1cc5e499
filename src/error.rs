//! # Error
//!
//! $$
//! \text{construct}:\ \text{parameters}\to\text{model}\ \cup\ \{\text{InvalidArgument},\ \text{NumericalInstability}\}
//! $$
//!
use std::fmt;

use thiserror::Error;

/// Errors raised while building grids, models and generators.
///
/// Realizations never fail once a generator has been constructed, so every
/// variant is a construction-time failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
  /// Malformed construction parameter (non-positive step, scale or frequency,
  /// mismatched vector lengths, empty grids, invalid correlation matrix).
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A spectral matrix could not be regularized within tolerance.
  #[error("numerical instability: {0}")]
  NumericalInstability(String),
}

/// Kind of a [`SimulationError`], for callers that branch on the failure
/// class rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  InvalidArgument,
  NumericalInstability,
}

impl SimulationError {
  pub fn invalid_argument(msg: impl Into<String>) -> Self {
    Self::InvalidArgument(msg.into())
  }

  pub fn numerical_instability(msg: impl Into<String>) -> Self {
    Self::NumericalInstability(msg.into())
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
      Self::NumericalInstability(_) => ErrorKind::NumericalInstability,
    }
  }

  /// Message without the kind prefix.
  pub fn message(&self) -> &str {
    match self {
      Self::InvalidArgument(msg) | Self::NumericalInstability(msg) => msg,
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorKind::InvalidArgument => write!(f, "InvalidArgument"),
      ErrorKind::NumericalInstability => write!(f, "NumericalInstability"),
    }
  }
}

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;

/// Fails with [`SimulationError::InvalidArgument`] unless `value` is finite
/// and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(SimulationError::invalid_argument(format!(
      "{name} must be finite and > 0, got {value}"
    )))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_carries_kind_and_message() {
    let err = SimulationError::invalid_argument("step must be > 0");
    assert_eq!(err.to_string(), "invalid argument: step must be > 0");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.message(), "step must be > 0");

    let err = SimulationError::numerical_instability("eigenvalue -1 below tolerance");
    assert_eq!(err.kind(), ErrorKind::NumericalInstability);
    assert_eq!(err.kind().to_string(), "NumericalInstability");
  }

  #[test]
  fn ensure_positive_rejects_zero_negative_and_nan() {
    assert!(ensure_positive("step", 0.5).is_ok());
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
      let err = ensure_positive("step", bad).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::InvalidArgument);
      assert!(err.message().starts_with("step must be"));
    }
  }
}

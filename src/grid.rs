//! # Regular Grid
//!
//! $$
//! t_i = t_0 + i\,\Delta t,\qquad i=0,\dots,N-1
//! $$
//!
use std::fmt;

use ndarray::Array1;

use crate::error::ensure_positive;
use crate::error::Result;
use crate::error::SimulationError;

/// Immutable, equally spaced sequence of time stamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularGrid {
  start: f64,
  step: f64,
  count: usize,
}

impl RegularGrid {
  /// Builds the grid `start + i * step` for `i` in `0..count`.
  ///
  /// Fails with `InvalidArgument` when `step` is not strictly positive,
  /// `start` is not finite, or `count` is zero.
  pub fn new(start: f64, step: f64, count: usize) -> Result<Self> {
    if !start.is_finite() {
      return Err(SimulationError::invalid_argument(format!(
        "grid start must be finite, got {start}"
      )));
    }
    ensure_positive("grid step", step)?;
    if count == 0 {
      return Err(SimulationError::invalid_argument(
        "grid must contain at least one point",
      ));
    }

    Ok(Self { start, step, count })
  }

  pub fn start(&self) -> f64 {
    self.start
  }

  pub fn step(&self) -> f64 {
    self.step
  }

  pub fn count(&self) -> usize {
    self.count
  }

  /// Abscissa `i`, or `None` past the end of the grid.
  pub fn get(&self, i: usize) -> Option<f64> {
    (i < self.count).then(|| self.value(i))
  }

  /// Abscissa `i` without bounds checking; extrapolates past the end.
  #[inline]
  pub fn value(&self, i: usize) -> f64 {
    self.start + i as f64 * self.step
  }

  pub fn last(&self) -> f64 {
    self.value(self.count - 1)
  }

  /// Exclusive upper bound `start + count * step`.
  pub fn end(&self) -> f64 {
    self.value(self.count)
  }

  /// Distance between the first and the last abscissa.
  pub fn span(&self) -> f64 {
    self.step * (self.count - 1) as f64
  }

  pub fn values(&self) -> Array1<f64> {
    Array1::from_shape_fn(self.count, |i| self.value(i))
  }

  pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
    (0..self.count).map(|i| self.value(i))
  }
}

impl fmt::Display for RegularGrid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "RegularGrid(start={}, step={}, count={})",
      self.start, self.step, self.count
    )
  }
}

//! # Frequency Grid
//!
//! $$
//! F=\frac{1}{2\Delta t},\qquad \Delta f=\frac{F}{K},\qquad f_k=\left(k+\tfrac12\right)\Delta f,\quad k=0,\dots,K-1
//! $$
//!
//! The band `[0, F]` is cut into `K` bins represented by their midpoints.
//! The matching time grid has `K` points spaced `1/(2F)`, so one
//! realization covers a period-`1/Δf` window sampled exactly at Nyquist.
//!
use std::fmt;

use ndarray::Array1;

use crate::error::ensure_positive;
use crate::error::Result;
use crate::error::SimulationError;
use crate::grid::RegularGrid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyGrid {
  maximal_frequency: f64,
  time_grid: RegularGrid,
}

impl FrequencyGrid {
  /// Grid of `count` bins over `[0, maximal_frequency]`. The associated
  /// time grid starts at zero.
  pub fn new(maximal_frequency: f64, count: usize) -> Result<Self> {
    ensure_positive("maximal frequency", maximal_frequency)?;
    if count == 0 {
      return Err(SimulationError::invalid_argument(
        "frequency count must be at least 1",
      ));
    }
    let step = 0.5 / maximal_frequency;
    if !step.is_finite() {
      return Err(SimulationError::invalid_argument(format!(
        "maximal frequency {maximal_frequency:e} is too small to resolve a time step"
      )));
    }

    Ok(Self {
      maximal_frequency,
      time_grid: RegularGrid::new(0.0, step, count)?,
    })
  }

  /// Frequency discretization matching `grid`: Nyquist frequency of the
  /// grid step and one bin per grid point.
  pub fn from_time_grid(grid: &RegularGrid) -> Result<Self> {
    let maximal_frequency = 0.5 / grid.step();
    if !maximal_frequency.is_finite() {
      return Err(SimulationError::invalid_argument(format!(
        "grid step {:e} is too small to resolve a maximal frequency",
        grid.step()
      )));
    }

    Ok(Self {
      maximal_frequency,
      time_grid: *grid,
    })
  }

  pub fn maximal_frequency(&self) -> f64 {
    self.maximal_frequency
  }

  pub fn count(&self) -> usize {
    self.time_grid.count()
  }

  /// Start of the associated time grid.
  pub fn origin(&self) -> f64 {
    self.time_grid.start()
  }

  /// Bin width `Δf = F / K`.
  pub fn step(&self) -> f64 {
    self.maximal_frequency / self.count() as f64
  }

  /// Midpoint of bin `k`.
  #[inline]
  pub fn value(&self, k: usize) -> f64 {
    (k as f64 + 0.5) * self.step()
  }

  pub fn get(&self, k: usize) -> Option<f64> {
    (k < self.count()).then(|| self.value(k))
  }

  pub fn values(&self) -> Array1<f64> {
    Array1::from_shape_fn(self.count(), |k| self.value(k))
  }

  /// Time grid on which the discretized process is synthesized.
  pub fn time_grid(&self) -> RegularGrid {
    self.time_grid
  }
}

impl fmt::Display for FrequencyGrid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "FrequencyGrid(maximal_frequency={}, count={}, step={})",
      self.maximal_frequency,
      self.count(),
      self.step()
    )
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;

  use super::*;
  use crate::error::ErrorKind;

  #[test]
  fn time_grid_round_trips() {
    for (start, step, count) in [(0.0, 1.0 / 7.0, 8), (3.25, 0.001, 8192), (-1.0, 0.3, 1)] {
      let grid = RegularGrid::new(start, step, count).unwrap();
      let frequencies = FrequencyGrid::from_time_grid(&grid).unwrap();
      assert_eq!(frequencies.time_grid(), grid);
      assert_eq!(frequencies.count(), count);
      assert_relative_eq!(frequencies.maximal_frequency(), 0.5 / step, max_relative = 1e-15);
    }
  }

  #[test]
  fn band_limited_construction() {
    let grid = FrequencyGrid::new(10.0, 8).unwrap();
    assert_eq!(grid.count(), 8);
    assert_relative_eq!(grid.step(), 1.25);
    assert_eq!(grid.time_grid().start(), 0.0);
    assert_relative_eq!(grid.time_grid().step(), 0.05);
    assert_eq!(grid.time_grid().count(), 8);
  }

  #[test]
  fn midpoints_fill_the_band() {
    let grid = FrequencyGrid::new(2.0, 16).unwrap();
    let values = grid.values();
    assert_relative_eq!(values[0], grid.step() / 2.0);
    assert_relative_eq!(values[15], 2.0 - grid.step() / 2.0);
    assert!(values.iter().all(|&f| f > 0.0 && f < 2.0));
    assert_eq!(grid.get(16), None);
    // Δf Δt = 1/(2K)
    assert_abs_diff_eq!(grid.step() * grid.time_grid().step(), 1.0 / 32.0, epsilon = 1e-16);
  }

  #[test]
  fn rejects_degenerate_bands() {
    for (f, k) in [(0.0, 8), (-1.0, 8), (f64::NAN, 8), (f64::INFINITY, 8), (1.0, 0), (1e-320, 4)] {
      let err = FrequencyGrid::new(f, k).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
    let tiny = RegularGrid::new(0.0, 1e-320, 4).unwrap();
    assert_eq!(
      FrequencyGrid::from_time_grid(&tiny).unwrap_err().kind(),
      ErrorKind::InvalidArgument
    );
  }
}

//! # Exponential-Cauchy Model
//!
//! $$
//! C_{ij}(\tau)=a_ia_j\sum_k M_{ik}M_{jk}\,e^{-|\tau|/\theta_k},\qquad
//! S_{ij}(f)=a_ia_j\sum_k M_{ik}M_{jk}\,\frac{2\theta_k}{1+(2\pi\theta_k f)^2}
//! $$
//!
//! Linear model of coregionalization over exponential kernels with
//! `M Mᵀ = R`. Component `i` has variance `a_i²` and lag-zero correlation
//! `R_ij` with component `j`; for a single component the covariance is
//! `a² exp(-|τ|/θ)`.
//!
use std::fmt;

use ndarray::Array1;
use ndarray::Array2;
use num_complex::Complex64;

use super::cauchy_kernel;
use super::format_matrix;
use super::format_values;
use super::validate_parameters;
use super::validate_spatial_correlation;
use crate::error::Result;
use crate::linalg::psd_factor;
use crate::linalg::to_array2;
use crate::linalg::to_dmatrix;
use crate::linalg::DEFAULT_INDEFINITE_TOLERANCE;
use crate::linalg::DEFAULT_REGULARIZATION;
use crate::traits::CovarianceModelExt;
use crate::traits::SpectralModelExt;

#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialCauchy {
  scale: Array1<f64>,
  amplitude: Array1<f64>,
  spatial_correlation: Array2<f64>,
  /// Real factor `M` of the spatial correlation.
  mixing: Array2<f64>,
}

impl ExponentialCauchy {
  pub fn new(scale: &[f64], amplitude: &[f64]) -> Result<Self> {
    let (scale, amplitude) = validate_parameters(scale, amplitude)?;
    let d = scale.len();
    Ok(Self {
      scale,
      amplitude,
      spatial_correlation: Array2::eye(d),
      mixing: Array2::eye(d),
    })
  }

  pub fn with_spatial_correlation(
    scale: &[f64],
    amplitude: &[f64],
    spatial_correlation: Array2<f64>,
  ) -> Result<Self> {
    let (scale, amplitude) = validate_parameters(scale, amplitude)?;
    validate_spatial_correlation(&spatial_correlation, scale.len())?;
    let factor = psd_factor(
      &to_dmatrix(&spatial_correlation),
      DEFAULT_REGULARIZATION,
      DEFAULT_INDEFINITE_TOLERANCE,
    )?;

    Ok(Self {
      scale,
      amplitude,
      spatial_correlation,
      mixing: to_array2(&factor.factor),
    })
  }

  pub fn spatial_correlation(&self) -> &Array2<f64> {
    &self.spatial_correlation
  }

  pub fn mixing(&self) -> &Array2<f64> {
    &self.mixing
  }

  /// `a_i a_j Σ_k M_ik M_jk w_k`
  fn coregionalize(&self, weights: &Array1<f64>) -> Array2<f64> {
    let a = &self.amplitude;
    let m = &self.mixing;
    let d = self.dimension();
    Array2::from_shape_fn((d, d), |(i, j)| {
      let mut acc = 0.0;
      for k in 0..d {
        acc += (m[[i, k]] * m[[j, k]]) * weights[k];
      }
      (a[i] * a[j]) * acc
    })
  }
}

impl SpectralModelExt for ExponentialCauchy {
  fn dimension(&self) -> usize {
    self.amplitude.len()
  }

  fn amplitude(&self) -> &Array1<f64> {
    &self.amplitude
  }

  fn scale(&self) -> &Array1<f64> {
    &self.scale
  }

  fn spectral_density(&self, frequency: f64) -> Array2<Complex64> {
    let weights = self.scale.mapv(|theta| cauchy_kernel(theta, frequency));
    self
      .coregionalize(&weights)
      .mapv(|value| Complex64::new(value, 0.0))
  }
}

impl CovarianceModelExt for ExponentialCauchy {
  fn covariance(&self, tau: f64) -> Array2<f64> {
    let weights = self.scale.mapv(|theta| (-tau.abs() / theta).exp());
    self.coregionalize(&weights)
  }
}

impl fmt::Display for ExponentialCauchy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "ExponentialCauchy(amplitude={}, scale={}, spatial_correlation={})",
      format_values(&self.amplitude),
      format_values(&self.scale),
      format_matrix(&self.spatial_correlation)
    )
  }
}

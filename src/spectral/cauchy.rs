//! # Cauchy Model
//!
//! $$
//! S_{ij}(f)=R_{ij}\,a_ia_j\sqrt{c_{\theta_i}(f)\,c_{\theta_j}(f)},\qquad c_\theta(f)=\frac{2\theta}{1+(2\pi\theta f)^2}
//! $$
//!
//! Each marginal has a Cauchy spectral density; the coherence between two
//! components is the constant `R_ij`, so `S(f) = G(f) R G(f)` with
//! `G = diag(a_i sqrt(c_i))` stays positive semi-definite at every frequency.
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
use crate::traits::SpectralModelExt;

#[derive(Debug, Clone, PartialEq)]
pub struct CauchyModel {
  scale: Array1<f64>,
  amplitude: Array1<f64>,
  spatial_correlation: Array2<f64>,
}

impl CauchyModel {
  /// Independent components with scales `scale` and amplitudes `amplitude`.
  pub fn new(scale: &[f64], amplitude: &[f64]) -> Result<Self> {
    let (scale, amplitude) = validate_parameters(scale, amplitude)?;
    let spatial_correlation = Array2::eye(scale.len());
    Ok(Self {
      scale,
      amplitude,
      spatial_correlation,
    })
  }

  /// Components coupled through the coherence matrix `spatial_correlation`.
  pub fn with_spatial_correlation(
    scale: &[f64],
    amplitude: &[f64],
    spatial_correlation: Array2<f64>,
  ) -> Result<Self> {
    let (scale, amplitude) = validate_parameters(scale, amplitude)?;
    validate_spatial_correlation(&spatial_correlation, scale.len())?;
    Ok(Self {
      scale,
      amplitude,
      spatial_correlation,
    })
  }

  pub fn spatial_correlation(&self) -> &Array2<f64> {
    &self.spatial_correlation
  }
}

impl SpectralModelExt for CauchyModel {
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
    let a = &self.amplitude;
    let r = &self.spatial_correlation;
    let c = self.scale.mapv(|theta| cauchy_kernel(theta, frequency));

    Array2::from_shape_fn((self.dimension(), self.dimension()), |(i, j)| {
      let value = if i == j {
        r[[i, i]] * a[i] * a[i] * c[i]
      } else {
        r[[i, j]] * (a[i] * a[j]) * (c[i] * c[j]).sqrt()
      };
      Complex64::new(value, 0.0)
    })
  }
}

impl fmt::Display for CauchyModel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "CauchyModel(amplitude={}, scale={}, spatial_correlation={})",
      format_values(&self.amplitude),
      format_values(&self.scale),
      format_matrix(&self.spatial_correlation)
    )
  }
}

//! # Spectral Models
//!
//! $$
//! c_\theta(f)=\frac{2\theta}{1+(2\pi\theta f)^2}=\int_{\mathbb R} e^{-|\tau|/\theta}e^{-2\pi i f\tau}\,d\tau
//! $$
//!
//! | Module | Description |
//! |---|---|
//! | [`cauchy`] | Cauchy spectral model, components coupled through a coherence matrix. |
//! | [`exponential_cauchy`] | Exponential covariance with its Cauchy spectral density. |
//! | [`frequency`] | Frequency discretization and its time-grid inverse. |
//!
pub mod cauchy;
pub mod exponential_cauchy;
pub mod frequency;

use std::f64::consts::PI;
use std::fmt;

use ndarray::Array1;
use ndarray::Array2;
use num_complex::Complex64;

pub use self::cauchy::CauchyModel;
pub use self::exponential_cauchy::ExponentialCauchy;
pub use self::frequency::FrequencyGrid;
use crate::error::ensure_positive;
use crate::error::Result;
use crate::error::SimulationError;
use crate::linalg::hermitian_eigenvalues;
use crate::linalg::to_dmatrix;
use crate::traits::CovarianceModelExt;
use crate::traits::SpectralModelExt;

/// Tolerance on symmetry, unit diagonal and negative eigenvalues of a
/// spatial correlation matrix.
const CORRELATION_TOLERANCE: f64 = 1e-10;

/// Spectral density of `exp(-|τ|/θ)`.
#[inline]
pub fn cauchy_kernel(scale: f64, frequency: f64) -> f64 {
  let x = 2.0 * PI * scale * frequency;
  2.0 * scale / (1.0 + x * x)
}

/// Closed set of spectral models understood by the generators.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralModel {
  Cauchy(CauchyModel),
  ExponentialCauchy(ExponentialCauchy),
}

impl SpectralModel {
  pub fn name(&self) -> &'static str {
    match self {
      SpectralModel::Cauchy(_) => "CauchyModel",
      SpectralModel::ExponentialCauchy(_) => "ExponentialCauchy",
    }
  }

  /// Covariance view for models with a closed-form covariance.
  pub fn as_covariance_model(&self) -> Option<&dyn CovarianceModelExt> {
    match self {
      SpectralModel::Cauchy(_) => None,
      SpectralModel::ExponentialCauchy(model) => Some(model),
    }
  }

  pub fn spatial_correlation(&self) -> &Array2<f64> {
    match self {
      SpectralModel::Cauchy(model) => model.spatial_correlation(),
      SpectralModel::ExponentialCauchy(model) => model.spatial_correlation(),
    }
  }
}

impl SpectralModelExt for SpectralModel {
  fn dimension(&self) -> usize {
    match self {
      SpectralModel::Cauchy(model) => model.dimension(),
      SpectralModel::ExponentialCauchy(model) => model.dimension(),
    }
  }

  fn amplitude(&self) -> &Array1<f64> {
    match self {
      SpectralModel::Cauchy(model) => model.amplitude(),
      SpectralModel::ExponentialCauchy(model) => model.amplitude(),
    }
  }

  fn scale(&self) -> &Array1<f64> {
    match self {
      SpectralModel::Cauchy(model) => model.scale(),
      SpectralModel::ExponentialCauchy(model) => model.scale(),
    }
  }

  fn spectral_density(&self, frequency: f64) -> Array2<Complex64> {
    match self {
      SpectralModel::Cauchy(model) => model.spectral_density(frequency),
      SpectralModel::ExponentialCauchy(model) => model.spectral_density(frequency),
    }
  }
}

impl From<CauchyModel> for SpectralModel {
  fn from(model: CauchyModel) -> Self {
    SpectralModel::Cauchy(model)
  }
}

impl From<ExponentialCauchy> for SpectralModel {
  fn from(model: ExponentialCauchy) -> Self {
    SpectralModel::ExponentialCauchy(model)
  }
}

impl fmt::Display for SpectralModel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SpectralModel::Cauchy(model) => fmt::Display::fmt(model, f),
      SpectralModel::ExponentialCauchy(model) => fmt::Display::fmt(model, f),
    }
  }
}

/// Checks `(scale, amplitude)` and returns them as arrays.
pub(crate) fn validate_parameters(
  scale: &[f64],
  amplitude: &[f64],
) -> Result<(Array1<f64>, Array1<f64>)> {
  if amplitude.is_empty() {
    return Err(SimulationError::invalid_argument(
      "amplitude must contain at least one value",
    ));
  }
  if scale.len() != amplitude.len() {
    return Err(SimulationError::invalid_argument(format!(
      "scale and amplitude must have the same length, got {} and {}",
      scale.len(),
      amplitude.len()
    )));
  }
  for (i, (&s, &a)) in scale.iter().zip(amplitude).enumerate() {
    ensure_positive(&format!("scale[{i}]"), s)?;
    ensure_positive(&format!("amplitude[{i}]"), a)?;
    // peak density a²·2θ at f = 0
    if !((2.0 * s).is_finite() && (a * a).is_finite() && (a * a * 2.0 * s).is_finite()) {
      return Err(SimulationError::invalid_argument(format!(
        "scale[{i}] = {s:e} with amplitude[{i}] = {a:e} overflows the spectral density"
      )));
    }
  }

  Ok((Array1::from(scale.to_vec()), Array1::from(amplitude.to_vec())))
}

/// Checks that `r` is a `dimension × dimension` correlation matrix:
/// finite, symmetric, unit diagonal and positive semi-definite.
pub(crate) fn validate_spatial_correlation(r: &Array2<f64>, dimension: usize) -> Result<()> {
  if r.dim() != (dimension, dimension) {
    return Err(SimulationError::invalid_argument(format!(
      "spatial correlation must be {dimension}x{dimension}, got {}x{}",
      r.nrows(),
      r.ncols()
    )));
  }
  if r.iter().any(|x| !x.is_finite()) {
    return Err(SimulationError::invalid_argument(
      "spatial correlation contains non-finite entries",
    ));
  }
  for i in 0..dimension {
    if (r[[i, i]] - 1.0).abs() > CORRELATION_TOLERANCE {
      return Err(SimulationError::invalid_argument(format!(
        "spatial correlation diagonal must be 1, got {} at {i}",
        r[[i, i]]
      )));
    }
    for j in 0..i {
      if (r[[i, j]] - r[[j, i]]).abs() > CORRELATION_TOLERANCE {
        return Err(SimulationError::invalid_argument(format!(
          "spatial correlation must be symmetric, ({i}, {j}) differs from ({j}, {i})"
        )));
      }
    }
  }

  let smallest = hermitian_eigenvalues(&to_dmatrix(r))[0];
  if smallest < -CORRELATION_TOLERANCE {
    return Err(SimulationError::invalid_argument(format!(
      "spatial correlation must be positive semi-definite, smallest eigenvalue is {smallest:e}"
    )));
  }

  Ok(())
}

pub(crate) fn format_values(values: &Array1<f64>) -> String {
  let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
  format!("[{}]", items.join(", "))
}

pub(crate) fn format_matrix(matrix: &Array2<f64>) -> String {
  if *matrix == Array2::eye(matrix.nrows()) {
    return "identity".to_string();
  }
  let rows: Vec<String> = matrix
    .rows()
    .into_iter()
    .map(|row| format_values(&row.to_owned()))
    .collect();
  format!("[{}]", rows.join(", "))
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;
  use crate::error::ErrorKind;

  fn check_hermitian_psd(model: &SpectralModel, frequency: f64) {
    let s = model.spectral_density(frequency);
    let d = model.dimension();
    assert_eq!(s.dim(), (d, d));
    for i in 0..d {
      for j in 0..d {
        let diff = s[[i, j]] - s[[j, i]].conj();
        assert!(diff.norm() < 1e-14, "not Hermitian at f = {frequency}");
      }
    }
    let eigenvalues = hermitian_eigenvalues(&to_dmatrix(&s));
    let scale = eigenvalues.iter().fold(1e-300_f64, |m, l| m.max(l.abs()));
    assert!(
      eigenvalues[0] >= -1e-12 * scale,
      "negative eigenvalue {} at f = {frequency}",
      eigenvalues[0]
    );
  }

  fn models() -> Vec<SpectralModel> {
    let r = array![[1.0, 0.6, -0.3], [0.6, 1.0, 0.2], [-0.3, 0.2, 1.0]];
    let singular = array![[1.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    vec![
      ExponentialCauchy::new(&[1.0], &[1.0]).unwrap().into(),
      CauchyModel::new(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0])
        .unwrap()
        .into(),
      CauchyModel::with_spatial_correlation(&[0.5, 1.0, 4.0], &[1.0, 2.0, 0.5], r.clone())
        .unwrap()
        .into(),
      ExponentialCauchy::with_spatial_correlation(&[0.5, 1.0, 4.0], &[1.0, 2.0, 0.5], r)
        .unwrap()
        .into(),
      CauchyModel::with_spatial_correlation(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0], singular.clone())
        .unwrap()
        .into(),
      ExponentialCauchy::with_spatial_correlation(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0], singular)
        .unwrap()
        .into(),
    ]
  }

  #[test]
  fn every_variant_is_hermitian_psd() {
    for model in models() {
      for &f in &[0.0, 1e-3, 0.1, 0.5, 1.0, 3.5, 10.0, 250.0, -2.0] {
        check_hermitian_psd(&model, f);
      }
    }
  }

  #[test]
  fn scalar_models_match_the_closed_form() {
    for &(scale, amplitude) in &[(1.0, 1.0), (0.3, 2.5), (4.0, 0.1)] {
      let exp_cauchy = SpectralModel::from(ExponentialCauchy::new(&[scale], &[amplitude]).unwrap());
      let cauchy = SpectralModel::from(CauchyModel::new(&[scale], &[amplitude]).unwrap());
      for &f in &[0.0, 0.05, 0.7, 3.0, 42.0] {
        let expected = amplitude * amplitude * cauchy_kernel(scale, f);
        assert_relative_eq!(exp_cauchy.spectral_density(f)[[0, 0]].re, expected, max_relative = 1e-14);
        assert_relative_eq!(cauchy.scalar_spectral_density(f), expected, max_relative = 1e-14);
        assert_eq!(exp_cauchy.spectral_density(f)[[0, 0]].im, 0.0);
      }
    }
  }

  #[test]
  fn density_is_even_in_frequency() {
    for model in models() {
      let a = model.spectral_density(0.8);
      let b = model.spectral_density(-0.8);
      for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-15);
      }
    }
  }

  #[test]
  fn kernel_integrates_to_one() {
    // ∫ c_θ(f) df = 1 for every θ; midpoint sum on a wide band
    for &theta in &[0.5, 1.0, 2.0] {
      let band = 2000.0;
      let n = 400_000;
      let df = 2.0 * band / n as f64;
      let total: f64 = (0..n)
        .map(|k| cauchy_kernel(theta, -band + (k as f64 + 0.5) * df) * df)
        .sum();
      assert_abs_diff_eq!(total, 1.0, epsilon = 1e-3);
    }
  }

  #[test]
  fn parameter_validation() {
    let cases = vec![
      (vec![1.0, 1.0], vec![1.0]),
      (vec![], vec![]),
      (vec![0.0], vec![1.0]),
      (vec![1.0], vec![-1.0]),
      (vec![f64::NAN], vec![1.0]),
    ];
    for (scale, amplitude) in cases {
      assert_eq!(
        CauchyModel::new(&scale, &amplitude).unwrap_err().kind(),
        ErrorKind::InvalidArgument
      );
      assert_eq!(
        ExponentialCauchy::new(&scale, &amplitude).unwrap_err().kind(),
        ErrorKind::InvalidArgument
      );
    }
  }

  #[test]
  fn overflowing_peak_density_is_rejected() {
    for (scale, amplitude) in [(f64::MAX, 1.0), (1.0, 1e160), (1e200, 1e60)] {
      assert_eq!(
        CauchyModel::new(&[scale], &[amplitude]).unwrap_err().kind(),
        ErrorKind::InvalidArgument
      );
      assert_eq!(
        ExponentialCauchy::new(&[scale], &[amplitude]).unwrap_err().kind(),
        ErrorKind::InvalidArgument
      );
    }

    let wide = SpectralModel::from(CauchyModel::new(&[1e300], &[1e-160]).unwrap());
    for &f in &[0.0, 1.0, 1e10] {
      assert!(wide.spectral_density(f)[[0, 0]].re.is_finite());
    }
  }

  #[test]
  fn spatial_correlation_validation() {
    let bad = [
      array![[1.0, 0.5], [0.5, 1.0]],
      array![[1.0, 0.5, 0.0], [0.4, 1.0, 0.0], [0.0, 0.0, 1.0]],
      array![[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
      array![[1.0, 0.9, 0.9], [0.9, 1.0, -0.9], [0.9, -0.9, 1.0]],
    ];
    for r in bad {
      let err = CauchyModel::with_spatial_correlation(&[1.0; 3], &[1.0; 3], r.clone()).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::InvalidArgument);
      let err = ExponentialCauchy::with_spatial_correlation(&[1.0; 3], &[1.0; 3], r).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
  }

  #[test]
  fn names_display_and_covariance_view() {
    let cauchy = SpectralModel::from(CauchyModel::new(&[1.0, 2.0], &[1.0, 0.5]).unwrap());
    let exp_cauchy = SpectralModel::from(ExponentialCauchy::new(&[1.0], &[1.0]).unwrap());

    assert_eq!(cauchy.name(), "CauchyModel");
    assert_eq!(exp_cauchy.name(), "ExponentialCauchy");
    assert!(cauchy.as_covariance_model().is_none());
    assert!(exp_cauchy.as_covariance_model().is_some());

    assert_eq!(
      cauchy.to_string(),
      "CauchyModel(amplitude=[1, 0.5], scale=[1, 2], spatial_correlation=identity)"
    );
    assert_eq!(cauchy.to_string(), cauchy.clone().to_string());
  }
}

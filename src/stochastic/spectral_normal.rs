//! # Spectral Normal Process
//!
//! $$
//! X(t_n)=\operatorname{Re}\sum_{k=0}^{K-1} \sqrt{2\Delta f}\,e^{2\pi i f_k t_0}\,L(f_k)\,\zeta_k\,e^{2\pi i f_k n\Delta t},
//! \qquad L(f)L(f)^{\mathsf H}=S(f),\quad \zeta_k=\xi_k+i\eta_k
//! $$
//!
//! Stationary Gaussian process synthesized from its spectral density. The
//! factors `L(f_k)` are computed once per generator; every realization only
//! draws `2Kd` standard normals and evaluates the sum, by FFT or directly.
//!
//! The synthesized process has covariance
//! $C(\tau)=\sum_k 2\Delta f\,\operatorname{Re}\big(S(f_k)e^{2\pi i f_k\tau}\big)$,
//! see [`SpectralNormalProcess::discretized_covariance`].
//!
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use ndarray::s;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndrustfft::ndfft;
use ndrustfft::FftHandler;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use tracing::debug;
use tracing::warn;

use super::realization::Realization;
use crate::error::Result;
use crate::error::SimulationError;
use crate::grid::RegularGrid;
use crate::linalg::psd_factor;
use crate::linalg::to_array2;
use crate::linalg::to_dmatrix;
use crate::linalg::FactorKind;
use crate::linalg::DEFAULT_INDEFINITE_TOLERANCE;
use crate::linalg::DEFAULT_REGULARIZATION;
use crate::random::RandomSource;
use crate::spectral::FrequencyGrid;
use crate::spectral::SpectralModel;
use crate::traits::ProcessExt;
use crate::traits::SpectralModelExt;

/// How the spectral sum is evaluated on the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisMethod {
  /// Zero-padded FFT of length `2K`, `O(K log K)` per component.
  #[default]
  Fft,
  /// Explicit cosine/sine sum, `O(K²)` per component.
  Direct,
}

/// Configuration for [`SpectralNormalProcess`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralNormalConfig {
  /// Evaluation of the spectral sum.
  pub synthesis: SynthesisMethod,
  /// Eigenvalues of the correlation-normalized density below
  /// `regularization * λ_max` are treated as zero.
  pub regularization: f64,
  /// Negative correlation eigenvalues down to `-indefinite_tolerance * λ_max`
  /// are accepted as rounding noise.
  pub indefinite_tolerance: f64,
}

impl Default for SpectralNormalConfig {
  fn default() -> Self {
    Self {
      synthesis: SynthesisMethod::Fft,
      regularization: DEFAULT_REGULARIZATION,
      indefinite_tolerance: DEFAULT_INDEFINITE_TOLERANCE,
    }
  }
}

impl SpectralNormalConfig {
  fn validate(&self) -> Result<()> {
    for (name, value) in [
      ("regularization", self.regularization),
      ("indefinite tolerance", self.indefinite_tolerance),
    ] {
      if !(value.is_finite() && value >= 0.0) {
        return Err(SimulationError::invalid_argument(format!(
          "{name} must be finite and >= 0, got {value}"
        )));
      }
    }
    Ok(())
  }
}

/// Source of the frequency discretization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discretization {
  /// Nyquist band of the grid, one frequency per grid point.
  TimeGrid(RegularGrid),
  /// `count` frequencies over `[0, maximal_frequency]`, time grid from zero.
  Frequency {
    maximal_frequency: f64,
    count: usize,
  },
}

impl Discretization {
  pub fn resolve(&self) -> Result<FrequencyGrid> {
    match *self {
      Discretization::TimeGrid(grid) => FrequencyGrid::from_time_grid(&grid),
      Discretization::Frequency {
        maximal_frequency,
        count,
      } => FrequencyGrid::new(maximal_frequency, count),
    }
  }
}

impl From<RegularGrid> for Discretization {
  fn from(grid: RegularGrid) -> Self {
    Discretization::TimeGrid(grid)
  }
}

/// Generator of realizations of a stationary Gaussian process with a given
/// spectral model.
pub struct SpectralNormalProcess {
  model: Arc<SpectralModel>,
  frequency_grid: FrequencyGrid,
  /// `L(f_k)` stacked along the first axis, `K × d × d`.
  factors: Arc<Array3<Complex64>>,
  factor_kinds: Vec<FactorKind>,
  weights: Array1<Complex64>,
  /// `exp(-iπn/(2K))` for `n < K`.
  twiddles: Array1<Complex64>,
  fft_handler: Arc<FftHandler<f64>>,
  config: SpectralNormalConfig,
  random: Arc<RandomSource>,
}

impl SpectralNormalProcess {
  /// Generator on `grid`, drawing from [`RandomSource::global`].
  pub fn new(model: impl Into<SpectralModel>, grid: RegularGrid) -> Result<Self> {
    Self::with_config(
      Arc::new(model.into()),
      Discretization::TimeGrid(grid),
      SpectralNormalConfig::default(),
      RandomSource::global(),
    )
  }

  /// Generator resolving `count` frequencies up to `maximal_frequency`,
  /// drawing from [`RandomSource::global`].
  pub fn with_maximal_frequency(
    model: impl Into<SpectralModel>,
    maximal_frequency: f64,
    count: usize,
  ) -> Result<Self> {
    Self::with_config(
      Arc::new(model.into()),
      Discretization::Frequency {
        maximal_frequency,
        count,
      },
      SpectralNormalConfig::default(),
      RandomSource::global(),
    )
  }

  /// Validates every argument, then factorizes `S(f_k)` for all
  /// frequencies. The random source is not touched.
  pub fn with_config(
    model: Arc<SpectralModel>,
    discretization: Discretization,
    config: SpectralNormalConfig,
    random: Arc<RandomSource>,
  ) -> Result<Self> {
    config.validate()?;
    let frequency_grid = discretization.resolve()?;

    let d = model.dimension();
    let k = frequency_grid.count();
    let factored = (0..k)
      .into_par_iter()
      .map(|i| {
        let f = frequency_grid.value(i);
        psd_factor(
          &to_dmatrix(&model.spectral_density(f)),
          config.regularization,
          config.indefinite_tolerance,
        )
        .map_err(|err| match err {
          SimulationError::NumericalInstability(msg) => SimulationError::numerical_instability(
            format!("spectral density at frequency {f}: {msg}"),
          ),
          other => other,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    let mut factors = Array3::<Complex64>::zeros((k, d, d));
    let mut factor_kinds = Vec::with_capacity(k);
    for (mut slot, factor) in factors.outer_iter_mut().zip(&factored) {
      slot.assign(&to_array2(&factor.factor));
      factor_kinds.push(factor.kind);
    }

    let regularized = factor_kinds.iter().filter(|kind| kind.is_regularized()).count();
    if regularized > 0 {
      warn!(
        regularized,
        frequencies = k,
        model = model.name(),
        "spectral density matrices regularized through eigendecomposition"
      );
    }

    let df = frequency_grid.step();
    let origin = frequency_grid.origin();
    let amplitude = (2.0 * df).sqrt();
    let weights = Array1::from_shape_fn(k, |i| {
      Complex64::from_polar(amplitude, 2.0 * PI * frequency_grid.value(i) * origin)
    });
    let twiddles = Array1::from_shape_fn(k, |n| {
      Complex64::from_polar(1.0, -PI * n as f64 / (2 * k) as f64)
    });

    debug!(
      model = model.name(),
      dimension = d,
      frequencies = k,
      maximal_frequency = frequency_grid.maximal_frequency(),
      synthesis = ?config.synthesis,
      "spectral normal process ready"
    );

    Ok(Self {
      model,
      frequency_grid,
      factors: Arc::new(factors),
      factor_kinds,
      weights,
      twiddles,
      fft_handler: Arc::new(FftHandler::new(2 * k)),
      config,
      random,
    })
  }

  /// One realization on [`Self::time_grid`], drawing from the shared source.
  pub fn realization(&self) -> Realization {
    self.sample()
  }

  /// One realization drawing from a caller-owned stream.
  pub fn realization_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Realization {
    self.sample_with(rng)
  }

  pub fn model(&self) -> &Arc<SpectralModel> {
    &self.model
  }

  pub fn dimension(&self) -> usize {
    self.model.dimension()
  }

  /// Grid on which realizations are evaluated.
  pub fn time_grid(&self) -> RegularGrid {
    self.frequency_grid.time_grid()
  }

  pub fn frequency_grid(&self) -> &FrequencyGrid {
    &self.frequency_grid
  }

  pub fn maximal_frequency(&self) -> f64 {
    self.frequency_grid.maximal_frequency()
  }

  pub fn frequency_count(&self) -> usize {
    self.frequency_grid.count()
  }

  pub fn frequency_step(&self) -> f64 {
    self.frequency_grid.step()
  }

  /// Cached factor `L(f_k)`.
  pub fn factor(&self, k: usize) -> Option<ArrayView2<'_, Complex64>> {
    (k < self.frequency_count()).then(|| self.factors.index_axis(Axis(0), k))
  }

  pub fn factor_kinds(&self) -> &[FactorKind] {
    &self.factor_kinds
  }

  /// Number of frequencies whose factor needed the eigen fallback.
  pub fn regularized_frequencies(&self) -> usize {
    self
      .factor_kinds
      .iter()
      .filter(|kind| kind.is_regularized())
      .count()
  }

  pub fn config(&self) -> &SpectralNormalConfig {
    &self.config
  }

  /// Covariance `E[X(t+τ) X(t)ᵀ]` of the synthesized process, built from
  /// the cached factors.
  pub fn discretized_covariance(&self, tau: f64) -> Array2<f64> {
    let d = self.dimension();
    let df = self.frequency_step();
    let mut covariance = Array2::<f64>::zeros((d, d));
    for (k, l) in self.factors.outer_iter().enumerate() {
      let density = l.dot(&l.t().mapv(|z| z.conj()));
      let phase = Complex64::from_polar(2.0 * df, 2.0 * PI * self.frequency_grid.value(k) * tau);
      covariance.zip_mut_with(&density, |acc, &s| *acc += (s * phase).re);
    }
    covariance
  }

  /// `V_k = w_k L_k ζ_k`, laid out `K × d`.
  fn coefficients(&self, noise: &Array2<Complex64>) -> Array2<Complex64> {
    let mut coefficients = Array2::<Complex64>::zeros(noise.raw_dim());
    for (k, mut row) in coefficients.outer_iter_mut().enumerate() {
      let l = self.factors.index_axis(Axis(0), k);
      let w = self.weights[k];
      row.assign(&l.dot(&noise.row(k)).mapv(|z| z * w));
    }
    coefficients
  }

  fn synthesize_fft(&self, coefficients: &Array2<Complex64>) -> Array2<f64> {
    let (k, d) = coefficients.dim();
    let mut spectrum = Array2::<Complex64>::zeros((d, 2 * k));
    spectrum
      .slice_mut(s![.., ..k])
      .assign(&coefficients.t().mapv(|v| v.conj()));
    let mut transformed = Array2::<Complex64>::zeros((d, 2 * k));
    ndfft(&spectrum, &mut transformed, &*self.fft_handler, 1);

    Array2::from_shape_fn((k, d), |(n, j)| (self.twiddles[n] * transformed[[j, n]]).re)
  }

  fn synthesize_direct(&self, coefficients: &Array2<Complex64>) -> Array2<f64> {
    let (k, d) = coefficients.dim();
    let dt = self.time_grid().step();
    Array2::from_shape_fn((k, d), |(n, j)| {
      let t = n as f64 * dt;
      (0..k)
        .map(|m| {
          let (sin, cos) = (2.0 * PI * self.frequency_grid.value(m) * t).sin_cos();
          let v = coefficients[[m, j]];
          v.re * cos - v.im * sin
        })
        .sum()
    })
  }
}

impl ProcessExt for SpectralNormalProcess {
  /// `ζ_k` for every frequency, `K × d`.
  type Noise = Array2<Complex64>;
  type Output = Realization;

  fn random_source(&self) -> &RandomSource {
    &self.random
  }

  fn noise<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Noise {
    let mut noise = Array2::<Complex64>::zeros((self.frequency_count(), self.dimension()));
    for z in noise.iter_mut() {
      let re: f64 = rng.sample(StandardNormal);
      let im: f64 = rng.sample(StandardNormal);
      *z = Complex64::new(re, im);
    }
    noise
  }

  fn synthesize(&self, noise: Self::Noise) -> Self::Output {
    let coefficients = self.coefficients(&noise);
    let values = match self.config.synthesis {
      SynthesisMethod::Fft => self.synthesize_fft(&coefficients),
      SynthesisMethod::Direct => self.synthesize_direct(&coefficients),
    };
    Realization::new(self.time_grid(), values)
  }
}

impl fmt::Display for SpectralNormalProcess {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "SpectralNormalProcess(model={}, frequencies={}, time_grid={})",
      self.model,
      self.frequency_grid,
      self.time_grid()
    )
  }
}

impl fmt::Debug for SpectralNormalProcess {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SpectralNormalProcess")
      .field("model", &self.model)
      .field("frequency_grid", &self.frequency_grid)
      .field("config", &self.config)
      .field("regularized_frequencies", &self.regularized_frequencies())
      .finish_non_exhaustive()
  }
}

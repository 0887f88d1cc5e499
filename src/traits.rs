//! # Traits
//!
//! $$
//! \text{Trait contracts: }\ \text{model}\to S(f),\ C(\tau);\qquad \text{process}\to\text{samples}
//! $$
//!
use ndarray::Array1;
use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;
use rayon::prelude::*;

use crate::random::RandomSource;

/// Stationary second-order model described through its spectral density.
pub trait SpectralModelExt: Send + Sync {
  /// Number of jointly simulated components.
  fn dimension(&self) -> usize;

  fn amplitude(&self) -> &Array1<f64>;

  fn scale(&self) -> &Array1<f64>;

  /// Cross-spectral density matrix at `frequency`. Hermitian and positive
  /// semi-definite for every real frequency.
  fn spectral_density(&self, frequency: f64) -> Array2<Complex64>;

  /// Spectral density of a scalar model, or of the first component.
  fn scalar_spectral_density(&self, frequency: f64) -> f64 {
    self.spectral_density(frequency)[[0, 0]].re
  }
}

/// Model that also exposes a closed-form covariance function.
pub trait CovarianceModelExt: SpectralModelExt {
  /// Cross-covariance matrix `C(τ) = E[X(t+τ) X(t)ᵀ]`.
  fn covariance(&self, tau: f64) -> Array2<f64>;
}

/// Sampling contract for processes that draw their randomness from a shared
/// [`RandomSource`].
///
/// Randomness is drawn in [`ProcessExt::noise`] while the source is locked;
/// the deterministic [`ProcessExt::synthesize`] step runs outside the lock.
pub trait ProcessExt: Send + Sync {
  type Noise: Send;
  type Output: Send;

  fn random_source(&self) -> &RandomSource;

  fn noise<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Noise;

  fn synthesize(&self, noise: Self::Noise) -> Self::Output;

  fn sample(&self) -> Self::Output {
    let noise = self.random_source().with_rng(|rng| self.noise(rng));
    self.synthesize(noise)
  }

  /// Samples from a caller-owned stream, bypassing the shared source.
  fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Output {
    let noise = self.noise(rng);
    self.synthesize(noise)
  }

  /// `m` samples, each from its own stream split off the shared source.
  /// Produces exactly what [`ProcessExt::sample_par`] produces.
  fn sample_seq(&self, m: usize) -> Vec<Self::Output> {
    self
      .random_source()
      .split(m)
      .into_iter()
      .map(|mut rng| self.sample_with(&mut rng))
      .collect()
  }

  /// `m` samples in parallel. Each sample gets its own stream split off the
  /// shared source, so the result does not depend on thread scheduling.
  fn sample_par(&self, m: usize) -> Vec<Self::Output> {
    self
      .random_source()
      .split(m)
      .into_par_iter()
      .map(|mut rng| self.sample_with(&mut rng))
      .collect()
  }
}

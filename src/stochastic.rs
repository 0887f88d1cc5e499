//! # Stochastic Process Simulation Modules
//!
//! `stochastic` holds the spectral synthesis of stationary Gaussian
//! processes, scalar or vector valued.
//!
//! ## Modules
//!
//! | Module              | Description                                                                  |
//! |---------------------|------------------------------------------------------------------------------|
//! | [`spectral_normal`] | Generator of Gaussian realizations from a spectral model, FFT or direct sum. |
//! | [`realization`]     | Sample path on a regular grid, one column per component.                     |
//!
//! ## Parallelism
//!
//! Factorization of the spectral matrices runs on `rayon` at construction.
//! `sample_par(m)` realizes `m` paths in parallel, each from its own stream
//! split off the shared [`RandomSource`](crate::random::RandomSource), so the
//! batch does not depend on thread scheduling.
//!
//! ## Example Usage
//!
//! ```rust
//! use stochastic_spectral::grid::RegularGrid;
//! use stochastic_spectral::spectral::ExponentialCauchy;
//! use stochastic_spectral::stochastic::SpectralNormalProcess;
//!
//! let model = ExponentialCauchy::new(&[1.0], &[1.0])?;
//! let grid = RegularGrid::new(0.0, 1.0 / 7.0, 8)?;
//! let process = SpectralNormalProcess::new(model, grid)?;
//! let path = process.realization();
//! ```

pub mod realization;
pub mod spectral_normal;

pub use self::realization::Realization;
pub use self::spectral_normal::Discretization;
pub use self::spectral_normal::SpectralNormalConfig;
pub use self::spectral_normal::SpectralNormalProcess;
pub use self::spectral_normal::SynthesisMethod;
pub use crate::traits::ProcessExt;

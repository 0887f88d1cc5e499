//! # stochastic-spectral
//!
//! $$
//! X(t)=\operatorname{Re}\int_0^\infty e^{2\pi i f t}\,L(f)\,dZ(f),\qquad L(f)L(f)^{\mathsf H}=S(f)
//! $$
//!
//! Simulation of stationary Gaussian processes, scalar or vector valued,
//! by spectral synthesis on a regular time grid.
//!
//! ## Modules
//!
//! | Module         | Description                                                              |
//! |----------------|--------------------------------------------------------------------------|
//! | [`error`]      | `SimulationError` and the crate `Result`.                                |
//! | [`grid`]       | Regular time grids.                                                      |
//! | [`linalg`]     | Factorization of Hermitian positive semi-definite matrices.              |
//! | [`random`]     | Seedable, mutex-guarded standard normal source.                          |
//! | [`spectral`]   | Spectral models and frequency discretization.                            |
//! | [`stats`]      | Empirical moments of batches of realizations.                            |
//! | [`stochastic`] | Spectral normal process generator and realizations.                      |
//! | [`traits`]     | `SpectralModelExt`, `CovarianceModelExt` and `ProcessExt`.               |
//!
//! ## Logging
//!
//! Construction emits `tracing` events: `debug` once the factor cache is
//! ready, `warn` when spectral matrices needed the eigen fallback. Install
//! any subscriber to see them.
//!
pub mod error;
pub mod grid;
pub mod linalg;
pub mod random;
pub mod spectral;
pub mod stats;
pub mod stochastic;
pub mod traits;

pub use error::ErrorKind;
pub use error::Result;
pub use error::SimulationError;
pub use grid::RegularGrid;
pub use random::RandomSource;
pub use spectral::CauchyModel;
pub use spectral::ExponentialCauchy;
pub use spectral::FrequencyGrid;
pub use spectral::SpectralModel;
pub use stochastic::Realization;
pub use stochastic::SpectralNormalProcess;
pub use traits::CovarianceModelExt;
pub use traits::ProcessExt;
pub use traits::SpectralModelExt;

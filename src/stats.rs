//! # Stats
//!
//! $$
//! \hat\mu=\frac{1}{MN}\sum_{m=1}^{M}\sum_{n=0}^{N-1}X^{(m)}_n
//! $$
//!
pub mod covariance;

pub use self::covariance::sample_covariance;
pub use self::covariance::sample_mean;

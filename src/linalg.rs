//! # Linalg
//!
//! $$
//! S = LL^{\mathsf H},\qquad L=\begin{cases}\operatorname{chol}(S) & S\succ 0\\ V\,\max(\Lambda,0)^{1/2} & S=V\Lambda V^{\mathsf H}\end{cases}
//! $$
//!
//! Factorization of Hermitian positive semi-definite matrices, real or
//! complex. The matrix is first normalized to its correlation form
//! `C = D⁻¹ S D⁻¹`, `D = diag(√S_ii)`, so components of very different size
//! are judged on the same footing, and `L = D L_C`. Cholesky of `C` is
//! tried first; singular matrices fall back to an eigendecomposition where
//! eigenvalues of `C` below `regularization * max|λ|` are clamped to zero
//! and the matching columns of the factor become null directions. Zero
//! diagonal entries are null directions as well.
//!
use nalgebra::ComplexField;
use nalgebra::DMatrix;
use nalgebra::DVector;
use nalgebra::Scalar;
use nalgebra::SymmetricEigen;
use ndarray::Array2;

use crate::error::Result;
use crate::error::SimulationError;

/// Relative eigenvalue threshold under which a direction is treated as null.
pub const DEFAULT_REGULARIZATION: f64 = 1e-12;
/// Relative negative eigenvalue magnitude still accepted as rounding noise.
pub const DEFAULT_INDEFINITE_TOLERANCE: f64 = 1e-8;

/// Path taken to obtain a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
  /// Positive definite, plain Cholesky.
  Cholesky,
  /// Eigen fallback with `null_directions` clamped eigenvalues.
  Eigen { null_directions: usize },
  /// All-zero matrix.
  Zero,
}

impl FactorKind {
  pub fn is_regularized(&self) -> bool {
    !matches!(self, FactorKind::Cholesky)
  }
}

#[derive(Debug, Clone)]
pub struct PsdFactor<T: Scalar> {
  /// `L` with `L Lᴴ` equal to the (symmetrized) input.
  pub factor: DMatrix<T>,
  pub kind: FactorKind,
}

pub fn to_dmatrix<T: Scalar>(a: &Array2<T>) -> DMatrix<T> {
  DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]].clone())
}

pub fn to_array2<T: Scalar>(m: &DMatrix<T>) -> Array2<T> {
  Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)].clone())
}

/// Eigenvalues of the Hermitian part of `matrix`, ascending.
pub fn hermitian_eigenvalues<T>(matrix: &DMatrix<T>) -> DVector<f64>
where
  T: ComplexField<RealField = f64>,
{
  let eigen = SymmetricEigen::new(hermitian_part(matrix));
  let mut values = eigen.eigenvalues;
  values.as_mut_slice().sort_by(f64::total_cmp);
  values
}

fn hermitian_part<T>(matrix: &DMatrix<T>) -> DMatrix<T>
where
  T: ComplexField<RealField = f64>,
{
  let half = T::from_real(0.5);
  DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
    (matrix[(i, j)].clone() + matrix[(j, i)].clone().conjugate()) * half.clone()
  })
}

/// Computes `L` such that `L Lᴴ = matrix` for a Hermitian positive
/// semi-definite `matrix`.
///
/// Fails with `NumericalInstability` when the matrix has non-finite entries,
/// a negative diagonal, a nonzero entry next to a zero diagonal, or a
/// correlation eigenvalue below `-indefinite_tolerance * max|λ|`.
pub fn psd_factor<T>(
  matrix: &DMatrix<T>,
  regularization: f64,
  indefinite_tolerance: f64,
) -> Result<PsdFactor<T>>
where
  T: ComplexField<RealField = f64>,
{
  let n = matrix.nrows();
  if n != matrix.ncols() {
    return Err(SimulationError::invalid_argument(format!(
      "matrix must be square, got {}x{}",
      n,
      matrix.ncols()
    )));
  }
  if matrix.iter().any(|x| !x.is_finite()) {
    return Err(SimulationError::numerical_instability(
      "matrix contains non-finite entries",
    ));
  }

  let hermitian = hermitian_part(matrix);
  let max_abs = hermitian
    .iter()
    .map(|x| x.clone().modulus())
    .fold(0.0, f64::max);
  if max_abs == 0.0 {
    return Ok(PsdFactor {
      factor: DMatrix::zeros(n, n),
      kind: FactorKind::Zero,
    });
  }

  // S = D C D with D = diag(sqrt(S_ii)); zero diagonals give zero rows of D
  let diagonal = hermitian.diagonal().map(|x| x.real());
  let max_diagonal = diagonal.iter().fold(0.0_f64, |m, &x| m.max(x));
  let mut scales = DVector::<f64>::zeros(n);
  for (i, &s) in diagonal.iter().enumerate() {
    if s < -indefinite_tolerance * max_diagonal {
      return Err(SimulationError::numerical_instability(format!(
        "diagonal entry {i} is negative ({s:e})"
      )));
    }
    scales[i] = s.max(0.0).sqrt();
  }

  let mut correlation = DMatrix::<T>::zeros(n, n);
  for j in 0..n {
    for i in 0..n {
      let h = hermitian[(i, j)].clone();
      if scales[i] > 0.0 && scales[j] > 0.0 {
        correlation[(i, j)] = if i == j {
          T::from_real(1.0)
        } else {
          h * T::from_real(1.0 / scales[i]) * T::from_real(1.0 / scales[j])
        };
      } else if i != j && h.clone().modulus() > indefinite_tolerance * max_abs {
        return Err(SimulationError::numerical_instability(format!(
          "entry ({i}, {j}) is nonzero while its diagonal vanishes"
        )));
      }
    }
  }

  if scales.iter().all(|&s| s == 0.0) {
    return Ok(PsdFactor {
      factor: DMatrix::zeros(n, n),
      kind: FactorKind::Zero,
    });
  }

  let (mut factor, kind) = correlation_factor(correlation, regularization, indefinite_tolerance)?;
  for (i, &s) in scales.iter().enumerate() {
    let s = T::from_real(s);
    for j in 0..n {
      factor[(i, j)] = factor[(i, j)].clone() * s.clone();
    }
  }
  Ok(PsdFactor { factor, kind })
}

/// Factor of a matrix with unit or zero diagonal, so every threshold below
/// is on the scale of one.
fn correlation_factor<T>(
  correlation: DMatrix<T>,
  regularization: f64,
  indefinite_tolerance: f64,
) -> Result<(DMatrix<T>, FactorKind)>
where
  T: ComplexField<RealField = f64>,
{
  let n = correlation.nrows();
  if let Some(chol) = correlation.clone().cholesky() {
    let factor = chol.l();
    // a pivot this small means the matrix is singular up to rounding
    if (0..n).all(|i| factor[(i, i)].clone().modulus().powi(2) > regularization) {
      return Ok((factor, FactorKind::Cholesky));
    }
  }

  let eigen = SymmetricEigen::new(correlation);
  let scale = eigen.eigenvalues.iter().fold(0.0_f64, |m, l| m.max(l.abs()));
  let threshold = regularization * scale;

  let mut factor = eigen.eigenvectors;
  let mut null_directions = 0;
  for (j, &lambda) in eigen.eigenvalues.iter().enumerate() {
    if lambda < -indefinite_tolerance * scale {
      return Err(SimulationError::numerical_instability(format!(
        "eigenvalue {lambda:e} is below the tolerated negative bound {:e}",
        -indefinite_tolerance * scale
      )));
    }
    let weight = if lambda <= threshold {
      null_directions += 1;
      0.0
    } else {
      lambda.sqrt()
    };
    let w = T::from_real(weight);
    for i in 0..n {
      factor[(i, j)] = factor[(i, j)].clone() * w.clone();
    }
  }

  Ok((factor, FactorKind::Eigen { null_directions }))
}

//! Cholesky factorization and SPD linear solves.
//!
//! The closed-form GMV and tangency weights need `Σ⁻¹·b` for a symmetric
//! positive-definite Σ. A Cholesky factor is numerically stable and makes
//! degeneracy detection reliable: a non-positive pivot means Σ is singular
//! (or indefinite), which callers surface as `SingularCovariance`.

use crate::{FrontierError, Result};
use ndarray::{Array1, Array2};

/// Relative pivot tolerance: a pivot below this fraction of the largest
/// diagonal entry is treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Compute the lower-triangular Cholesky factor `L` with `L·Lᵀ = matrix`.
///
/// # Errors
/// - `DimensionMismatch` for non-square input.
/// - `SingularCovariance` when a pivot is non-positive within tolerance,
///   i.e. the matrix is not positive definite.
pub fn cholesky(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(FrontierError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let max_diag = (0..n).fold(0.0f64, |acc, i| acc.max(matrix[[i, i]].abs()));
    let threshold = PIVOT_TOLERANCE * max_diag.max(1.0);

    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut acc = matrix[[i, j]];
            for k in 0..j {
                acc -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if acc <= threshold {
                    return Err(FrontierError::SingularCovariance(format!(
                        "non-positive pivot {acc} at row {i}"
                    )));
                }
                l[[i, j]] = acc.sqrt();
            } else {
                l[[i, j]] = acc / l[[j, j]];
            }
        }
    }

    Ok(l)
}

/// Solve `matrix · x = rhs` for a symmetric positive-definite matrix via
/// Cholesky factorization and forward/back substitution.
///
/// # Errors
/// Same conditions as [`cholesky`], plus `DimensionMismatch` when `rhs`
/// does not match the matrix dimension.
pub fn solve_spd(matrix: &Array2<f64>, rhs: &Array1<f64>) -> Result<Array1<f64>> {
    let n = matrix.nrows();
    if rhs.len() != n {
        return Err(FrontierError::DimensionMismatch {
            expected: n,
            actual: rhs.len(),
        });
    }

    let l = cholesky(matrix)?;

    // Forward: L·y = rhs
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut acc = rhs[i];
        for k in 0..i {
            acc -= l[[i, k]] * y[k];
        }
        y[i] = acc / l[[i, i]];
    }

    // Back: Lᵀ·x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut acc = y[i];
        for k in (i + 1)..n {
            acc -= l[[k, i]] * x[k];
        }
        x[i] = acc / l[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cholesky_identity() {
        let l = cholesky(&Array2::eye(3)).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(l[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_reconstructs() {
        let m = Array2::from_shape_vec((2, 2), vec![4.0, 2.0, 2.0, 3.0]).unwrap();
        let l = cholesky(&m).unwrap();
        let reconstructed = l.dot(&l.t());
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(reconstructed[[i, j]], m[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_singular_matrix_detected() {
        // Rank-1 matrix: second row is a multiple of the first.
        let m = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        let err = cholesky(&m).unwrap_err();
        assert!(matches!(err, FrontierError::SingularCovariance(_)));
    }

    #[test]
    fn test_solve_spd() {
        let m = Array2::from_shape_vec((2, 2), vec![4.0, 2.0, 2.0, 3.0]).unwrap();
        let rhs = Array1::from_vec(vec![8.0, 7.0]);
        let x = solve_spd(&m, &rhs).unwrap();

        let check = m.dot(&x);
        assert_abs_diff_eq!(check[0], 8.0, epsilon = 1e-10);
        assert_abs_diff_eq!(check[1], 7.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let m = Array2::eye(2);
        let rhs = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let err = solve_spd(&m, &rhs).unwrap_err();
        assert!(matches!(err, FrontierError::DimensionMismatch { .. }));
    }
}

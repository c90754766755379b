//! Dense matrix helpers used by uncertainty consumers and the solvers.

use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Below this log-determinant a matrix is treated as singular.
pub const MIN_LOG_DETERMINANT: f64 = -32.0;

/// Result of [`matrix_inverse`].
#[derive(Clone, Debug)]
pub struct MatrixInverse {
    /// The inverse, or the zero matrix when the input is singular.
    pub inverse: DMatrix<f64>,
    /// Determinant of the input, always reported.
    pub determinant: f64,
}

impl MatrixInverse {
    /// True if the inverse was replaced by zeros.
    pub fn is_singular(&self) -> bool {
        !is_invertible(self.determinant)
    }
}

fn is_invertible(determinant: f64) -> bool {
    determinant.is_finite() && determinant.abs().ln() >= MIN_LOG_DETERMINANT
}

/// LU-based inverse of a square matrix.
///
/// A singular input (`ln|det|` below [`MIN_LOG_DETERMINANT`], or a
/// non-finite determinant) yields the zero matrix instead of Inf/NaN.
///
/// # Panics
/// If `a` is not square.
pub fn matrix_inverse(a: &DMatrix<f64>) -> MatrixInverse {
    assert!(a.is_square(), "matrix_inverse needs a square matrix");
    let n = a.nrows();
    let lu = a.clone().lu();
    let determinant = lu.determinant();

    let inverse = if is_invertible(determinant) {
        lu.try_inverse().unwrap_or_else(|| DMatrix::zeros(n, n))
    } else {
        log::trace!("matrix_inverse: singular input (det={determinant:e})");
        DMatrix::zeros(n, n)
    };

    MatrixInverse {
        inverse,
        determinant,
    }
}

/// Eigen-decomposition `a = R·D·Rᵗ` of a symmetric matrix.
#[derive(Clone, Debug)]
pub struct SymmetricDecomposition {
    /// Orthonormal eigenvectors, one per column.
    pub rotation: DMatrix<f64>,
    /// Eigenvalues, matching the columns of `rotation`.
    pub eigenvalues: DVector<f64>,
}

impl SymmetricDecomposition {
    /// The diagonal factor `D`.
    pub fn diagonal(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&self.eigenvalues)
    }

    /// Rebuild `R·D·Rᵗ`.
    pub fn reconstruct(&self) -> DMatrix<f64> {
        &self.rotation * self.diagonal() * self.rotation.transpose()
    }
}

/// Decompose a symmetric matrix; only the lower triangle is read.
///
/// # Panics
/// If `a` is not square.
pub fn symmetric_eigendecompose(a: &DMatrix<f64>) -> SymmetricDecomposition {
    assert!(a.is_square(), "symmetric_eigendecompose needs a square matrix");
    let eigen = SymmetricEigen::new(a.clone());
    SymmetricDecomposition {
        rotation: eigen.eigenvectors,
        eigenvalues: eigen.eigenvalues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_of_regular_matrix() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 7.0, 2.0, 6.0]);
        let inv = matrix_inverse(&a);
        assert_relative_eq!(inv.determinant, 10.0, epsilon = 1e-12);
        assert!(!inv.is_singular());
        let id = &a * &inv.inverse;
        assert_relative_eq!(id, DMatrix::identity(2, 2), epsilon = 1e-12);
    }

    #[test]
    fn test_singular_matrix_gives_zero_inverse() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let inv = matrix_inverse(&a);
        assert!(inv.is_singular());
        assert_relative_eq!(inv.determinant, 0.0, epsilon = 1e-12);
        assert!(inv.inverse.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tiny_determinant_is_singular() {
        let a = DMatrix::from_diagonal_element(3, 3, 1e-12);
        let inv = matrix_inverse(&a);
        assert!(inv.is_singular());
        assert!(inv.inverse.iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic]
    fn test_non_square_panics() {
        let a = DMatrix::<f64>::zeros(2, 3);
        let _ = matrix_inverse(&a);
    }

    #[test]
    fn test_eigendecompose_reconstructs() {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0]);
        let dec = symmetric_eigendecompose(&a);
        assert_relative_eq!(dec.reconstruct(), a, epsilon = 1e-9);
        let rrt = &dec.rotation * dec.rotation.transpose();
        assert_relative_eq!(rrt, DMatrix::identity(3, 3), epsilon = 1e-9);
    }
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin bridge between `ndarray` operators and the dense factorizations in `faer`.

use faer::diag::DiagRef;
use faer::linalg::solvers::{self, Solve};
use faer::{Mat, MatRef, Side};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use thiserror::Error;

/// Largest accepted condition number of a regularized operator.
pub const MAX_CONDITION_NUMBER: f64 = 1e12;

#[derive(Debug, Error)]
pub enum LinalgError {
    #[error("Cholesky factorization failed: {0:?}")]
    Cholesky(solvers::LltError),
    #[error("self-adjoint eigendecomposition failed: {0:?}")]
    SelfAdjointEigen(solvers::EvdError),
    #[error("operator is ill-conditioned (condition estimate {condition:.3e} exceeds {limit:.1e})")]
    IllConditioned { condition: f64, limit: f64 },
}

fn array_to_mat<S: Data<Elem = f64>>(array: &ArrayBase<S, Ix2>) -> Mat<f64> {
    Mat::from_fn(array.nrows(), array.ncols(), |i, j| array[[i, j]])
}

fn mat_to_array(mat: MatRef<'_, f64>) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((mat.nrows(), mat.ncols()));
    for j in 0..mat.ncols() {
        for i in 0..mat.nrows() {
            out[[i, j]] = mat[(i, j)];
        }
    }
    out
}

fn diag_to_array(diag: DiagRef<'_, f64>) -> Array1<f64> {
    let mat = diag.column_vector().as_mat();
    let mut out = Array1::<f64>::zeros(mat.nrows());
    for i in 0..mat.nrows() {
        out[i] = mat[(i, 0)];
    }
    out
}

/// Solve `A X = B` for a symmetric positive definite `A`.
///
/// The condition number is estimated from the Cholesky diagonal,
/// `cond(A) >= (max L_ii / min L_ii)^2`, and the solve is refused above
/// [`MAX_CONDITION_NUMBER`].
pub fn solve_spd<S1, S2>(
    a: &ArrayBase<S1, Ix2>,
    rhs: &ArrayBase<S2, Ix2>,
) -> Result<Array2<f64>, LinalgError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let a_mat = array_to_mat(a);
    let llt = a_mat
        .as_ref()
        .llt(Side::Lower)
        .map_err(LinalgError::Cholesky)?;

    let diag = diag_to_array(llt.L().diagonal());
    let lo = diag.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = diag.iter().cloned().fold(0.0_f64, f64::max);
    let condition = (hi / lo).powi(2);
    log::debug!("Cholesky condition estimate {:.3e} (n = {})", condition, diag.len());
    if !condition.is_finite() || condition > MAX_CONDITION_NUMBER {
        return Err(LinalgError::IllConditioned {
            condition,
            limit: MAX_CONDITION_NUMBER,
        });
    }

    let rhs_mat = array_to_mat(rhs);
    let solution = llt.solve(rhs_mat.as_ref());
    Ok(mat_to_array(solution.as_ref()))
}

/// Symmetric eigendecomposition with eigenvalues sorted in descending order.
///
/// Column `k` of the returned matrix is the eigenvector of eigenvalue `k`.
pub fn symmetric_eigen<S: Data<Elem = f64>>(
    a: &ArrayBase<S, Ix2>,
) -> Result<(Array1<f64>, Array2<f64>), LinalgError> {
    let a_mat = array_to_mat(a);
    let eigen = a_mat
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(LinalgError::SelfAdjointEigen)?;
    let values = diag_to_array(eigen.S());
    let vectors = mat_to_array(eigen.U());

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));

    let sorted_values = Array1::from_iter(order.iter().map(|&k| values[k]));
    let mut sorted_vectors = Array2::<f64>::zeros(vectors.raw_dim());
    for (dst, &src) in order.iter().enumerate() {
        sorted_vectors.column_mut(dst).assign(&vectors.column(src));
    }
    Ok((sorted_values, sorted_vectors))
}

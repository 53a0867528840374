// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Spectral Regularization of the Estimating Equation
//!
//! With `A = K/n` and `h = H/n` (see [`operator`](super::operator)) the
//! in-sample score solves `A β = −h`. `A` is positive semi-definite and
//! typically numerically singular, so each estimator here applies a spectral
//! filter g(σ) ≈ 1/σ to it:
//!
//! | Estimator | Filter | Regularizer |
//! |-----------|--------|-------------|
//! | [`Tikhonov`] / [`Nkef`] | 1/(σ + λ) | λ > 0 |
//! | [`Landweber`] | (1 − (1 − ησ)^T)/σ | iteration count T |
//! | [`NuMethod`] | Chebyshev-accelerated Landweber | iteration count T |
//! | [`Ssge`] | 1/σ on the leading r eigenvalues, 0 elsewhere | rank r |
//!
//! Every filter extends to arbitrary query points by replacing rows of the Gram
//! matrix with kernel evaluations at the query, which yields a
//! [`KernelExpansion`](crate::estimators::fitted::KernelExpansion) or an
//! [`EigenExpansion`](crate::estimators::fitted::EigenExpansion).

pub mod landweber;
pub mod nu_method;
pub mod ssge;
pub mod tikhonov;

pub use landweber::Landweber;
pub use nu_method::{NuMethod, NuSchedule};
pub use ssge::{RankSelection, Ssge};
pub use tikhonov::{Nkef, Tikhonov};

use crate::estimators::approaches::kernel::Kernel;
use crate::estimators::error::ScoreError;

/// Iterative filters converge only for a bounded kernel, 0 < η < 2 / sup k.
pub(crate) fn check_bounded_kernel(kernel: &Kernel) -> Result<f64, ScoreError> {
    kernel.max_value().ok_or_else(|| {
        ScoreError::invalid(
            "kernel",
            "iterative filters need a bounded kernel, the linear term is unbounded",
        )
    })
}

pub(crate) fn check_lam(lam: f64) -> Result<(), ScoreError> {
    if lam.is_finite() && lam > 0.0 {
        Ok(())
    } else {
        Err(ScoreError::invalid(
            "lam",
            format!("regularization must be positive and finite, got {lam}"),
        ))
    }
}

pub(crate) fn check_iterations(num_iterations: usize) -> Result<(), ScoreError> {
    if num_iterations == 0 {
        return Err(ScoreError::invalid("num_iterations", "must be at least 1"));
    }
    Ok(())
}

/// Iteration count standing in for a regularization strength `lam`:
/// `⌊lam^(−1/order)⌋ + 1`.
pub(crate) fn iterations_for_lam(lam: f64, order: f64) -> Result<usize, ScoreError> {
    check_lam(lam)?;
    let t = lam.powf(-1.0 / order).floor();
    if !t.is_finite() || t >= u32::MAX as f64 {
        return Err(ScoreError::invalid(
            "lam",
            format!("{lam} implies an unbounded number of iterations"),
        ));
    }
    Ok(t as usize + 1)
}

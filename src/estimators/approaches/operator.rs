// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Operator Assembly
//!
//! The Stein identity E_p[k(x, ·) ∇log p(x) + ∇ₓk(x, ·)] = 0 turns score
//! estimation into the linear equation L s = −ζ with
//!
//! L f = E_p[k(x, ·) f(x)],   ζ = E_p[∇ₓk(x, ·)].
//!
//! Replacing expectations by sample averages and evaluating at a set of basis
//! points z_1..z_m gives the Gram matrix `K[l, l'] = k(z_l, z_l')` and the
//! right-hand side `H[l, :] = Σ_i ∇k(x_i, z_l)`, one column per output dimension.
//! All solvers share this operator and right-hand side.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::Kernel;
use crate::estimators::error::ScoreError;

/// Gram matrix and gradient right-hand side over a set of basis points.
#[derive(Debug, Clone)]
pub struct EstimatingEquation {
    /// `k(z_l, z_l')`, shape (m, m)
    pub gram: Array2<f64>,
    /// `Σ_i ∇k(x_i, z_l)` over all n samples, shape (m, d)
    pub rhs: Array2<f64>,
    /// Number of samples the right-hand side was summed over
    pub n_samples: usize,
}

impl EstimatingEquation {
    /// Assemble the equation with the samples themselves as basis.
    pub fn assemble(kernel: &Kernel, samples: &SampleSet) -> Result<Self, ScoreError> {
        Self::assemble_on(kernel, samples, samples.view())
    }

    /// Assemble the equation over an arbitrary basis (e.g. landmarks), keeping
    /// every sample in the right-hand side.
    pub fn assemble_on(
        kernel: &Kernel,
        samples: &SampleSet,
        basis: ArrayView2<'_, f64>,
    ) -> Result<Self, ScoreError> {
        let gram = kernel.gram(basis, basis)?;
        let rhs = kernel.gradient(samples.view(), basis)?.sum_axis(Axis(0));
        log::debug!(
            "assembled estimating equation: basis {} x {}, {} samples",
            gram.nrows(),
            rhs.ncols(),
            samples.n()
        );
        Ok(Self {
            gram,
            rhs,
            n_samples: samples.n(),
        })
    }

    pub fn basis_size(&self) -> usize {
        self.gram.nrows()
    }

    /// `K + m λ I`
    pub fn regularized(&self, lam: f64) -> Array2<f64> {
        let m = self.basis_size();
        let mut a = self.gram.clone();
        a.diag_mut().mapv_inplace(|v| v + m as f64 * lam);
        a
    }

    /// Residual `A β + h` of the normalized equation, `A = K/m`, `h = H/n`.
    pub fn residual(&self, beta: &Array2<f64>) -> Array2<f64> {
        let m = self.basis_size() as f64;
        let n = self.n_samples as f64;
        self.gram.dot(beta) / m + &self.rhs / n
    }
}

/// Column sums of the kernel and of its mixed-derivative trace over the
/// samples at a set of points.
#[derive(Debug, Clone)]
pub struct KernelSums {
    /// `Σ_i k(x_i, p_j)`
    pub density: Array1<f64>,
    /// `Σ_i tr ∂²k(x_i, p_j)/∂x∂p`
    pub divergence: Array1<f64>,
}

impl KernelSums {
    pub fn evaluate(
        kernel: &Kernel,
        samples: ArrayView2<'_, f64>,
        points: ArrayView2<'_, f64>,
    ) -> Result<Self, ScoreError> {
        Ok(Self {
            density: kernel.gram(samples, points)?.sum_axis(Axis(0)),
            divergence: kernel.mixed_trace(samples, points)?.sum_axis(Axis(0)),
        })
    }
}

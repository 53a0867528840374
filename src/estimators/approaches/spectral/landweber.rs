// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Landweber iteration: gradient descent on the estimating equation with the
//! number of iterations T as regularizer.
//!
//! β₀ = 0, β_{t+1} = β_t − η(Aβ_t + h).
//!
//! Unrolling the recursion gives β_T = −η(A B + T h) with B = Σ_{t<T} β_t, so
//! out of sample
//!
//! ŝ(q) = −(η/n) [T Σ_i ∇k(x_i, q) + Σ_i k(x_i, q) B_i].

use ndarray::Array2;

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::{Bandwidth, Kernel, KernelType};
use crate::estimators::approaches::operator::EstimatingEquation;
use crate::estimators::approaches::spectral::{check_bounded_kernel, check_iterations, iterations_for_lam};
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::{FittedScore, KernelExpansion};
use crate::estimators::traits::ScoreEstimator;

/// Landweber-iteration kernel score estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Landweber {
    kernel: Kernel,
    num_iterations: usize,
    step_size: f64,
}

impl Landweber {
    /// Gaussian kernel, `num_iterations` steps of size 1.
    pub fn new(bandwidth: impl Into<Bandwidth>, num_iterations: usize) -> Result<Self, ScoreError> {
        Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?, num_iterations)
    }

    /// Fails for a kernel with the linear term, which has no finite step bound.
    pub fn new_with_kernel(kernel: Kernel, num_iterations: usize) -> Result<Self, ScoreError> {
        check_bounded_kernel(&kernel)?;
        check_iterations(num_iterations)?;
        Ok(Self {
            kernel,
            num_iterations,
            step_size: 1.0,
        })
    }

    /// Iteration count derived from a regularization strength, T = ⌊1/λ⌋ + 1.
    pub fn with_lam(bandwidth: impl Into<Bandwidth>, lam: f64) -> Result<Self, ScoreError> {
        Self::new(bandwidth, iterations_for_lam(lam, 1.0)?)
    }

    /// Set the step size η, which must satisfy 0 < η < 2 / sup k.
    pub fn with_step_size(mut self, step_size: f64) -> Result<Self, ScoreError> {
        let limit = 2.0 / check_bounded_kernel(&self.kernel)?;
        if !(step_size.is_finite() && step_size > 0.0 && step_size < limit) {
            return Err(ScoreError::invalid(
                "step_size",
                format!("must lie in (0, {limit}), got {step_size}"),
            ));
        }
        self.step_size = step_size;
        Ok(self)
    }

    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Fit and also return the Frobenius norm of the residual `Aβ_t + h` for
    /// t = 0..=T.
    pub fn fit_with_residuals(&self, samples: SampleSet) -> Result<(FittedScore, Vec<f64>), ScoreError> {
        let equation = EstimatingEquation::assemble(&self.kernel, &samples)?;
        let n = samples.n() as f64;
        let eta = self.step_size;

        let mut beta = Array2::<f64>::zeros(equation.rhs.raw_dim());
        let mut beta_sum = Array2::<f64>::zeros(equation.rhs.raw_dim());
        let mut residuals = Vec::with_capacity(self.num_iterations + 1);
        for t in 0..self.num_iterations {
            let residual = equation.residual(&beta);
            let norm = frobenius(&residual);
            log::trace!("Landweber iteration {t}: residual {norm:.6e}");
            residuals.push(norm);
            beta_sum += &beta;
            beta.scaled_add(-eta, &residual);
        }
        residuals.push(frobenius(&equation.residual(&beta)));
        log::debug!(
            "Landweber fit: n = {}, d = {}, T = {}, eta = {}, final residual {:.3e}",
            samples.n(),
            samples.d(),
            self.num_iterations,
            eta,
            residuals.last().copied().unwrap_or_default()
        );

        let gradient_weight = -eta * self.num_iterations as f64 / n;
        let weights = beta_sum * (-eta / n);
        let fitted = FittedScore::Expansion(KernelExpansion::on_samples(
            self.kernel.clone(),
            samples,
            &equation,
            gradient_weight,
            weights,
        ));
        Ok((fitted, residuals))
    }
}

fn frobenius(a: &Array2<f64>) -> f64 {
    a.iter().map(|v| v * v).sum::<f64>().sqrt()
}

impl ScoreEstimator for Landweber {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        self.fit_with_residuals(samples).map(|(fitted, _)| fitted)
    }
}

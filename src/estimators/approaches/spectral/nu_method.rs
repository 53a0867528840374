// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ν-method, a semi-iterative (Chebyshev-type) acceleration of Landweber
//! iteration. T steps of the ν-method regularize about as strongly as T²
//! Landweber steps.
//!
//! β_k = β_{k−1} + μ_k (β_{k−1} − β_{k−2}) − ω_k (Aβ_{k−1} + h)
//!
//! Every iterate has the form β_k = a_k h + A c_k for a scalar a_k and an
//! (n, d) array c_k obeying the same recursion, which provides the
//! out-of-sample extension ŝ(q) = (a_T/n) Σ_i ∇k(x_i, q) + (1/n) Σ_i k(x_i, q) c_{T,i}.

use ndarray::Array2;

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::{Bandwidth, Kernel, KernelType};
use crate::estimators::approaches::operator::EstimatingEquation;
use crate::estimators::approaches::spectral::{check_bounded_kernel, check_iterations, iterations_for_lam};
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::{FittedScore, KernelExpansion};
use crate::estimators::traits::ScoreEstimator;

/// Momentum and step coefficients (μ_k, ω_k) for k = 1..=T.
#[derive(Debug, Clone, PartialEq)]
pub struct NuSchedule {
    nu: f64,
    mu: Vec<f64>,
    omega: Vec<f64>,
}

impl NuSchedule {
    /// Precompute the coefficient table of Engl, Hanke and Neubauer for T steps.
    pub fn new(nu: f64, num_iterations: usize) -> Self {
        let mut mu = Vec::with_capacity(num_iterations);
        let mut omega = Vec::with_capacity(num_iterations);
        for k in 1..=num_iterations {
            if k == 1 {
                mu.push(0.0);
                omega.push((4.0 * nu + 2.0) / (4.0 * nu + 1.0));
                continue;
            }
            let k = k as f64;
            let common = (k + 2.0 * nu - 1.0) * (2.0 * k + 4.0 * nu - 1.0);
            mu.push(
                (k - 1.0) * (2.0 * k - 3.0) * (2.0 * k + 2.0 * nu - 1.0)
                    / (common * (2.0 * k + 2.0 * nu - 3.0)),
            );
            omega.push(4.0 * (2.0 * k + 2.0 * nu - 1.0) * (k + nu - 1.0) / common);
        }
        Self { nu, mu, omega }
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    pub fn len(&self) -> usize {
        self.mu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mu.is_empty()
    }

    /// (μ_k, ω_k) in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mu.iter().copied().zip(self.omega.iter().copied())
    }
}

/// ν-method kernel score estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct NuMethod {
    kernel: Kernel,
    schedule: NuSchedule,
}

impl NuMethod {
    /// Gaussian kernel, `num_iterations` steps with ν = 1.
    pub fn new(bandwidth: impl Into<Bandwidth>, num_iterations: usize) -> Result<Self, ScoreError> {
        Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?, num_iterations)
    }

    /// Fails for a kernel with the linear term, which breaks the unit step bound.
    pub fn new_with_kernel(kernel: Kernel, num_iterations: usize) -> Result<Self, ScoreError> {
        check_bounded_kernel(&kernel)?;
        check_iterations(num_iterations)?;
        Ok(Self {
            kernel,
            schedule: NuSchedule::new(1.0, num_iterations),
        })
    }

    /// Iteration count derived from a regularization strength, T = ⌊1/√λ⌋ + 1.
    pub fn with_lam(bandwidth: impl Into<Bandwidth>, lam: f64) -> Result<Self, ScoreError> {
        Self::new(bandwidth, iterations_for_lam(lam, 2.0)?)
    }

    /// Replace the qualification ν > 0 of the method.
    pub fn with_nu(mut self, nu: f64) -> Result<Self, ScoreError> {
        if !(nu.is_finite() && nu > 0.0) {
            return Err(ScoreError::invalid("nu", format!("must be positive, got {nu}")));
        }
        self.schedule = NuSchedule::new(nu, self.schedule.len());
        Ok(self)
    }

    pub fn num_iterations(&self) -> usize {
        self.schedule.len()
    }

    pub fn schedule(&self) -> &NuSchedule {
        &self.schedule
    }
}

impl ScoreEstimator for NuMethod {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        let equation = EstimatingEquation::assemble(&self.kernel, &samples)?;
        let n = samples.n() as f64;
        let shape = equation.rhs.raw_dim();

        let (mut beta, mut beta_prev) = (Array2::<f64>::zeros(shape), Array2::<f64>::zeros(shape));
        let (mut c, mut c_prev) = (Array2::<f64>::zeros(shape), Array2::<f64>::zeros(shape));
        let (mut a, mut a_prev) = (0.0_f64, 0.0_f64);

        for (k, (mu, omega)) in self.schedule.iter().enumerate() {
            let residual = equation.residual(&beta);
            log::trace!(
                "nu-method iteration {k}: residual {:.6e}",
                residual.iter().map(|v| v * v).sum::<f64>().sqrt()
            );

            let a_next = a + mu * (a - a_prev) - omega;
            let mut c_next = &c + &((&c - &c_prev) * mu);
            c_next.scaled_add(-omega, &beta);
            let mut beta_next = &beta + &((&beta - &beta_prev) * mu);
            beta_next.scaled_add(-omega, &residual);

            a_prev = a;
            a = a_next;
            c_prev = std::mem::replace(&mut c, c_next);
            beta_prev = std::mem::replace(&mut beta, beta_next);
        }
        log::debug!(
            "nu-method fit: n = {}, d = {}, T = {}, nu = {}",
            samples.n(),
            samples.d(),
            self.schedule.len(),
            self.schedule.nu()
        );

        let weights = c / n;
        Ok(FittedScore::Expansion(KernelExpansion::on_samples(
            self.kernel.clone(),
            samples,
            &equation,
            a / n,
            weights,
        )))
    }
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direct (Tikhonov) regularization and its Nyström subsampled variant.
//!
//! Tikhonov solves `(K + nλI) β = −H`, whose solution is the in-sample score.
//! Out of sample,
//!
//! ŝ(q) = −(1/(λn)) [Σ_i ∇k(x_i, q) + Σ_i k(x_i, q) β_i].
//!
//! NKEF restricts the operator to m landmarks z_l while keeping all n samples
//! in the gradient term:
//!
//! (K_mm + mλI) β = −(m/n) H_m,
//! ŝ(q) = −(1/(λn)) Σ_i ∇k(x_i, q) − (1/(λm)) Σ_l k(z_l, q) β_l.
//!
//! With every sample selected as landmark the two coincide.

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::{Bandwidth, Kernel, KernelType};
use crate::estimators::approaches::landmark::{LandmarkStrategy, check_subsample_rate, select_landmarks};
use crate::estimators::approaches::linalg::solve_spd;
use crate::estimators::approaches::operator::EstimatingEquation;
use crate::estimators::approaches::spectral::check_lam;
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::{FittedScore, KernelExpansion};
use crate::estimators::traits::ScoreEstimator;

/// Tikhonov-regularized kernel score estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Tikhonov {
    kernel: Kernel,
    lam: f64,
}

impl Tikhonov {
    /// Gaussian kernel with the given bandwidth and regularization `lam > 0`.
    pub fn new(bandwidth: impl Into<Bandwidth>, lam: f64) -> Result<Self, ScoreError> {
        Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?, lam)
    }

    pub fn new_with_kernel(kernel: Kernel, lam: f64) -> Result<Self, ScoreError> {
        check_lam(lam)?;
        Ok(Self { kernel, lam })
    }

    pub fn lam(&self) -> f64 {
        self.lam
    }
}

impl ScoreEstimator for Tikhonov {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        let equation = EstimatingEquation::assemble(&self.kernel, &samples)?;
        let beta = -solve_spd(&equation.regularized(self.lam), &equation.rhs)?;

        let gradient_weight = -1.0 / (self.lam * samples.n() as f64);
        let weights = beta * gradient_weight;
        log::debug!(
            "Tikhonov fit: n = {}, d = {}, lam = {:e}",
            samples.n(),
            samples.d(),
            self.lam
        );
        Ok(FittedScore::Expansion(KernelExpansion::on_samples(
            self.kernel.clone(),
            samples,
            &equation,
            gradient_weight,
            weights,
        )))
    }
}

/// Nyström kernel exponential family (NKEF) score estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Nkef {
    kernel: Kernel,
    lam: f64,
    subsample_rate: f64,
    landmarks: LandmarkStrategy,
}

impl Nkef {
    /// Gaussian kernel, regularization `lam > 0` and a landmark fraction in (0, 1].
    pub fn new(bandwidth: impl Into<Bandwidth>, lam: f64, subsample_rate: f64) -> Result<Self, ScoreError> {
        Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?, lam, subsample_rate)
    }

    pub fn new_with_kernel(kernel: Kernel, lam: f64, subsample_rate: f64) -> Result<Self, ScoreError> {
        check_lam(lam)?;
        check_subsample_rate(subsample_rate)?;
        Ok(Self {
            kernel,
            lam,
            subsample_rate,
            landmarks: LandmarkStrategy::default(),
        })
    }

    /// Replace the landmark selection strategy.
    pub fn with_landmarks(mut self, strategy: LandmarkStrategy) -> Self {
        self.landmarks = strategy;
        self
    }

    pub fn lam(&self) -> f64 {
        self.lam
    }

    pub fn subsample_rate(&self) -> f64 {
        self.subsample_rate
    }
}

impl ScoreEstimator for Nkef {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        let n = samples.n();
        let indices = select_landmarks(n, self.subsample_rate, self.landmarks);
        let m = indices.len();
        let gradient_weight = -1.0 / (self.lam * n as f64);
        let weight_scale = -1.0 / (self.lam * m as f64);
        log::debug!("NKEF fit: n = {}, d = {}, m = {}, lam = {:e}", n, samples.d(), m, self.lam);

        if m == n {
            let equation = EstimatingEquation::assemble(&self.kernel, &samples)?;
            let beta = -solve_spd(&equation.regularized(self.lam), &equation.rhs)?;
            let weights = beta * weight_scale;
            return Ok(FittedScore::Expansion(KernelExpansion::on_samples(
                self.kernel.clone(),
                samples,
                &equation,
                gradient_weight,
                weights,
            )));
        }

        let basis = samples.select(&indices)?;
        let equation = EstimatingEquation::assemble_on(&self.kernel, &samples, basis.view())?;
        let rhs = &equation.rhs * (m as f64 / n as f64);
        let beta = -solve_spd(&equation.regularized(self.lam), &rhs)?;
        let weights = beta * weight_scale;
        Ok(FittedScore::Expansion(KernelExpansion::on_basis(
            self.kernel.clone(),
            samples,
            basis,
            gradient_weight,
            weights,
        )?))
    }
}

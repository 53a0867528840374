// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Closed-Form Stein Score Estimator
//!
//! No operator is inverted. The smoothed score u(x) = ∇ log Σ_i k(x_i, x) is
//! rescaled by the factor c that minimizes the score-matching loss
//! E‖c u − ∇log p‖². Integrating by parts, E[u · ∇log p] = −E[∇ · u], and with
//! ∇ · u = Δp̂/p̂ − ‖u‖² the minimizer is
//!
//! c = mean_j [ Σ_i M_ij / Σ_i K_ij + ‖u_j‖² ] / mean_j ‖u_j‖²
//!
//! where `M` is the mixed-derivative trace (for a radial kernel the Laplacian
//! in the query argument equals −M). Cost is O(n² d).

use ndarray::Axis;

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::{Bandwidth, Kernel, KernelType};
use crate::estimators::approaches::operator::KernelSums;
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::{FittedScore, SteinFit};
use crate::estimators::traits::ScoreEstimator;

/// Stein score estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Stein {
    kernel: Kernel,
}

impl Stein {
    pub fn new(bandwidth: impl Into<Bandwidth>) -> Result<Self, ScoreError> {
        Ok(Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?))
    }

    pub fn new_with_kernel(kernel: Kernel) -> Self {
        Self { kernel }
    }
}

impl ScoreEstimator for Stein {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        let smoothed = self.kernel.smoothed_score(samples.view(), samples.view())?;
        let sums = KernelSums::evaluate(&self.kernel, samples.view(), samples.view())?;
        let sq_norms = smoothed.map_axis(Axis(1), |row| row.dot(&row));

        let n = samples.n() as f64;
        let denominator = sq_norms.sum() / n;
        let numerator = sums
            .divergence
            .iter()
            .zip(sums.density.iter())
            .zip(sq_norms.iter())
            .map(|((m, k), u2)| m / k + u2)
            .sum::<f64>()
            / n;

        let scale = if denominator > 0.0 && numerator.is_finite() {
            numerator / denominator
        } else {
            log::warn!("Stein estimator: smoothed score vanishes at every sample, using scale 1");
            1.0
        };
        log::debug!("Stein fit: n = {}, d = {}, scale = {:.4}", samples.n(), samples.d(), scale);

        let in_sample = smoothed * scale;
        Ok(FittedScore::Stein(SteinFit::new(
            self.kernel.clone(),
            samples,
            scale,
            in_sample,
        )))
    }
}

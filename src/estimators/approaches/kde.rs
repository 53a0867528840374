// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kernel density baseline: the score of the kernel density estimate,
//! ŝ(q) = Σ_i ∇_q k(q, x_i) / Σ_i k(q, x_i). No estimating equation is solved.

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::{Bandwidth, Kernel, KernelType};
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::{DensityFit, FittedScore};
use crate::estimators::traits::ScoreEstimator;

/// Score of a kernel density estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Kde {
    kernel: Kernel,
}

impl Kde {
    pub fn new(bandwidth: impl Into<Bandwidth>) -> Result<Self, ScoreError> {
        Ok(Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?))
    }

    pub fn new_with_kernel(kernel: Kernel) -> Self {
        Self { kernel }
    }
}

impl ScoreEstimator for Kde {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        log::debug!("KDE fit: n = {}, d = {}", samples.n(), samples.d());
        Ok(FittedScore::Density(DensityFit::new(self.kernel.clone(), samples)?))
    }
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spectral Stein gradient estimator (SSGE): spectral cut-off of the Gram
//! matrix.
//!
//! With K = UΛUᵀ and the leading r eigenpairs kept,
//!
//! in-sample       β = −U_r Λ_r⁻¹ U_rᵀ H
//! out-of-sample   ŝ(q) = −K_{qX} U_r Λ_r⁻² U_rᵀ H
//!
//! The out-of-sample form is the Nyström extension of the eigenfunctions; at
//! the samples it reduces to the in-sample form because K U_r = U_r Λ_r.
//!
//! An optional jitter η ≥ 0 decomposes K + ηI instead. Eigenvectors are
//! unchanged and every eigenvalue is shifted by η, which keeps a large rank
//! usable once the Gram spectrum has decayed below machine precision. The
//! in-sample estimate is then the Nyström form at the samples,
//! −U_r (Λ_r − η) Λ_r⁻² U_rᵀ H.

use ndarray::{Array2, ArrayView1, Axis, s};

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::{Bandwidth, Kernel, KernelType};
use crate::estimators::approaches::linalg::symmetric_eigen;
use crate::estimators::approaches::operator::EstimatingEquation;
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::{EigenExpansion, FittedScore};
use crate::estimators::traits::ScoreEstimator;

/// Retained eigenvalues smaller than this fraction of the largest are rejected.
const EIGENVALUE_FLOOR: f64 = 1e-12;

/// How many leading eigenpairs of the Gram matrix are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankSelection {
    /// Exactly `r` eigenpairs, 1 ≤ r ≤ n.
    Fixed(usize),
    /// The fewest eigenpairs whose share of the total eigenvalue mass reaches τ ∈ (0, 1].
    Threshold(f64),
}

impl RankSelection {
    fn validate(self) -> Result<Self, ScoreError> {
        match self {
            RankSelection::Fixed(0) => Err(ScoreError::invalid("rank", "must be at least 1")),
            RankSelection::Threshold(tau) if !(tau > 0.0 && tau <= 1.0) => Err(ScoreError::invalid(
                "rank",
                format!("eigenvalue mass threshold must lie in (0, 1], got {tau}"),
            )),
            other => Ok(other),
        }
    }

    /// Resolve to a concrete rank given descending eigenvalues.
    fn resolve(self, eigenvalues: ArrayView1<'_, f64>) -> Result<usize, ScoreError> {
        let n = eigenvalues.len();
        match self {
            RankSelection::Fixed(r) if r > n => Err(ScoreError::invalid(
                "rank",
                format!("rank {r} exceeds the number of samples {n}"),
            )),
            RankSelection::Fixed(r) => Ok(r),
            RankSelection::Threshold(tau) => {
                let total: f64 = eigenvalues.iter().map(|v| v.max(0.0)).sum();
                let mut cumulative = 0.0;
                for (k, v) in eigenvalues.iter().enumerate() {
                    cumulative += v.max(0.0);
                    if cumulative >= tau * total {
                        return Ok(k + 1);
                    }
                }
                Ok(n)
            }
        }
    }
}

/// Spectral-truncation kernel score estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Ssge {
    kernel: Kernel,
    rank: RankSelection,
    eta: f64,
}

impl Ssge {
    pub fn new(bandwidth: impl Into<Bandwidth>, rank: RankSelection) -> Result<Self, ScoreError> {
        Self::new_with_kernel(Kernel::new(KernelType::Gaussian, bandwidth)?, rank)
    }

    pub fn new_with_kernel(kernel: Kernel, rank: RankSelection) -> Result<Self, ScoreError> {
        Ok(Self {
            kernel,
            rank: rank.validate()?,
            eta: 0.0,
        })
    }

    /// Decompose K + ηI instead of K; η = 0 (the default) disables the jitter.
    pub fn with_eta(mut self, eta: f64) -> Result<Self, ScoreError> {
        if !(eta.is_finite() && eta >= 0.0) {
            return Err(ScoreError::invalid(
                "eta",
                format!("jitter must be non-negative and finite, got {eta}"),
            ));
        }
        self.eta = eta;
        Ok(self)
    }

    pub fn rank(&self) -> RankSelection {
        self.rank
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }
}

impl ScoreEstimator for Ssge {
    fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        let equation = EstimatingEquation::assemble(&self.kernel, &samples)?;
        let (values, vectors) = if self.eta > 0.0 {
            symmetric_eigen(&equation.regularized(self.eta / samples.n() as f64))?
        } else {
            symmetric_eigen(&equation.gram)?
        };
        let r = self.rank.resolve(values.view())?;

        let lambda_max = values[0];
        let floor = EIGENVALUE_FLOOR * lambda_max;
        if let Some((k, v)) = values.iter().take(r).enumerate().find(|(_, v)| **v <= floor) {
            return Err(ScoreError::NumericalInstability(format!(
                "eigenvalue {k} of the Gram matrix ({v:.3e}) vanishes relative to the largest \
                 ({lambda_max:.3e}); reduce the rank"
            )));
        }

        let eigenvalues = values.slice(s![..r]).to_owned();
        let eigenvectors = vectors.slice(s![.., ..r]).to_owned();
        // Λ⁻² (−Uᵀ H), shape (r, d)
        let mut coefficients: Array2<f64> = -eigenvectors.t().dot(&equation.rhs);
        for (mut row, lam) in coefficients.axis_iter_mut(Axis(0)).zip(eigenvalues.iter()) {
            row /= lam * lam;
        }
        log::debug!(
            "SSGE fit: n = {}, d = {}, rank = {}, eta = {}, eigenvalues [{:.3e}, {:.3e}]",
            samples.n(),
            samples.d(),
            r,
            self.eta,
            lambda_max,
            eigenvalues[r - 1]
        );

        Ok(FittedScore::Spectral(EigenExpansion::new(
            self.kernel.clone(),
            samples,
            &equation.gram,
            eigenvalues,
            eigenvectors,
            coefficients,
        )))
    }
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fitted score estimators and out-of-sample prediction.
//!
//! A fit produces one of a closed set of states. Each state fully determines
//! the score estimate at any point through kernel evaluations against the
//! training samples (and landmarks or eigenvectors where applicable), and keeps
//! the in-sample estimate computed from the Gram matrix of the fit.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::estimators::approaches::common_nd::dataset::{SampleSet, check_query_dim};
use crate::estimators::approaches::kernel::Kernel;
use crate::estimators::approaches::operator::EstimatingEquation;
use crate::estimators::error::ScoreError;

/// Score estimate expanded over kernel functions:
///
/// ŝ(q) = g · Σ_i ∇k(x_i, q) + Σ_l k(z_l, q) w_l
///
/// with training samples x_i, basis points z_l (the samples or a landmark
/// subset), a scalar gradient weight g and weights w of shape (m, d).
#[derive(Debug, Clone)]
pub struct KernelExpansion {
    kernel: Kernel,
    samples: Array2<f64>,
    basis: Array2<f64>,
    gradient_weight: f64,
    weights: Array2<f64>,
    in_sample: Array2<f64>,
}

impl KernelExpansion {
    /// Build an expansion whose basis is the sample set of `equation`, so the
    /// in-sample estimate comes straight from the cached Gram matrix.
    pub(crate) fn on_samples(
        kernel: Kernel,
        samples: SampleSet,
        equation: &EstimatingEquation,
        gradient_weight: f64,
        weights: Array2<f64>,
    ) -> Self {
        debug_assert_eq!(equation.basis_size(), samples.n());
        let in_sample = &equation.rhs * gradient_weight + equation.gram.t().dot(&weights);
        let points = samples.into_points();
        Self {
            kernel,
            basis: points.clone(),
            samples: points,
            gradient_weight,
            weights,
            in_sample,
        }
    }

    /// Build an expansion over a separate basis (landmarks).
    pub(crate) fn on_basis(
        kernel: Kernel,
        samples: SampleSet,
        basis: Array2<f64>,
        gradient_weight: f64,
        weights: Array2<f64>,
    ) -> Result<Self, ScoreError> {
        let mut expansion = Self {
            kernel,
            samples: samples.into_points(),
            basis,
            gradient_weight,
            weights,
            in_sample: Array2::zeros((0, 0)),
        };
        expansion.in_sample = expansion.evaluate(expansion.samples.view())?;
        Ok(expansion)
    }

    fn evaluate(&self, points: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        let grad = self.kernel.gradient(self.samples.view(), points)?.sum_axis(Axis(0));
        let gram = self.kernel.gram(self.basis.view(), points)?;
        Ok(grad * self.gradient_weight + gram.t().dot(&self.weights))
    }

    pub fn gradient_weight(&self) -> f64 {
        self.gradient_weight
    }

    /// Kernel weights, one row per basis point.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }
}

/// Score estimate in a truncated eigenbasis of the Gram matrix:
///
/// ŝ(q) = Σ_k (Σ_i k(x_i, q) u_{ik}) c_k
#[derive(Debug, Clone)]
pub struct EigenExpansion {
    kernel: Kernel,
    samples: Array2<f64>,
    eigenvalues: Array1<f64>,
    eigenvectors: Array2<f64>,
    coefficients: Array2<f64>,
    in_sample: Array2<f64>,
}

impl EigenExpansion {
    pub(crate) fn new(
        kernel: Kernel,
        samples: SampleSet,
        gram: &Array2<f64>,
        eigenvalues: Array1<f64>,
        eigenvectors: Array2<f64>,
        coefficients: Array2<f64>,
    ) -> Self {
        let in_sample = gram.t().dot(&eigenvectors).dot(&coefficients);
        Self {
            kernel,
            samples: samples.into_points(),
            eigenvalues,
            eigenvectors,
            coefficients,
            in_sample,
        }
    }

    fn evaluate(&self, points: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        let gram = self.kernel.gram(self.samples.view(), points)?;
        Ok(gram.t().dot(&self.eigenvectors).dot(&self.coefficients))
    }

    /// Retained eigenvalues, descending.
    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    pub fn rank(&self) -> usize {
        self.eigenvalues.len()
    }
}

/// Rescaled smoothed score ŝ(q) = c · ∇ log Σ_i k(x_i, q).
#[derive(Debug, Clone)]
pub struct SteinFit {
    kernel: Kernel,
    samples: Array2<f64>,
    scale: f64,
    in_sample: Array2<f64>,
}

impl SteinFit {
    pub(crate) fn new(kernel: Kernel, samples: SampleSet, scale: f64, in_sample: Array2<f64>) -> Self {
        Self {
            kernel,
            samples: samples.into_points(),
            scale,
            in_sample,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Kernel density estimate over the samples; scores are ∇ log p̂.
#[derive(Debug, Clone)]
pub struct DensityFit {
    kernel: Kernel,
    samples: Array2<f64>,
    in_sample: Array2<f64>,
}

impl DensityFit {
    pub(crate) fn new(kernel: Kernel, samples: SampleSet) -> Result<Self, ScoreError> {
        let in_sample = kernel.smoothed_score(samples.view(), samples.view())?;
        Ok(Self {
            kernel,
            samples: samples.into_points(),
            in_sample,
        })
    }
}

/// State produced by fitting a score estimator.
#[derive(Debug, Clone)]
pub enum FittedScore {
    /// Tikhonov, NKEF, Landweber and ν-method
    Expansion(KernelExpansion),
    /// Spectral truncation (SSGE)
    Spectral(EigenExpansion),
    /// Closed-form Stein estimator
    Stein(SteinFit),
    /// Kernel density baseline
    Density(DensityFit),
}

impl FittedScore {
    fn samples(&self) -> &Array2<f64> {
        match self {
            FittedScore::Expansion(e) => &e.samples,
            FittedScore::Spectral(e) => &e.samples,
            FittedScore::Stein(s) => &s.samples,
            FittedScore::Density(d) => &d.samples,
        }
    }

    pub fn n_samples(&self) -> usize {
        self.samples().nrows()
    }

    pub fn dim(&self) -> usize {
        self.samples().ncols()
    }

    pub fn kernel(&self) -> &Kernel {
        match self {
            FittedScore::Expansion(e) => &e.kernel,
            FittedScore::Spectral(e) => &e.kernel,
            FittedScore::Stein(s) => &s.kernel,
            FittedScore::Density(d) => &d.kernel,
        }
    }

    /// Score estimates at the training samples, shape (n, d).
    pub fn in_sample_scores(&self) -> ArrayView2<'_, f64> {
        match self {
            FittedScore::Expansion(e) => e.in_sample.view(),
            FittedScore::Spectral(e) => e.in_sample.view(),
            FittedScore::Stein(s) => s.in_sample.view(),
            FittedScore::Density(d) => d.in_sample.view(),
        }
    }

    /// Score estimates at arbitrary query points, shape (|Q|, d).
    pub fn predict(&self, query: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        check_query_dim(query, self.dim())?;
        let scores = match self {
            FittedScore::Expansion(e) => e.evaluate(query)?,
            FittedScore::Spectral(e) => e.evaluate(query)?,
            FittedScore::Stein(s) => s.kernel.smoothed_score(s.samples.view(), query)? * s.scale,
            FittedScore::Density(d) => d.kernel.smoothed_score(d.samples.view(), query)?,
        };
        Ok(scores)
    }
}

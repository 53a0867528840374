// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Kernel Engine for Score Estimation
//!
//! Every estimator in this crate is built from three pairwise quantities of a
//! positive-definite kernel k(a, b):
//!
//! - the Gram matrix `K[i, j] = k(a_i, b_j)`
//! - the gradient with respect to the first argument, `G[i, j, :] = ∂k(a_i, b_j)/∂a_i`
//! - the trace of the mixed second derivative, `M[i, j] = Σ_m ∂²k(a_i, b_j)/∂a_m∂b_m`
//!
//! ## Supported Kernel Types
//!
//! All profiles are radial, k(a, b) = φ(t) with t = Σ_m ((a_m − b_m)/h_m)²:
//!
//! 1. **Gaussian**: φ(t) = exp(−t/2)
//! 2. **Inverse multiquadric (IMQ)**: φ(t) = (1 + t)^(−1/2)
//! 3. **IMQ with exponent p**: φ(t) = (1 + t)^(−p), p > 0
//!
//! The bandwidth h is either a single positive scalar or one positive value per
//! dimension. Every profile satisfies sup k = φ(0) = 1, which bounds the
//! spectral norm of `K / n` by one.
//!
//! A kernel may additionally carry the linear term ⟨a, b⟩ (see
//! [`Kernel::with_linear_term`]). The sum is still positive semi-definite but
//! no longer bounded, and Σ_i k(q, x_i) is no longer a density.
//!
//! ## Derivatives
//!
//! With δ_m = a_m − b_m the derivatives follow from the chain rule on φ:
//!
//! ∂k/∂a_m = 2 φ'(t) δ_m / h_m²
//!
//! ∂²k/∂a_m∂b_m = −(2 φ'(t) / h_m² + 4 φ''(t) δ_m² / h_m⁴)
//!
//! The linear term adds b_m to the gradient and 1 to every mixed second
//! derivative. All derivatives are evaluated in closed form. The estimating
//! equations are sensitive to derivative error at the order of the
//! regularization, so finite differences are never used outside of tests.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};

use crate::estimators::error::ScoreError;

/// Radial profile of a kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelType {
    /// Squared-exponential kernel, exp(−t/2).
    Gaussian,
    /// Inverse multiquadric kernel, (1 + t)^(−1/2).
    InverseMultiquadric,
    /// Inverse multiquadric kernel with exponent p, (1 + t)^(−p).
    InverseMultiquadricP(f64),
}

impl KernelType {
    /// φ(t), φ'(t), φ''(t)
    #[inline]
    fn profile(self, t: f64) -> (f64, f64, f64) {
        match self {
            KernelType::Gaussian => {
                let phi = (-0.5 * t).exp();
                (phi, -0.5 * phi, 0.25 * phi)
            }
            KernelType::InverseMultiquadric => {
                let base = 1.0 + t;
                let phi = base.sqrt().recip();
                let phi1 = -0.5 * phi / base;
                let phi2 = 0.75 * phi / (base * base);
                (phi, phi1, phi2)
            }
            KernelType::InverseMultiquadricP(p) => {
                let base = 1.0 + t;
                let phi = base.powf(-p);
                (phi, -p * phi / base, p * (p + 1.0) * phi / (base * base))
            }
        }
    }

    /// φ(t)/φ(t_ref) and φ'(t)/φ(t_ref), evaluated without forming φ(t).
    #[inline]
    fn relative_profile(self, t: f64, t_ref: f64) -> (f64, f64) {
        match self {
            KernelType::Gaussian => {
                let ratio = (-0.5 * (t - t_ref)).exp();
                (ratio, -0.5 * ratio)
            }
            KernelType::InverseMultiquadric => {
                let base = 1.0 + t;
                let ratio = ((1.0 + t_ref) / base).sqrt();
                (ratio, -0.5 * ratio / base)
            }
            KernelType::InverseMultiquadricP(p) => {
                let base = 1.0 + t;
                let ratio = ((1.0 + t_ref) / base).powf(p);
                (ratio, -p * ratio / base)
            }
        }
    }
}

impl FromStr for KernelType {
    type Err = ScoreError;

    /// Accepts `"gaussian"`, `"se"`, `"rbf"`, `"imq"` and `"imqp:<p>"`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if let Some(exponent) = lower.strip_prefix("imqp:") {
            let p: f64 = exponent.trim().parse().map_err(|_| {
                ScoreError::invalid("kernel_type", format!("cannot parse IMQ exponent {exponent:?}"))
            })?;
            return Ok(KernelType::InverseMultiquadricP(p));
        }
        match lower.as_str() {
            "gaussian" | "se" | "rbf" => Ok(KernelType::Gaussian),
            "imq" | "inverse_multiquadric" => Ok(KernelType::InverseMultiquadric),
            other => Err(ScoreError::invalid(
                "kernel_type",
                format!("unknown kernel type {other:?} (expected \"gaussian\", \"imq\" or \"imqp:<p>\")"),
            )),
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelType::Gaussian => write!(f, "gaussian"),
            KernelType::InverseMultiquadric => write!(f, "imq"),
            KernelType::InverseMultiquadricP(p) => write!(f, "imqp:{p}"),
        }
    }
}

/// Kernel length scale.
#[derive(Debug, Clone, PartialEq)]
pub enum Bandwidth {
    /// Same length scale in every dimension.
    Isotropic(f64),
    /// One length scale per dimension; its length must match the data.
    PerDimension(Array1<f64>),
}

impl From<f64> for Bandwidth {
    fn from(h: f64) -> Self {
        Bandwidth::Isotropic(h)
    }
}

impl From<Array1<f64>> for Bandwidth {
    fn from(h: Array1<f64>) -> Self {
        Bandwidth::PerDimension(h)
    }
}

/// A radial kernel with a fixed bandwidth, optionally plus the linear kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    kernel_type: KernelType,
    bandwidth: Bandwidth,
    linear_term: bool,
}

impl Kernel {
    /// Creates a kernel, validating that every bandwidth entry is positive and finite.
    pub fn new(kernel_type: KernelType, bandwidth: impl Into<Bandwidth>) -> Result<Self, ScoreError> {
        let bandwidth = bandwidth.into();
        let valid = |h: f64| h.is_finite() && h > 0.0;
        if let KernelType::InverseMultiquadricP(p) = kernel_type {
            if !valid(p) {
                return Err(ScoreError::invalid(
                    "kernel_type",
                    format!("IMQ exponent must be positive and finite, got {p}"),
                ));
            }
        }
        match &bandwidth {
            Bandwidth::Isotropic(h) if !valid(*h) => {
                return Err(ScoreError::invalid(
                    "bandwidth",
                    format!("must be positive and finite, got {h}"),
                ));
            }
            Bandwidth::PerDimension(hs) if hs.is_empty() => {
                return Err(ScoreError::invalid("bandwidth", "per-dimension bandwidth is empty"));
            }
            Bandwidth::PerDimension(hs) => {
                if let Some(h) = hs.iter().find(|h| !valid(**h)) {
                    return Err(ScoreError::invalid(
                        "bandwidth",
                        format!("every entry must be positive and finite, got {h}"),
                    ));
                }
            }
            _ => {}
        }
        Ok(Self {
            kernel_type,
            bandwidth,
            linear_term: false,
        })
    }

    /// Gaussian kernel with an isotropic bandwidth.
    pub fn gaussian(bandwidth: f64) -> Result<Self, ScoreError> {
        Self::new(KernelType::Gaussian, bandwidth)
    }

    /// Add the linear kernel ⟨a, b⟩ to the radial profile.
    pub fn with_linear_term(mut self) -> Self {
        self.linear_term = true;
        self
    }

    pub fn kernel_type(&self) -> KernelType {
        self.kernel_type
    }

    pub fn bandwidth(&self) -> &Bandwidth {
        &self.bandwidth
    }

    pub fn has_linear_term(&self) -> bool {
        self.linear_term
    }

    /// Supremum of k over all pairs, φ(0); `None` when the linear term makes k unbounded.
    pub fn max_value(&self) -> Option<f64> {
        (!self.linear_term).then(|| self.kernel_type.profile(0.0).0)
    }

    /// Check that the bandwidth fits `d`-dimensional data.
    pub fn check_dimension(&self, d: usize) -> Result<(), ScoreError> {
        match &self.bandwidth {
            Bandwidth::PerDimension(hs) if hs.len() != d => Err(ScoreError::invalid(
                "bandwidth",
                format!("{} per-dimension entries for {d}-dimensional data", hs.len()),
            )),
            _ => Ok(()),
        }
    }

    /// 1/h_m² for every dimension, after checking that both point sets and the
    /// bandwidth agree on the dimensionality.
    fn inverse_sq_scale(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Vec<f64>, ScoreError> {
        let d = a.ncols();
        if b.ncols() != d {
            return Err(ScoreError::InsufficientSamples(format!(
                "kernel arguments have {d} and {} dimensions",
                b.ncols()
            )));
        }
        self.check_dimension(d)?;
        Ok(match &self.bandwidth {
            Bandwidth::Isotropic(h) => vec![1.0 / (h * h); d],
            Bandwidth::PerDimension(hs) => hs.iter().map(|h| 1.0 / (h * h)).collect(),
        })
    }

    #[inline]
    fn scaled_sq_dist(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, inv_sq: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .zip(inv_sq)
            .map(|((x, y), s)| (x - y) * (x - y) * s)
            .sum()
    }

    /// Gram matrix `K[i, j] = k(a_i, b_j)`, shape (p, q).
    pub fn gram(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        let inv_sq = self.inverse_sq_scale(a, b)?;
        let mut out = Array2::<f64>::zeros((a.nrows(), b.nrows()));
        for (i, ai) in a.axis_iter(Axis(0)).enumerate() {
            for (j, bj) in b.axis_iter(Axis(0)).enumerate() {
                let t = Self::scaled_sq_dist(ai, bj, &inv_sq);
                out[[i, j]] = self.kernel_type.profile(t).0;
                if self.linear_term {
                    out[[i, j]] += ai.dot(&bj);
                }
            }
        }
        Ok(out)
    }

    /// Gradient with respect to the first argument, shape (p, q, d).
    pub fn gradient(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array3<f64>, ScoreError> {
        let inv_sq = self.inverse_sq_scale(a, b)?;
        let d = a.ncols();
        let mut out = Array3::<f64>::zeros((a.nrows(), b.nrows(), d));
        for (i, ai) in a.axis_iter(Axis(0)).enumerate() {
            for (j, bj) in b.axis_iter(Axis(0)).enumerate() {
                let t = Self::scaled_sq_dist(ai, bj, &inv_sq);
                let (_, phi1, _) = self.kernel_type.profile(t);
                for m in 0..d {
                    out[[i, j, m]] = 2.0 * phi1 * (ai[m] - bj[m]) * inv_sq[m];
                    if self.linear_term {
                        out[[i, j, m]] += bj[m];
                    }
                }
            }
        }
        Ok(out)
    }

    /// Trace of the mixed second derivative `Σ_m ∂²k(a_i, b_j)/∂a_m∂b_m`, shape (p, q).
    pub fn mixed_trace(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        let inv_sq = self.inverse_sq_scale(a, b)?;
        let d = a.ncols();
        let linear = if self.linear_term { d as f64 } else { 0.0 };
        let mut out = Array2::<f64>::zeros((a.nrows(), b.nrows()));
        for (i, ai) in a.axis_iter(Axis(0)).enumerate() {
            for (j, bj) in b.axis_iter(Axis(0)).enumerate() {
                let t = Self::scaled_sq_dist(ai, bj, &inv_sq);
                let (_, phi1, phi2) = self.kernel_type.profile(t);
                let mut trace = linear;
                for m in 0..d {
                    let delta = ai[m] - bj[m];
                    trace -= 2.0 * phi1 * inv_sq[m] + 4.0 * phi2 * delta * delta * inv_sq[m] * inv_sq[m];
                }
                out[[i, j]] = trace;
            }
        }
        Ok(out)
    }

    /// Gradient of `log Σ_i k(q, x_i)` at every query row, shape (|Q|, d).
    ///
    /// Each row is rescaled by its closest sample before summation, so queries far
    /// outside the data return a finite value instead of 0/0. Requires a kernel
    /// without the linear term.
    pub fn smoothed_score(
        &self,
        samples: ArrayView2<'_, f64>,
        query: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, ScoreError> {
        if self.linear_term {
            return Err(ScoreError::invalid(
                "kernel",
                "the kernel sum with a linear term is not a density",
            ));
        }
        let inv_sq = self.inverse_sq_scale(samples, query)?;
        let d = samples.ncols();
        let mut out = Array2::<f64>::zeros((query.nrows(), d));
        let mut dists = vec![0.0; samples.nrows()];

        for (row, q) in query.axis_iter(Axis(0)).enumerate() {
            for (slot, x) in dists.iter_mut().zip(samples.axis_iter(Axis(0))) {
                *slot = Self::scaled_sq_dist(q, x, &inv_sq);
            }
            let t_ref = dists.iter().cloned().fold(f64::INFINITY, f64::min);

            let mut density = 0.0;
            let mut grad = out.row_mut(row);
            for (&t, x) in dists.iter().zip(samples.axis_iter(Axis(0))) {
                let (w, w1) = self.kernel_type.relative_profile(t, t_ref);
                density += w;
                for m in 0..d {
                    grad[m] += 2.0 * w1 * (q[m] - x[m]) * inv_sq[m];
                }
            }
            grad.mapv_inplace(|g| g / density);
        }
        Ok(out)
    }
}

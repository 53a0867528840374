// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # kscore
//!
//! Nonparametric kernel estimators of the score function ∇ₓ log p(x), computed
//! directly from samples of an unknown distribution p without estimating p.
//!
//! ## Quick Start
//!
//! ```rust
//! use kscore::estimators::{ScoreEstimator, Tikhonov};
//! use ndarray::array;
//!
//! let samples = array![[-1.2], [-0.5], [0.1], [0.6], [1.3]];
//! let estimator = Tikhonov::new(1.0, 1e-2).unwrap();
//!
//! // In-sample scores
//! let scores = estimator.estimate_gradients_s(samples.view()).unwrap();
//! assert_eq!(scores.dim(), (5, 1));
//!
//! // Fit once, evaluate anywhere
//! let fitted = estimator.fit(samples.view()).unwrap();
//! let at_query = fitted.predict(array![[0.0], [2.0]].view()).unwrap();
//! assert_eq!(at_query.dim(), (2, 1));
//! ```
//!
//! ## Estimators
//!
//! | Estimator | Regularizer | Fitted state |
//! |-----------|-------------|--------------|
//! | Tikhonov | λ | kernel expansion |
//! | NKEF (Nyström) | λ, landmark rate | kernel expansion over landmarks |
//! | Landweber | iterations T, step η | kernel expansion |
//! | ν-method | iterations T | kernel expansion |
//! | SSGE | eigen rank r, jitter η | truncated eigenbasis |
//! | Stein | none (closed form) | rescaled smoothed score |
//! | KDE | bandwidth only | kernel density score |
//!
//! ## Architecture
//!
//! 1. **Kernel Engine**: Gaussian and inverse multiquadric (fixed or free
//!    exponent) kernels with analytic first and mixed second derivatives, and an
//!    optional linear term ⟨a, b⟩
//! 2. **Operator Assembly**: Gram matrix and Stein right-hand side shared by all
//!    regularized estimators
//! 3. **Solver Strategies**: spectral filters of the estimating equation, dense
//!    algebra via `faer`
//! 4. **Score Prediction**: fitted states that evaluate scores in and out of sample
//!
//! ## Logging
//!
//! Fit summaries are emitted through the `log` facade at `debug` level and
//! per-iteration residuals at `trace` level.

pub mod estimators;

pub use estimators::{Estimator, FittedScore, ScoreError, ScoreEstimator};

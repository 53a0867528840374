// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::estimators::approaches::linalg::LinalgError;

/// Errors raised by score estimators.
///
/// Configuration problems are reported by the constructor that detects them,
/// data problems by `fit`/`predict`. Nothing is retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    #[error("invalid configuration for `{parameter}`: {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },

    #[error("insufficient samples: {0}")]
    InsufficientSamples(String),

    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    #[error("non-finite value in {what} at row {row}")]
    NonFiniteInput { what: &'static str, row: usize },
}

impl ScoreError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        ScoreError::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

impl From<LinalgError> for ScoreError {
    fn from(err: LinalgError) -> Self {
        ScoreError::NumericalInstability(err.to_string())
    }
}

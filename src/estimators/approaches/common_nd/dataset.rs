// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::estimators::error::ScoreError;

/// Minimum number of samples any score estimator accepts.
pub const MIN_SAMPLES: usize = 2;

/// Validated sample container shared by all score estimators.
///
/// Rows are samples, columns are dimensions. Row order is the index order used
/// by every Gram matrix and coefficient array built from this set. Fields are
/// private so a `SampleSet` only exists after validation.
#[derive(Debug, Clone)]
pub struct SampleSet {
    points: Array2<f64>,
    n: usize,
    d: usize,
}

impl SampleSet {
    /// Validate and copy a 2D sample view.
    pub fn from_view(data: ArrayView2<'_, f64>) -> Result<Self, ScoreError> {
        let (n, d) = data.dim();
        if n < MIN_SAMPLES {
            return Err(ScoreError::InsufficientSamples(format!(
                "need at least {MIN_SAMPLES} samples, got {n}"
            )));
        }
        if d == 0 {
            return Err(ScoreError::InsufficientSamples(
                "samples have zero dimensions".to_string(),
            ));
        }
        check_finite(data, "samples")?;
        Ok(Self {
            points: data.to_owned(),
            n,
            d,
        })
    }

    pub fn from_array2(data: Array2<f64>) -> Result<Self, ScoreError> {
        Self::from_view(data.view())
    }

    /// Treat a 1D array as n samples of a one-dimensional distribution.
    pub fn from_array1(data: Array1<f64>) -> Result<Self, ScoreError> {
        let n = data.len();
        let a2 = data.insert_axis(Axis(1));
        debug_assert_eq!(a2.nrows(), n);
        Self::from_array2(a2)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub(crate) fn into_points(self) -> Array2<f64> {
        self.points
    }

    /// Number of samples.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Dimensionality of every sample.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Gather a subset of rows in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Array2<f64>, ScoreError> {
        if let Some(i) = indices.iter().find(|&&i| i >= self.n) {
            return Err(ScoreError::invalid(
                "indices",
                format!("row {i} is out of range for {} samples", self.n),
            ));
        }
        Ok(self.points.select(Axis(0), indices))
    }

    /// Check a query set against the fitted dimensionality.
    pub fn check_query(&self, query: ArrayView2<'_, f64>) -> Result<(), ScoreError> {
        check_query_dim(query, self.d)
    }
}

/// Check a query set against a fitted dimensionality `d`.
pub fn check_query_dim(query: ArrayView2<'_, f64>, d: usize) -> Result<(), ScoreError> {
    if query.ncols() != d {
        return Err(ScoreError::InsufficientSamples(format!(
            "query points have {} dimensions, estimator was fitted on {d}",
            query.ncols()
        )));
    }
    check_finite(query, "query points")
}

fn check_finite(data: ArrayView2<'_, f64>, what: &'static str) -> Result<(), ScoreError> {
    for (row, values) in data.axis_iter(Axis(0)).enumerate() {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ScoreError::NonFiniteInput { what, row });
        }
    }
    Ok(())
}

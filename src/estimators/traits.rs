// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array2, ArrayView2};

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kernel::Kernel;
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::FittedScore;

/// Common interface of all score estimators.
///
/// Implementors only provide [`fit_samples`](ScoreEstimator::fit_samples) on an
/// already validated sample set; validation, prediction and the one-shot
/// convenience methods are shared.
pub trait ScoreEstimator {
    /// Kernel the estimator is built on.
    fn kernel(&self) -> &Kernel;

    /// Fit on an already validated sample set.
    ///
    /// A bandwidth that does not match the dimensionality of `samples` is
    /// reported as [`ScoreError::InvalidConfiguration`] by the kernel engine.
    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError>;

    /// Validate `samples` (n × d) and fit the estimator.
    fn fit(&self, samples: ArrayView2<'_, f64>) -> Result<FittedScore, ScoreError> {
        let samples = SampleSet::from_view(samples)?;
        self.kernel().check_dimension(samples.d())?;
        self.fit_samples(samples)
    }

    /// Evaluate a fitted estimate at arbitrary query points.
    fn predict(&self, fitted: &FittedScore, query: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        fitted.predict(query)
    }

    /// Score estimates at the samples themselves, shape (n, d).
    fn estimate_gradients_s(&self, samples: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScoreError> {
        Ok(self.fit(samples)?.in_sample_scores().to_owned())
    }

    /// Score estimates at `query` from a fit on `samples`, shape (|Q|, d).
    fn estimate_gradients_x_s(
        &self,
        query: ArrayView2<'_, f64>,
        samples: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, ScoreError> {
        self.fit(samples)?.predict(query)
    }
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::estimators::approaches::common_nd::dataset::SampleSet;
use crate::estimators::approaches::kde::Kde;
use crate::estimators::approaches::kernel::Kernel;
use crate::estimators::approaches::spectral::{Landweber, Nkef, NuMethod, Ssge, Tikhonov};
use crate::estimators::approaches::stein::Stein;
use crate::estimators::error::ScoreError;
use crate::estimators::fitted::FittedScore;
use crate::estimators::traits::ScoreEstimator;

/// Any of the score estimators, selected at runtime.
///
/// ```rust
/// use kscore::estimators::{Estimator, ScoreEstimator, Stein, Tikhonov};
/// use ndarray::array;
///
/// let samples = array![[-1.0], [-0.2], [0.4], [1.1]];
/// let estimators: Vec<Estimator> = vec![
///     Tikhonov::new(1.0, 1e-2).unwrap().into(),
///     Stein::new(1.0).unwrap().into(),
/// ];
/// for est in &estimators {
///     let scores = est.estimate_gradients_s(samples.view()).unwrap();
///     assert_eq!(scores.dim(), (4, 1));
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Estimator {
    Tikhonov(Tikhonov),
    Nkef(Nkef),
    Landweber(Landweber),
    NuMethod(NuMethod),
    Ssge(Ssge),
    Stein(Stein),
    Kde(Kde),
}

impl Estimator {
    /// Short name of the estimator family.
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::Tikhonov(_) => "tikhonov",
            Estimator::Nkef(_) => "nkef",
            Estimator::Landweber(_) => "landweber",
            Estimator::NuMethod(_) => "nu_method",
            Estimator::Ssge(_) => "ssge",
            Estimator::Stein(_) => "stein",
            Estimator::Kde(_) => "kde",
        }
    }

    fn as_dyn(&self) -> &dyn ScoreEstimator {
        match self {
            Estimator::Tikhonov(e) => e,
            Estimator::Nkef(e) => e,
            Estimator::Landweber(e) => e,
            Estimator::NuMethod(e) => e,
            Estimator::Ssge(e) => e,
            Estimator::Stein(e) => e,
            Estimator::Kde(e) => e,
        }
    }
}

impl ScoreEstimator for Estimator {
    fn kernel(&self) -> &Kernel {
        self.as_dyn().kernel()
    }

    fn fit_samples(&self, samples: SampleSet) -> Result<FittedScore, ScoreError> {
        self.as_dyn().fit_samples(samples)
    }
}

macro_rules! impl_from_estimator {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Estimator {
                fn from(est: $variant) -> Self {
                    Estimator::$variant(est)
                }
            }
        )*
    };
}

impl_from_estimator!(Tikhonov, Nkef, Landweber, NuMethod, Ssge, Stein, Kde);

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Landmark selection for subsampled (Nyström-type) estimators.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::estimators::approaches::common_nd::dataset::MIN_SAMPLES;
use crate::estimators::error::ScoreError;

/// How landmark indices are drawn from the sample set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkStrategy {
    /// Uniformly without replacement, reproducible through the seed.
    Uniform { seed: u64 },
    /// Evenly spaced indices over the sample order.
    Strided,
}

impl Default for LandmarkStrategy {
    fn default() -> Self {
        LandmarkStrategy::Uniform { seed: 0 }
    }
}

/// Validate a subsampling rate in (0, 1].
pub fn check_subsample_rate(rate: f64) -> Result<(), ScoreError> {
    if rate.is_finite() && rate > 0.0 && rate <= 1.0 {
        Ok(())
    } else {
        Err(ScoreError::invalid(
            "subsample_rate",
            format!("must lie in (0, 1], got {rate}"),
        ))
    }
}

/// Number of landmarks for `n` samples: `round(rate * n)`, clamped to `[2, n]`.
pub fn landmark_count(n: usize, rate: f64) -> usize {
    let m = (rate * n as f64).round() as usize;
    m.clamp(MIN_SAMPLES.min(n), n)
}

/// Select landmark indices, returned sorted and distinct.
///
/// When every sample is kept the identity selection `0..n` is returned, so a
/// subsampled estimator with rate 1 sees the samples in their original order.
pub fn select_landmarks(n: usize, rate: f64, strategy: LandmarkStrategy) -> Vec<usize> {
    let m = landmark_count(n, rate);
    if m >= n {
        return (0..n).collect();
    }
    let mut indices = match strategy {
        LandmarkStrategy::Uniform { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            index::sample(&mut rng, n, m).into_vec()
        }
        LandmarkStrategy::Strided => (0..m).map(|k| k * n / m).collect(),
    };
    indices.sort_unstable();
    log::debug!("selected {} of {} samples as landmarks ({:?})", m, n, strategy);
    indices
}

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod approaches;
pub mod error;
pub mod estimator;
pub mod fitted;
pub mod traits;

pub use approaches::kde::Kde;
pub use approaches::kernel::{Bandwidth, Kernel, KernelType};
pub use approaches::landmark::LandmarkStrategy;
pub use approaches::spectral::{Landweber, Nkef, NuMethod, NuSchedule, RankSelection, Ssge, Tikhonov};
pub use approaches::stein::Stein;
pub use error::ScoreError;
pub use estimator::Estimator;
pub use fitted::FittedScore;
pub use traits::ScoreEstimator;

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod common_nd;
pub mod kde;
pub mod kernel;
pub mod landmark;
pub mod linalg;
pub mod operator;
pub mod spectral;
pub mod stein;

// Unified re-exports so tests and users can import
// kscore::estimators::approaches::* ergonomically.
pub use kde::Kde;
pub use kernel::{Bandwidth, Kernel, KernelType};
pub use spectral::{Landweber, Nkef, NuMethod, RankSelection, Ssge, Tikhonov};
pub use stein::Stein;

// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

mod kernel; // pairwise kernel values and analytic derivatives
pub use kernel::*; // re-export Kernel, KernelType, Bandwidth

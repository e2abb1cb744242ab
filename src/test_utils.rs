// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons.
//!
//! Positions and opacities are `f32`; compare them with the `approx` macros
//! rather than `assert_eq!`.

pub use approx::assert_abs_diff_eq;

/// Epsilon for positions computed through several float operations.
pub const F32_EPSILON: f32 = 1e-4;

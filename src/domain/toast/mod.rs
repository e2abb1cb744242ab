// SPDX-License-Identifier: MPL-2.0
//! Toast domain types.
//!
//! This module provides pure domain types for toasts:
//! - [`Opacity`]: Content opacity, clamped to 0.0–1.0
//! - [`ToastDuration`]: Display duration, finite and positive or infinite

mod newtypes;

pub use newtypes::{opacity_bounds, Opacity, ToastDuration};

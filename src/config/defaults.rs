// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Duration**: Named display durations
//! - **Fade**: Fade-in/fade-out timings and bounds
//! - **Opacity**: Content opacity of a fully faded-in toast
//! - **Queue**: Wait queue capacity

// ==========================================================================
// Duration Defaults
// ==========================================================================

/// Short display duration (in milliseconds).
pub const SHORT_DURATION_MS: u64 = 2000;

/// Long display duration (in milliseconds).
pub const LONG_DURATION_MS: u64 = 4000;

// ==========================================================================
// Fade Defaults
// ==========================================================================

/// Default fade-in time (in milliseconds).
pub const DEFAULT_FADE_IN_MS: u64 = 600;

/// Default fade-out time (in milliseconds).
pub const DEFAULT_FADE_OUT_MS: u64 = 300;

/// Maximum fade time accepted from the settings file (in milliseconds).
pub const MAX_FADE_MS: u64 = 10_000;

// ==========================================================================
// Opacity Defaults
// ==========================================================================

/// Default opacity of toast content once fully faded in.
pub const DEFAULT_CONTENT_OPACITY: f32 = 0.9;

/// Fully transparent.
pub const MIN_OPACITY: f32 = 0.0;

/// Fully opaque.
pub const MAX_OPACITY: f32 = 1.0;

// ==========================================================================
// Queue Defaults
// ==========================================================================

/// Maximum number of toasts waiting behind the visible one.
pub const QUEUE_CAPACITY: usize = 50;

// SPDX-License-Identifier: MPL-2.0
//! Toast newtypes.
//!
//! This module provides type-safe wrappers for toast presentation values,
//! ensuring they are always within valid ranges.

use std::fmt;
use std::num::NonZeroU64;
use std::time::Duration;

use crate::config::defaults::{
    DEFAULT_CONTENT_OPACITY, LONG_DURATION_MS, MAX_OPACITY, MIN_OPACITY, SHORT_DURATION_MS,
};
use crate::error::{Error, Result};

// =============================================================================
// Opacity Bounds
// =============================================================================

/// Opacity bounds (0.0 to 1.0).
pub mod opacity_bounds {
    use crate::config::defaults;

    /// Fully transparent.
    pub const MIN: f32 = defaults::MIN_OPACITY;
    /// Fully opaque.
    pub const MAX: f32 = defaults::MAX_OPACITY;
    /// Default content opacity.
    pub const DEFAULT: f32 = defaults::DEFAULT_CONTENT_OPACITY;
}

// =============================================================================
// Opacity
// =============================================================================

/// Opacity of toast content, guaranteed to be within 0.0–1.0.
///
/// # Example
///
/// ```
/// use toast_relay::domain::toast::Opacity;
///
/// assert_eq!(Opacity::new(0.5).value(), 0.5);
///
/// // Values outside range are clamped
/// assert_eq!(Opacity::new(1.7).value(), 1.0);
/// assert_eq!(Opacity::new(-0.2).value(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    /// Fully transparent content.
    pub const TRANSPARENT: Self = Self(MIN_OPACITY);

    /// Fully opaque content.
    pub const OPAQUE: Self = Self(MAX_OPACITY);

    /// Built-in opacity of fully faded-in content.
    pub const DEFAULT: Self = Self(DEFAULT_CONTENT_OPACITY);

    /// Creates a new opacity, clamping the value to the valid range.
    ///
    /// `NaN` is treated as fully transparent.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::TRANSPARENT;
        }
        Self(value.clamp(MIN_OPACITY, MAX_OPACITY))
    }

    /// Returns the raw opacity value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if the content is fully transparent.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.0 <= MIN_OPACITY
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// ToastDuration
// =============================================================================

/// How long a toast stays on screen before it fades out on its own.
///
/// A finite duration is always at least one millisecond; zero is rejected at
/// construction so the auto-hide timer never fires before display starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastDuration(Option<NonZeroU64>);

impl ToastDuration {
    /// Two seconds.
    pub const SHORT: Self = Self(NonZeroU64::new(SHORT_DURATION_MS));

    /// Four seconds.
    pub const LONG: Self = Self(NonZeroU64::new(LONG_DURATION_MS));

    /// No auto-hide; the toast stays until hidden explicitly.
    pub const INFINITE: Self = Self(None);

    /// Creates a finite duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDuration`] if `millis` is zero.
    pub fn from_millis(millis: u64) -> Result<Self> {
        NonZeroU64::new(millis)
            .map(|ms| Self(Some(ms)))
            .ok_or(Error::InvalidDuration(millis))
    }

    /// Returns the duration in milliseconds, or `None` if infinite.
    #[must_use]
    pub fn millis(self) -> Option<u64> {
        self.0.map(NonZeroU64::get)
    }

    /// Returns the auto-hide delay, or `None` for an infinite duration.
    #[must_use]
    pub fn auto_hide_after(self) -> Option<Duration> {
        self.millis().map(Duration::from_millis)
    }

    /// Returns true if the toast never hides on its own.
    #[must_use]
    pub fn is_infinite(self) -> bool {
        self.0.is_none()
    }
}

impl Default for ToastDuration {
    fn default() -> Self {
        Self::SHORT
    }
}

impl fmt::Display for ToastDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.millis() {
            Some(ms) => write!(f, "{ms} ms"),
            None => write!(f, "infinite"),
        }
    }
}

impl TryFrom<Duration> for ToastDuration {
    type Error = Error;

    fn try_from(duration: Duration) -> Result<Self> {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

// =============================================================================
// Tests
// =============================================================================

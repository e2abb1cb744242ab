// SPDX-License-Identifier: MPL-2.0
//! `toast_relay` shows transient toast notifications one at a time.
//!
//! Toasts fade in, stay for their duration, and fade out. While one toast is
//! on screen, later ones wait in a bounded FIFO queue shared by every
//! [`Toaster`] attached to the same [`Scheduler`](scheduler::Scheduler).
//! Rendering is delegated to a [`Host`](host::Host); [`headless`] provides
//! one without a GUI.

#![doc(html_root_url = "https://docs.rs/toast_relay/0.1.0")]

pub mod config;
pub mod domain;
pub mod error;
pub mod headless;
pub mod host;
pub mod scheduler;
pub mod timer;
pub mod toast;

#[cfg(test)]
mod test_utils;

pub use domain::toast::{Opacity, ToastDuration};
pub use error::{Error, HostError, Result};
pub use toast::{Side, Target, Toast, ToastId, ToastState, Toaster};

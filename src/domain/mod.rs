// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core value types with no host or I/O dependencies.
//!
//! # Modules
//!
//! - [`toast`]: Toast value objects ([`Opacity`](toast::Opacity),
//!   [`ToastDuration`](toast::ToastDuration))

pub mod toast;

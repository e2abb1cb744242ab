// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    /// A finite toast duration must be at least one millisecond.
    InvalidDuration(u64),
    /// The display target could not be resolved to a window or screen position.
    UnresolvableTarget(String),
}

/// Failures reported by the host framework while displaying a toast.
///
/// These never reach application code as errors: the toaster logs them,
/// abandons the show attempt and hands the display slot to the next waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The target window was closed before the toast could be shown.
    WindowClosed,

    /// The anchor node is no longer attached to a window.
    AnchorDetached,

    /// Any other host-specific failure, with a raw message.
    Other(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::WindowClosed => write!(f, "target window was closed"),
            HostError::AnchorDetached => write!(f, "anchor node is not attached to a window"),
            HostError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for HostError {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::InvalidDuration(ms) => {
                write!(f, "Invalid duration: {} ms (must be positive)", ms)
            }
            Error::UnresolvableTarget(e) => write!(f, "Unresolvable target: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn invalid_duration_mentions_value() {
        let err = Error::InvalidDuration(0);
        assert_eq!(
            format!("{}", err),
            "Invalid duration: 0 ms (must be positive)"
        );
    }

    #[test]
    fn unresolvable_target_formats_reason() {
        let err = Error::UnresolvableTarget("unknown window".into());
        assert!(err.to_string().contains("unknown window"));
    }

    #[test]
    fn host_error_messages_are_readable() {
        assert_eq!(HostError::WindowClosed.to_string(), "target window was closed");
        assert_eq!(
            HostError::Other("surface lost".into()).to_string(),
            "surface lost"
        );
    }
}

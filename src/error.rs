//! Error types for telemetry ingestion.
//!
//! All errors implement `std::error::Error` and carry enough structured context
//! to tell which decoder or which socket operation failed.
//!
//! ## Error Categories
//!
//! - **Bounds Errors**: a cursor read ran past the end of a datagram
//! - **Dispatch Errors**: unknown packet type or unknown event code
//! - **Format Errors**: a packet format rejected by [`FormatPolicy`](crate::FormatPolicy)
//! - **Socket Errors**: binding or configuring the UDP socket failed
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use trackside::TelemetryError;
//!
//! let error = TelemetryError::unknown_packet_type(42);
//! assert!(!error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error(
        "Index out of range in {label}: read of {requested} bytes at position {position} exceeds length {len}"
    )]
    IndexOutOfRange { label: &'static str, position: usize, requested: usize, len: usize },

    #[error("Unknown packet type id {id}")]
    UnknownPacketType { id: u8 },

    #[error("Unknown event code {code:?}")]
    UnknownEventCode { code: String },

    #[error("Unsupported packet format {format}")]
    UnsupportedFormat { format: u16 },

    #[error("Socket error during {operation}")]
    Socket {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn listener thread")]
    ThreadSpawn {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Configuration file error: {path}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// Decode failures are never retryable: UDP datagrams are not resent.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::IndexOutOfRange { .. } => false,
            TelemetryError::UnknownPacketType { .. } => false,
            TelemetryError::UnknownEventCode { .. } => false,
            TelemetryError::UnsupportedFormat { .. } => false,
            TelemetryError::Socket { .. } => true,
            TelemetryError::ThreadSpawn { .. } => true,
            TelemetryError::Config { .. } => false,
            TelemetryError::ConfigFile { .. } => false,
        }
    }

    /// Returns whether this error describes a single bad datagram.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            TelemetryError::IndexOutOfRange { .. }
                | TelemetryError::UnknownPacketType { .. }
                | TelemetryError::UnknownEventCode { .. }
                | TelemetryError::UnsupportedFormat { .. }
        )
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::IndexOutOfRange { .. } => vec![
                "Check the game's UDP format setting matches a supported year",
                "Verify the datagram was not truncated by the network",
            ],
            TelemetryError::UnknownPacketType { .. } | TelemetryError::UnknownEventCode { .. } => {
                vec![
                    "Select a supported UDP format in the game's telemetry settings",
                    "Check for corrupted traffic on the telemetry port",
                ]
            }
            TelemetryError::UnsupportedFormat { .. } => vec![
                "Select a supported UDP format in the game's telemetry settings",
                "Switch the format policy to accept unknown formats",
            ],
            TelemetryError::Socket { .. } => vec![
                "Ensure no other application is bound to the telemetry port",
                "Check firewall rules for inbound UDP traffic",
                "Try a different bind address or port",
            ],
            TelemetryError::ThreadSpawn { .. } => vec![
                "Check system thread limits",
                "Retry after releasing other resources",
            ],
            TelemetryError::Config { .. } => vec![
                "Check configuration values against the documented defaults",
                "Remove overrides to fall back to defaults",
            ],
            TelemetryError::ConfigFile { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for bounds violations.
    pub fn out_of_range(label: &'static str, position: usize, requested: usize, len: usize) -> Self {
        TelemetryError::IndexOutOfRange { label, position, requested, len }
    }

    /// Helper constructor for unknown packet type ids.
    pub fn unknown_packet_type(id: u8) -> Self {
        TelemetryError::UnknownPacketType { id }
    }

    /// Helper constructor for unknown event codes.
    pub fn unknown_event_code(code: &[u8]) -> Self {
        TelemetryError::UnknownEventCode { code: String::from_utf8_lossy(code).into_owned() }
    }

    /// Helper constructor for socket errors.
    pub fn socket(operation: impl Into<String>, source: std::io::Error) -> Self {
        TelemetryError::Socket { operation: operation.into(), source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        TelemetryError::Config { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn out_of_range_messages_carry_context(
            position in 0usize..0x10000usize,
            requested in 1usize..64usize,
            len in 0usize..0x10000usize
          ) {
            let error = TelemetryError::out_of_range("lap data", position, requested, len);
            let msg = error.to_string();

            prop_assert!(msg.contains("lap data"));
            prop_assert!(msg.contains(&position.to_string()));
            prop_assert!(msg.contains(&requested.to_string()));
            prop_assert!(msg.contains(&len.to_string()));
            prop_assert!(error.is_decode_error());
            prop_assert!(!error.is_retryable());
          }

          #[test]
          fn event_codes_render_lossily(code in prop::collection::vec(any::<u8>(), 4)) {
            let error = TelemetryError::unknown_event_code(&code);
            prop_assert!(!error.to_string().is_empty());
            prop_assert!(error.is_decode_error());
          }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<TelemetryError>();

        let error = TelemetryError::unknown_packet_type(12);
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn socket_errors_chain_their_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let error = TelemetryError::socket("bind 0.0.0.0:20777", io_err);

        let source = std::error::Error::source(&error).expect("socket error keeps its source");
        assert_eq!(source.to_string(), "port taken");
        assert!(error.is_retryable());
        assert!(!error.is_decode_error());
    }

    #[test]
    fn recovery_methods_work() {
        let errors = [
            TelemetryError::out_of_range("event", 28, 4, 30),
            TelemetryError::unknown_packet_type(10),
            TelemetryError::unknown_event_code(b"XXXX"),
            TelemetryError::UnsupportedFormat { format: 2017 },
            TelemetryError::config("port must be non-zero"),
        ];

        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty(), "{error} should suggest something");
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }

    #[test]
    fn unknown_event_code_displays_code() {
        let error = TelemetryError::unknown_event_code(b"ZZZZ");
        assert!(error.to_string().contains("ZZZZ"));
    }
}

//! Error types for shimport.

use crate::port::{PortListing, PortRecord};
use thiserror::Error;

/// Result type for shimport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for port resolution.
///
/// Every zero-candidate and multi-candidate failure carries the full
/// enumeration that was current when resolution failed, so the rendered
/// message tells the user which ports they can choose from.
#[derive(Debug, Error)]
pub enum Error {
    /// The OS port enumeration facility is unavailable.
    #[error("Serial port enumeration failed: {0}")]
    PlatformQueryFailed(String),

    /// No explicit port, no environment override and no match criteria.
    #[error(
        "No serial port specified. Provide a port string, set {env_var}, or pass match/vid/pid criteria."
    )]
    NoPortSpecified {
        /// Environment variable that was consulted.
        env_var: String,
    },

    /// Match criteria selected no port.
    #[error("No matching serial ports found. Available ports:\n{available}")]
    NoPortFound {
        /// Enumeration snapshot.
        available: PortListing,
    },

    /// Match criteria selected more than one port.
    #[error(
        "Multiple serial ports matched. Please disambiguate by providing a specific port. Available ports:\n{available}"
    )]
    AmbiguousPort {
        /// Ports that matched the criteria.
        candidates: Vec<PortRecord>,
        /// Enumeration snapshot.
        available: PortListing,
    },

    /// No Bluetooth heuristic matched any port.
    #[error("No Bluetooth serial ports found. {hint}\nAvailable ports:\n{available}")]
    NoBluetoothPortFound {
        /// Platform-specific pairing advice.
        hint: &'static str,
        /// Enumeration snapshot.
        available: PortListing,
    },

    /// The first non-empty Bluetooth heuristic matched more than one port.
    #[error(
        "Multiple Bluetooth serial ports found. Please disambiguate by providing a specific port via argument or {env_var}.\nAvailable ports:\n{available}"
    )]
    AmbiguousBluetoothPort {
        /// Environment variable that can pin the port.
        env_var: String,
        /// Ports the heuristic considered plausible.
        candidates: Vec<PortRecord>,
        /// Enumeration snapshot.
        available: PortListing,
    },
}

impl Error {
    /// Enumeration snapshot attached to the error, if any.
    pub fn available_ports(&self) -> Option<&[PortRecord]> {
        match self {
            Self::NoPortFound { available }
            | Self::AmbiguousPort { available, .. }
            | Self::NoBluetoothPortFound { available, .. }
            | Self::AmbiguousBluetoothPort { available, .. } => Some(available.ports()),
            Self::PlatformQueryFailed(_) | Self::NoPortSpecified { .. } => None,
        }
    }

    /// Ports that were equally plausible when resolution refused to guess.
    pub fn candidates(&self) -> Option<&[PortRecord]> {
        match self {
            Self::AmbiguousPort { candidates, .. }
            | Self::AmbiguousBluetoothPort { candidates, .. } => Some(candidates),
            _ => None,
        }
    }

    /// Whether the caller can fix this by supplying a port or different criteria.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Self::PlatformQueryFailed(_))
    }
}

impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        Self::PlatformQueryFailed(err.to_string())
    }
}

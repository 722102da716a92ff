//! # shimport
//!
//! Resolve "the serial port of my device" into a concrete port identifier.
//!
//! Device clients need a port name before they can open a byte stream. This
//! crate produces that name, and refuses to guess:
//!
//! - An explicit port or an override environment variable
//!   (`PYSHIMMER_PORT`, `PYSHIMMER_BT_PORT`) is used as-is
//! - Otherwise the visible serial ports are enumerated and narrowed by
//!   substring or USB VID/PID criteria
//! - Bluetooth ports are found with per-platform heuristics (`/dev/rfcommN`
//!   on Linux, `/dev/cu.*` on macOS, driver descriptions on Windows)
//! - Zero or several candidates are errors listing every visible port
//!
//! Nothing here opens the port.
//!
//! ## Supported Platforms
//!
//! Linux, macOS and Windows via the `serialport` crate. `COM10` and above are
//! rewritten to the `\\.\COMnn` form when running on Windows.
//!
//! ## Features
//!
//! - `serde`: Serialization support for [`PortRecord`] and [`MatchCriteria`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use shimport::{MatchCriteria, resolve_bluetooth_port, resolve_serial_port};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Dock on a CP210x bridge, unless PYSHIMMER_PORT says otherwise
//!     let dock = resolve_serial_port(None, MatchCriteria::new().vendor_id(0x10C4))?;
//!
//!     // Paired sensor, unless PYSHIMMER_BT_PORT says otherwise
//!     let sensor = resolve_bluetooth_port(None)?;
//!
//!     println!("dock: {dock}, sensor: {sensor}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod env;
pub mod error;
pub mod host;
pub mod platform;
pub mod port;
pub mod resolve;

// Re-exports for convenience
pub use {
    env::{EnvLookup, ProcessEnv},
    error::{Error, Result},
    host::{
        bluetooth_setup_hint, filter_serial_ports, list_serial_ports, resolve_bluetooth_port,
        resolve_serial_port, suggest_bluetooth_ports,
    },
    platform::{BluetoothCandidates, Platform},
    port::{
        MatchCriteria, NativePortEnumerator, PortEnumerator, PortListing, PortRecord, filter_ports,
    },
    resolve::{
        BLUETOOTH_PORT_ENV, BluetoothRequest, GENERIC_PORT_ENV, PortRequest, Resolver,
        normalize_port,
    },
};

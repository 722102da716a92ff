//! Host-side shortcuts wired to the OS enumeration and process environment.
//!
//! These are what most callers want: the native [`PortEnumerator`], the real
//! environment and the platform the process runs on.
//!
//! [`PortEnumerator`]: crate::port::PortEnumerator

use crate::{
    error::Result,
    platform::Platform,
    port::{MatchCriteria, PortRecord},
    resolve::{BluetoothRequest, PortRequest, Resolver},
};

/// List all visible serial ports.
pub fn list_serial_ports() -> Result<Vec<PortRecord>> {
    Resolver::native().list_ports()
}

/// List serial ports matching `criteria`.
pub fn filter_serial_ports(criteria: &MatchCriteria) -> Result<Vec<PortRecord>> {
    Resolver::native().filter_ports(criteria)
}

/// Ports that look like Bluetooth serial ports on this platform.
pub fn suggest_bluetooth_ports() -> Result<Vec<PortRecord>> {
    Resolver::native().suggest_bluetooth_ports()
}

/// Resolve a serial port from `port`, `PYSHIMMER_PORT` or `criteria`.
pub fn resolve_serial_port(port: Option<&str>, criteria: MatchCriteria) -> Result<String> {
    let mut request = PortRequest::new().criteria(criteria);
    request.port = port.map(str::to_string);
    Resolver::native().resolve_generic_port(&request)
}

/// Resolve a Bluetooth serial port from `port`, `PYSHIMMER_BT_PORT` or the
/// platform heuristics.
pub fn resolve_bluetooth_port(port: Option<&str>) -> Result<String> {
    let mut request = BluetoothRequest::new();
    request.port = port.map(str::to_string);
    Resolver::native().resolve_bluetooth_port(&request)
}

/// Pairing advice for the current platform.
pub fn bluetooth_setup_hint() -> &'static str {
    Platform::current().bluetooth_setup_hint()
}

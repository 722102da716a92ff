//! Port enumeration records and the enumerator abstraction.
//!
//! Every enumeration produces fresh [`PortRecord`] values. The resolver only
//! ever talks to a [`PortEnumerator`], so the OS query can be swapped for a
//! fixed list in tests or embedding applications.
//!
//! ```text
//! +------------------+
//! |     Resolver     |
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+     +------------------+
//! | PortEnumerator   | --> |   filter_ports   |
//! +--------+---------+     +------------------+
//!          |
//!          v
//! +--------+---------+
//! | NativePort-      |
//! | Enumerator       |
//! |  (serialport)    |
//! +------------------+
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use shimport::port::{MatchCriteria, NativePortEnumerator, PortEnumerator};
//!
//! fn main() -> shimport::Result<()> {
//!     let criteria = MatchCriteria::new().vendor_id(0x10C4);
//!     for port in NativePortEnumerator.filter_ports(&criteria)? {
//!         println!("{}", port.device);
//!     }
//!     Ok(())
//! }
//! ```

pub mod filter;
pub mod native;

use std::fmt;

use crate::error::Result;

pub use filter::{MatchCriteria, filter_ports};
pub use native::NativePortEnumerator;

/// One OS-visible serial endpoint.
///
/// `device` identifies the port; every other field is advisory metadata that
/// the OS or driver may not report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortRecord {
    /// Port name/path (e.g., "/dev/ttyUSB0" or "COM3").
    pub device: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Manufacturer string.
    pub manufacturer: Option<String>,
    /// Product string.
    pub product: Option<String>,
    /// Serial number.
    pub serial_number: Option<String>,
    /// Hardware id (e.g., "USB VID:PID=10C4:EA60 SER=0001").
    pub hardware_id: Option<String>,
    /// Physical location (bus path).
    pub location: Option<String>,
    /// Interface name or USB interface number.
    pub interface: Option<String>,
    /// USB vendor ID.
    pub vendor_id: Option<u16>,
    /// USB product ID.
    pub product_id: Option<u16>,
}

impl PortRecord {
    /// Create a record that knows only its device path.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            description: None,
            manufacturer: None,
            product: None,
            serial_number: None,
            hardware_id: None,
            location: None,
            interface: None,
            vendor_id: None,
            product_id: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set the product string.
    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Set the serial number.
    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set the hardware id.
    #[must_use]
    pub fn with_hardware_id(mut self, hardware_id: impl Into<String>) -> Self {
        self.hardware_id = Some(hardware_id.into());
        self
    }

    /// Set the USB vendor and product IDs.
    #[must_use]
    pub fn with_usb_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = Some(vendor_id);
        self.product_id = Some(product_id);
        self
    }

    /// Fields searched by a textual match, skipping the ones not reported.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.device.as_str()).chain(
            [
                &self.description,
                &self.hardware_id,
                &self.manufacturer,
                &self.product,
                &self.serial_number,
            ]
            .into_iter()
            .filter_map(Option::as_deref),
        )
    }
}

/// An enumeration snapshot rendered for humans.
///
/// Displays one `- <device> (<description>, <manufacturer>)` line per port,
/// or `- (no ports found)` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortListing(Vec<PortRecord>);

impl PortListing {
    /// Wrap an enumeration.
    pub fn new(ports: Vec<PortRecord>) -> Self {
        Self(ports)
    }

    /// The listed ports.
    pub fn ports(&self) -> &[PortRecord] {
        &self.0
    }
}

impl fmt::Display for PortListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("- (no ports found)");
        }

        for (i, port) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(
                f,
                "- {} ({}, {})",
                port.device,
                port.description.as_deref().unwrap_or("unknown"),
                port.manufacturer.as_deref().unwrap_or("unknown"),
            )?;
        }
        Ok(())
    }
}

/// Source of serial port enumerations.
///
/// Implementations must return a fresh snapshot on every call. An empty
/// vector means no ports are attached; `Err` is reserved for the OS facility
/// itself being unavailable.
pub trait PortEnumerator {
    /// List all currently visible serial ports.
    fn list_ports(&self) -> Result<Vec<PortRecord>>;

    /// List ports matching the given criteria.
    fn filter_ports(&self, criteria: &MatchCriteria) -> Result<Vec<PortRecord>> {
        let ports = self.list_ports()?;
        Ok(filter_ports(&ports, criteria))
    }
}

impl<F> PortEnumerator for F
where
    F: Fn() -> Result<Vec<PortRecord>>,
{
    fn list_ports(&self) -> Result<Vec<PortRecord>> {
        self()
    }
}

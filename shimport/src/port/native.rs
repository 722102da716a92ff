//! Native port enumeration using the `serialport` crate.
//!
//! Works on every platform `serialport` supports (Linux, macOS, Windows,
//! FreeBSD). Metadata the OS does not report stays `None`.

use {
    crate::{
        error::Result,
        port::{PortEnumerator, PortRecord},
    },
    log::trace,
    serialport::{SerialPortInfo, SerialPortType, UsbPortInfo},
};

/// Description given to ports the OS classifies as Bluetooth.
const BLUETOOTH_DESCRIPTION: &str = "Bluetooth serial port";

/// Description given to ports the OS classifies as PCI.
const PCI_DESCRIPTION: &str = "PCI serial port";

/// Native port enumerator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePortEnumerator;

impl PortEnumerator for NativePortEnumerator {
    fn list_ports(&self) -> Result<Vec<PortRecord>> {
        let ports = serialport::available_ports()?;

        Ok(ports.into_iter().map(port_record).collect())
    }
}

/// Convert a `serialport` description into a [`PortRecord`].
fn port_record(info: SerialPortInfo) -> PortRecord {
    let record = match info.port_type {
        SerialPortType::UsbPort(usb) => usb_record(info.port_name, usb),
        SerialPortType::BluetoothPort => {
            PortRecord::new(info.port_name).with_description(BLUETOOTH_DESCRIPTION)
        },
        SerialPortType::PciPort => PortRecord::new(info.port_name).with_description(PCI_DESCRIPTION),
        SerialPortType::Unknown => PortRecord::new(info.port_name),
    };

    trace!(
        "Found port: {} (VID: {:?}, PID: {:?}, description: {:?})",
        record.device, record.vendor_id, record.product_id, record.description
    );

    record
}

fn usb_record(device: String, usb: UsbPortInfo) -> PortRecord {
    let hardware_id = match &usb.serial_number {
        Some(serial) => format!("USB VID:PID={:04X}:{:04X} SER={serial}", usb.vid, usb.pid),
        None => format!("USB VID:PID={:04X}:{:04X}", usb.vid, usb.pid),
    };

    PortRecord {
        device,
        description: usb.product.clone(),
        manufacturer: usb.manufacturer,
        product: usb.product,
        serial_number: usb.serial_number,
        hardware_id: Some(hardware_id),
        location: None,
        interface: usb.interface.map(|interface| interface.to_string()),
        vendor_id: Some(usb.vid),
        product_id: Some(usb.pid),
    }
}

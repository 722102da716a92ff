//! Platform detection and Bluetooth port heuristics.
//!
//! Bluetooth serial ports look different on every OS. Linux exposes bound
//! rfcomm channels as `/dev/rfcommN`; macOS creates a `/dev/cu.*` callout
//! device named after the paired device. Each platform gets an ordered list
//! of patterns and the first pattern that matches anything wins.

use std::fmt;

use crate::port::{MatchCriteria, PortRecord, filter_ports};
use log::debug;

/// Operating system family the resolver runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    MacOs,
    /// Linux.
    Linux,
    /// Anything else (BSDs, illumos, ...).
    Other,
}

/// Ordered Bluetooth match patterns per platform.
const BLUETOOTH_HEURISTICS: &[(Platform, &[&str])] = &[
    (Platform::Linux, &["rfcomm", "bluetooth"]),
    (Platform::MacOs, &["bluetooth", "/dev/cu."]),
    (Platform::Windows, &["bluetooth"]),
];

/// Patterns used when a platform has no row of its own.
const DEFAULT_BLUETOOTH_HEURISTIC: &[&str] = &["bluetooth"];

impl Platform {
    /// Detect the platform of the running process.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Other => "other",
        }
    }

    /// Patterns tried, in order, when looking for a Bluetooth port.
    pub fn bluetooth_patterns(self) -> &'static [&'static str] {
        BLUETOOTH_HEURISTICS
            .iter()
            .find(|(platform, _)| *platform == self)
            .map_or(DEFAULT_BLUETOOTH_HEURISTIC, |(_, patterns)| *patterns)
    }

    /// How to pair the device so that it shows up as a serial port.
    pub fn bluetooth_setup_hint(self) -> &'static str {
        match self {
            Self::Windows => {
                "Pair the Shimmer in Windows Bluetooth settings and use the COM port \
                 exposed for the device (Device Manager -> Ports)."
            },
            Self::MacOs => {
                "Pair the Shimmer in System Settings -> Bluetooth and use the /dev/cu.* \
                 device that appears for it."
            },
            Self::Linux => {
                "Pair the device and create an rfcomm port (e.g. rfcomm bind) so it \
                 appears as /dev/rfcommN."
            },
            Self::Other => {
                "Pair the device with the operating system and expose it as a serial port."
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of the Bluetooth heuristics over one enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BluetoothCandidates {
    /// Ports matched by the first productive pattern.
    pub ports: Vec<PortRecord>,
    /// Pattern that produced `ports`; `None` once every pattern came up empty.
    pub pattern: Option<&'static str>,
}

impl BluetoothCandidates {
    /// True when no pattern matched any port.
    pub fn is_exhausted(&self) -> bool {
        self.ports.is_empty()
    }
}

/// Apply the platform's Bluetooth patterns to an enumeration.
///
/// Stops at the first pattern yielding at least one port.
pub fn suggest_bluetooth_ports(platform: Platform, ports: &[PortRecord]) -> BluetoothCandidates {
    for pattern in platform.bluetooth_patterns() {
        let found = filter_ports(ports, &MatchCriteria::matching(*pattern));
        debug!(
            "Bluetooth heuristic '{pattern}' on {platform}: {} candidate(s)",
            found.len()
        );
        if !found.is_empty() {
            return BluetoothCandidates {
                ports: found,
                pattern: Some(*pattern),
            };
        }
    }

    BluetoothCandidates {
        ports: Vec::new(),
        pattern: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices(candidates: &BluetoothCandidates) -> Vec<&str> {
        candidates
            .ports
            .iter()
            .map(|p| p.device.as_str())
            .collect()
    }

    #[test]
    fn test_from_os_name() {
        assert_eq!(Platform::from_os_name("windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os_name("linux"), Platform::Linux);
        assert_eq!(Platform::from_os_name("freebsd"), Platform::Other);
    }

    #[test]
    fn test_current_matches_target() {
        let expected = if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        };
        assert_eq!(Platform::current(), expected);
    }

    #[test]
    fn test_pattern_table() {
        assert_eq!(Platform::Linux.bluetooth_patterns(), &["rfcomm", "bluetooth"]);
        assert_eq!(Platform::MacOs.bluetooth_patterns(), &["bluetooth", "/dev/cu."]);
        assert_eq!(Platform::Windows.bluetooth_patterns(), &["bluetooth"]);
        assert_eq!(Platform::Other.bluetooth_patterns(), &["bluetooth"]);
    }

    #[test]
    fn test_linux_prefers_rfcomm() {
        let ports = vec![
            PortRecord::new("/dev/ttyUSB0"),
            PortRecord::new("/dev/rfcomm0"),
            PortRecord::new("/dev/ttyS1").with_description("Bluetooth serial port"),
        ];
        let candidates = suggest_bluetooth_ports(Platform::Linux, &ports);
        assert_eq!(devices(&candidates), vec!["/dev/rfcomm0"]);
        assert_eq!(candidates.pattern, Some("rfcomm"));
    }

    #[test]
    fn test_linux_falls_back_to_bluetooth() {
        let ports = vec![
            PortRecord::new("/dev/ttyUSB0"),
            PortRecord::new("/dev/ttyS1").with_description("Bluetooth serial port"),
        ];
        let candidates = suggest_bluetooth_ports(Platform::Linux, &ports);
        assert_eq!(devices(&candidates), vec!["/dev/ttyS1"]);
        assert_eq!(candidates.pattern, Some("bluetooth"));
    }

    #[test]
    fn test_macos_falls_back_to_callout_devices() {
        let ports = vec![
            PortRecord::new("/dev/tty.usbserial-1410"),
            PortRecord::new("/dev/cu.Shimmer3-4F2A"),
        ];
        let candidates = suggest_bluetooth_ports(Platform::MacOs, &ports);
        assert_eq!(devices(&candidates), vec!["/dev/cu.Shimmer3-4F2A"]);
        assert_eq!(candidates.pattern, Some("/dev/cu."));
    }

    #[test]
    fn test_macos_bluetooth_wins_over_callout() {
        let ports = vec![
            PortRecord::new("/dev/cu.usbserial-1410"),
            PortRecord::new("/dev/cu.Bluetooth-Incoming-Port"),
        ];
        let candidates = suggest_bluetooth_ports(Platform::MacOs, &ports);
        assert_eq!(devices(&candidates), vec!["/dev/cu.Bluetooth-Incoming-Port"]);
    }

    #[test]
    fn test_windows_has_no_fallback() {
        let ports = vec![PortRecord::new("COM3"), PortRecord::new("/dev/cu.device")];
        let candidates = suggest_bluetooth_ports(Platform::Windows, &ports);
        assert!(candidates.is_exhausted());
        assert_eq!(candidates.pattern, None);
    }

    #[test]
    fn test_first_productive_pattern_keeps_all_matches() {
        let ports = vec![
            PortRecord::new("COM4").with_description("Standard Serial over Bluetooth link"),
            PortRecord::new("COM5").with_description("Standard Serial over Bluetooth link"),
        ];
        let candidates = suggest_bluetooth_ports(Platform::Windows, &ports);
        assert_eq!(devices(&candidates), vec!["COM4", "COM5"]);
    }

    #[test]
    fn test_setup_hints_are_platform_specific() {
        assert!(Platform::Linux.bluetooth_setup_hint().contains("/dev/rfcommN"));
        assert!(Platform::MacOs.bluetooth_setup_hint().contains("/dev/cu.*"));
        assert!(Platform::Windows.bluetooth_setup_hint().contains("Device Manager"));
        assert!(!Platform::Other.bluetooth_setup_hint().is_empty());
    }
}

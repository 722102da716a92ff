//! Resolving a logical port request into one concrete port identifier.
//!
//! Both entry points share the same decision order:
//!
//! 1. An explicit port wins and is returned without enumerating anything.
//! 2. A non-empty override environment variable is treated as explicit.
//! 3. Otherwise the ports are enumerated once and narrowed, by match criteria
//!    for [`Resolver::resolve_generic_port`] or by the platform heuristics for
//!    [`Resolver::resolve_bluetooth_port`].
//!
//! Narrowing must end with exactly one port. Zero or several candidates are
//! reported as errors carrying the full enumeration; the resolver never picks
//! one of several plausible ports on its own.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shimport::{MatchCriteria, PortRequest, Resolver};
//!
//! fn main() -> shimport::Result<()> {
//!     let resolver = Resolver::native();
//!     let request = PortRequest::new().criteria(MatchCriteria::new().vendor_id(0x10C4));
//!     let port = resolver.resolve_generic_port(&request)?;
//!     println!("Using {port}");
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use crate::{
    env::{EnvLookup, ProcessEnv},
    error::{Error, Result},
    platform::{Platform, suggest_bluetooth_ports},
    port::{MatchCriteria, NativePortEnumerator, PortEnumerator, PortListing, PortRecord, filter_ports},
};

/// Environment variable overriding generic port resolution.
pub const GENERIC_PORT_ENV: &str = "PYSHIMMER_PORT";

/// Environment variable overriding Bluetooth port resolution.
pub const BLUETOOTH_PORT_ENV: &str = "PYSHIMMER_BT_PORT";

/// A request for a port selected by explicit name, environment or criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRequest {
    /// Explicit port; skips enumeration entirely.
    pub port: Option<String>,
    /// Criteria applied to the enumeration.
    pub criteria: MatchCriteria,
    /// Environment variable consulted when no explicit port is given.
    pub env_var: String,
}

impl Default for PortRequest {
    fn default() -> Self {
        Self {
            port: None,
            criteria: MatchCriteria::default(),
            env_var: GENERIC_PORT_ENV.to_string(),
        }
    }
}

impl PortRequest {
    /// Create a request with no port, no criteria and the default variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit port.
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Narrow the enumeration with `criteria`.
    #[must_use]
    pub fn criteria(mut self, criteria: MatchCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Consult a different environment variable.
    #[must_use]
    pub fn env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }
}

/// A request for the port of a paired Bluetooth device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BluetoothRequest {
    /// Explicit port; skips enumeration entirely.
    pub port: Option<String>,
    /// Environment variable consulted when no explicit port is given.
    pub env_var: String,
}

impl Default for BluetoothRequest {
    fn default() -> Self {
        Self {
            port: None,
            env_var: BLUETOOTH_PORT_ENV.to_string(),
        }
    }
}

impl BluetoothRequest {
    /// Create a request with no port and the default variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit port.
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Consult a different environment variable.
    #[must_use]
    pub fn env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }
}

/// Port resolver over an enumerator and an environment.
///
/// The platform is detected on every call unless pinned with
/// [`Resolver::with_platform`].
#[derive(Debug, Clone)]
pub struct Resolver<E, V> {
    enumerator: E,
    env: V,
    platform: Option<Platform>,
}

impl Resolver<NativePortEnumerator, ProcessEnv> {
    /// Resolver backed by the OS enumeration and the process environment.
    pub fn native() -> Self {
        Self::new(NativePortEnumerator, ProcessEnv)
    }
}

impl Default for Resolver<NativePortEnumerator, ProcessEnv> {
    fn default() -> Self {
        Self::native()
    }
}

impl<E: PortEnumerator, V: EnvLookup> Resolver<E, V> {
    /// Create a resolver.
    pub fn new(enumerator: E, env: V) -> Self {
        Self {
            enumerator,
            env,
            platform: None,
        }
    }

    /// Pin the platform instead of detecting it per call.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Platform used for heuristics and normalization.
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    /// Enumerate all currently visible ports.
    pub fn list_ports(&self) -> Result<Vec<PortRecord>> {
        self.enumerator.list_ports()
    }

    /// Enumerate the ports matching `criteria`.
    pub fn filter_ports(&self, criteria: &MatchCriteria) -> Result<Vec<PortRecord>> {
        self.enumerator.filter_ports(criteria)
    }

    /// Ports the platform heuristics consider plausible Bluetooth ports.
    pub fn suggest_bluetooth_ports(&self) -> Result<Vec<PortRecord>> {
        let ports = self.enumerator.list_ports()?;
        Ok(suggest_bluetooth_ports(self.platform(), &ports).ports)
    }

    /// Resolve a port from an explicit name, the environment or match criteria.
    ///
    /// Fails with [`Error::NoPortSpecified`] when none of the three is given,
    /// [`Error::NoPortFound`] when the criteria match nothing and
    /// [`Error::AmbiguousPort`] when they match more than one port.
    pub fn resolve_generic_port(&self, request: &PortRequest) -> Result<String> {
        let platform = self.platform();

        if let Some(port) = self.override_port(request.port.as_deref(), &request.env_var) {
            return Ok(normalize_port(&port, platform));
        }

        if request.criteria.is_empty() {
            return Err(Error::NoPortSpecified {
                env_var: request.env_var.clone(),
            });
        }

        let available = self.enumerator.list_ports()?;
        let mut matched = filter_ports(&available, &request.criteria);
        debug!(
            "{} of {} port(s) match {:?}",
            matched.len(),
            available.len(),
            request.criteria
        );

        match matched.len() {
            0 => Err(Error::NoPortFound {
                available: PortListing::new(available),
            }),
            1 => {
                let port = matched.swap_remove(0);
                info!("Resolved port: {}", port.device);
                Ok(normalize_port(&port.device, platform))
            },
            _ => Err(Error::AmbiguousPort {
                candidates: matched,
                available: PortListing::new(available),
            }),
        }
    }

    /// Resolve the serial port of a paired Bluetooth device.
    ///
    /// Falls back to the platform heuristics when neither an explicit port
    /// nor the environment variable is given. Fails with
    /// [`Error::NoBluetoothPortFound`] when no heuristic matches and with
    /// [`Error::AmbiguousBluetoothPort`] when the first productive heuristic
    /// matches more than one port.
    pub fn resolve_bluetooth_port(&self, request: &BluetoothRequest) -> Result<String> {
        let platform = self.platform();

        if let Some(port) = self.override_port(request.port.as_deref(), &request.env_var) {
            return Ok(normalize_port(&port, platform));
        }

        let available = self.enumerator.list_ports()?;
        let mut candidates = suggest_bluetooth_ports(platform, &available);

        match candidates.ports.len() {
            0 => Err(Error::NoBluetoothPortFound {
                hint: platform.bluetooth_setup_hint(),
                available: PortListing::new(available),
            }),
            1 => {
                let port = candidates.ports.swap_remove(0);
                info!(
                    "Resolved Bluetooth port: {} (matched '{}')",
                    port.device,
                    candidates.pattern.unwrap_or_default()
                );
                Ok(normalize_port(&port.device, platform))
            },
            _ => Err(Error::AmbiguousBluetoothPort {
                env_var: request.env_var.clone(),
                candidates: candidates.ports,
                available: PortListing::new(available),
            }),
        }
    }

    /// Explicit port, else the non-empty value of `env_var`.
    fn override_port(&self, explicit: Option<&str>, env_var: &str) -> Option<String> {
        if let Some(port) = explicit {
            info!("Using explicit port: {port}");
            return Some(port.to_string());
        }

        match self.env.var(env_var) {
            Some(port) if !port.is_empty() => {
                info!("Using port from {env_var}: {port}");
                Some(port)
            },
            _ => None,
        }
    }
}

/// Rewrite `port` into the form the target OS expects.
///
/// On Windows, `COM10` and above must be opened through the `\\.\` device
/// namespace; `COM1`-`COM9` and every other name pass through. Other
/// platforms get the name unchanged.
pub fn normalize_port(port: &str, platform: Platform) -> String {
    if platform == Platform::Windows && is_extended_com_port(port) {
        return format!(r"\\.\{}", port.to_ascii_uppercase());
    }
    port.to_string()
}

/// `COM` followed by two or more digits.
fn is_extended_com_port(port: &str) -> bool {
    port.len() > 4
        && port
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("com"))
        && port[3..].bytes().all(|b| b.is_ascii_digit())
}

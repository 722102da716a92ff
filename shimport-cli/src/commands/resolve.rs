//! Port resolution command implementations.

use {
    anyhow::Result,
    shimport::{BluetoothRequest, MatchCriteria, PortRequest, Resolver},
};

/// Resolve command implementation.
///
/// Prints the resolved port on stdout.
pub(crate) fn cmd_resolve(
    port: Option<&str>,
    criteria: MatchCriteria,
    env_var: Option<&str>,
) -> Result<()> {
    let request = build_port_request(port, criteria, env_var);
    let resolved = Resolver::native().resolve_generic_port(&request)?;
    println!("{resolved}");
    Ok(())
}

/// Bluetooth command implementation.
///
/// Prints the resolved port on stdout.
pub(crate) fn cmd_bluetooth(port: Option<&str>, env_var: Option<&str>) -> Result<()> {
    let request = build_bluetooth_request(port, env_var);
    let resolved = Resolver::native().resolve_bluetooth_port(&request)?;
    println!("{resolved}");
    Ok(())
}

/// Print pairing advice for the running platform.
pub(crate) fn cmd_bluetooth_hint() {
    println!("{}", Resolver::native().platform().bluetooth_setup_hint());
}

fn build_port_request(
    port: Option<&str>,
    criteria: MatchCriteria,
    env_var: Option<&str>,
) -> PortRequest {
    let mut request = PortRequest::new().criteria(criteria);
    request.port = port.map(str::to_string);
    if let Some(name) = env_var {
        request = request.env_var(name);
    }
    request
}

fn build_bluetooth_request(port: Option<&str>, env_var: Option<&str>) -> BluetoothRequest {
    let mut request = BluetoothRequest::new();
    request.port = port.map(str::to_string);
    if let Some(name) = env_var {
        request = request.env_var(name);
    }
    request
}

//! Port listing command implementation.

use {
    anyhow::{Context, Result},
    console::style,
    shimport::{MatchCriteria, PortRecord, Resolver},
};

/// List ports command implementation.
pub(crate) fn cmd_list_ports(criteria: &MatchCriteria, json: bool) -> Result<()> {
    let ports = Resolver::native()
        .filter_ports(criteria)
        .context("Failed to enumerate serial ports")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ports_json(&ports))?);
        return Ok(());
    }

    eprintln!("{}", style("Serial ports:").bold().underlined());

    if ports.is_empty() {
        let message = if criteria.is_empty() {
            "No serial ports found"
        } else {
            "No serial ports match the given criteria"
        };
        eprintln!("  {}", style(message).dim());
    } else {
        for port in &ports {
            eprintln!("  {} {}", style("•").green(), format_port_line(port));
        }
    }

    Ok(())
}

/// JSON envelope for `--json` output.
fn ports_json(ports: &[PortRecord]) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "data": {
            "ports": ports,
        }
    })
}

/// One human-readable line for a port, without the bullet.
fn format_port_line(port: &PortRecord) -> String {
    let vid_pid = if let (Some(vid), Some(pid)) = (port.vendor_id, port.product_id) {
        format!(" ({vid:04X}:{pid:04X})")
    } else {
        String::new()
    };

    let description = port
        .description
        .as_deref()
        .map(|d| format!(" - {}", style(d).dim()))
        .unwrap_or_default();

    let manufacturer = port
        .manufacturer
        .as_deref()
        .map(|m| format!(" [{}]", style(m).yellow()))
        .unwrap_or_default();

    format!(
        "{}{vid_pid}{description}{manufacturer}",
        style(&port.device).cyan()
    )
}

//! Port-readiness polling
//!
//! stunnel gives no explicit "ready" signal, so readiness is inferred from
//! OS state: the local accept port appearing in the kernel TCP table. This
//! keeps the supervisor decoupled from the tunnel implementation at the
//! cost of up to one polling interval of slack.

use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Delay between readiness probes
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default overall readiness deadline
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(5);

/// Wait until the tunnel's local port accepts connections
///
/// Polls every 100ms under a wall-clock deadline. Returns `true` as soon
/// as the port is bound, `false` when the deadline elapses — a timeout is
/// a recoverable condition for the caller, never a panic.
pub fn wait_until_ready(port: u16, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;

    loop {
        if port_is_bound(port) {
            debug!("Port 127.0.0.1:{} is ready", port);
            return true;
        }
        if Instant::now() >= deadline {
            debug!("Port 127.0.0.1:{} did not become ready in time", port);
            return false;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Check the kernel TCP table for a bound loopback port
///
/// Reads `/proc/net/tcp`; where that is unavailable a loopback connect
/// probe stands in.
fn port_is_bound(port: u16) -> bool {
    match std::fs::read_to_string("/proc/net/tcp") {
        Ok(table) => table_has_loopback_port(&table, port),
        Err(_) => connect_probe(port),
    }
}

/// Scan /proc/net/tcp lines for a loopback or wildcard local address on
/// `port` in any bound state
fn table_has_loopback_port(table: &str, port: u16) -> bool {
    // Format: "sl local_address rem_address st ..." with the local address
    // as little-endian hex, e.g. 0100007F:C350 for 127.0.0.1:50000.
    let needle = format!(":{:04X}", port);
    table.lines().skip(1).any(|line| {
        line.split_whitespace()
            .nth(1)
            .map(|local| {
                local.ends_with(&needle)
                    && (local.starts_with("0100007F") || local.starts_with("00000000"))
            })
            .unwrap_or(false)
    })
}

fn connect_probe(port: u16) -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpStream::connect_timeout(&addr, Duration::from_millis(50)).is_ok()
}

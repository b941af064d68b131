use std::collections::HashSet;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ports::errors::PortError;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of `value`'s UTF-8 bytes.
///
/// Stable across machines, runs and platforms, unlike `DefaultHasher`.
pub fn stable_hash(value: &str) -> u32 {
    value.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Home port of `branch`: `base_port + (hash mod span)`.
///
/// Returned as `u32` since it may lie above 65535 for high base ports. A zero
/// `span` is treated as 1, so the result is always `base_port`.
pub fn starting_port(branch: &str, base_port: u16, span: u32) -> u32 {
    u32::from(base_port) + stable_hash(branch) % span.max(1)
}

/// Decides whether a candidate port is already taken on the host.
pub trait PortProbe {
    fn is_in_use(&self, port: u16) -> bool;
}

impl<F> PortProbe for F
where
    F: Fn(u16) -> bool,
{
    fn is_in_use(&self, port: u16) -> bool {
        self(port)
    }
}

/// Probe that attempts a TCP connect to `127.0.0.1:<port>`.
///
/// A successful connect means something is listening. Refused or timed-out
/// connects count as free.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::from_millis(crate::config::defaults::DEFAULT_PROBE_TIMEOUT_MS)
    }
}

impl PortProbe for TcpProbe {
    fn is_in_use(&self, port: u16) -> bool {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        TcpStream::connect_timeout(&addr, self.timeout).is_ok()
    }
}

/// Pick a port for `branch` deterministically.
///
/// Linearly probes `2 * span` candidates from [`starting_port`], accepting
/// the first that is neither in `used` nor reported busy by `probe`.
/// Candidates above 65535 are unusable and end the scan.
///
/// # Errors
///
/// `PortError::InvalidSpan` for `span == 0`; `PortError::Exhausted` when the
/// window holds no acceptable candidate. Never falls back to an unchecked port.
pub fn allocate_port(
    branch: &str,
    base_port: u16,
    used: &HashSet<u16>,
    span: u32,
    probe: &dyn PortProbe,
) -> Result<u16, PortError> {
    if span == 0 {
        return Err(PortError::InvalidSpan);
    }

    let start = starting_port(branch, base_port, span);
    let window = span.saturating_mul(2);

    info!(
        event = "core.port.allocate_started",
        branch = branch,
        base_port = base_port,
        span = span,
        start = start,
        used_count = used.len()
    );

    for offset in 0..window {
        let candidate = start + offset;
        let Ok(port) = u16::try_from(candidate) else {
            warn!(
                event = "core.port.window_past_max",
                branch = branch,
                candidate = candidate
            );
            break;
        };

        if used.contains(&port) {
            debug!(event = "core.port.candidate_recorded", port = port);
            continue;
        }
        if probe.is_in_use(port) {
            debug!(event = "core.port.candidate_bound", port = port);
            continue;
        }

        info!(
            event = "core.port.allocate_completed",
            branch = branch,
            port = port,
            probes = offset + 1
        );
        return Ok(port);
    }

    let last = start + window - 1;
    warn!(
        event = "core.port.allocate_exhausted",
        branch = branch,
        first = start,
        last = last
    );
    Err(PortError::Exhausted {
        branch: branch.to_string(),
        base_port,
        span,
        first: start,
        last,
    })
}

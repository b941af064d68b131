//! Default values for tool settings, with environment overrides.

use crate::config::types::Config;
use tracing::warn;

pub const DEFAULT_PORT_SPAN: u32 = 500;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 100;

const MAX_PORT_SPAN: u32 = 10_000;
const MAX_PROBE_TIMEOUT_MS: u64 = 5_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            port_span: parse_port_span(std::env::var("DUX_PORT_SPAN").ok().as_deref()),
            probe_timeout_ms: parse_probe_timeout(
                std::env::var("DUX_PORT_PROBE_TIMEOUT_MS").ok().as_deref(),
            ),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parse a DUX_PORT_SPAN value, warning and falling back on invalid input.
pub fn parse_port_span(value: Option<&str>) -> u32 {
    let Some(val) = value else {
        return DEFAULT_PORT_SPAN;
    };

    match val.trim().parse::<u32>() {
        Ok(span) if span > 0 && span <= MAX_PORT_SPAN => span,
        _ => {
            warn!(
                event = "core.config.port_span_invalid",
                value = val,
                fallback = DEFAULT_PORT_SPAN
            );
            eprintln!(
                "Warning: Invalid DUX_PORT_SPAN '{}', using default {}",
                val, DEFAULT_PORT_SPAN
            );
            DEFAULT_PORT_SPAN
        }
    }
}

/// Parse a DUX_PORT_PROBE_TIMEOUT_MS value, warning and falling back on invalid input.
pub fn parse_probe_timeout(value: Option<&str>) -> u64 {
    let Some(val) = value else {
        return DEFAULT_PROBE_TIMEOUT_MS;
    };

    match val.trim().parse::<u64>() {
        Ok(ms) if ms > 0 && ms <= MAX_PROBE_TIMEOUT_MS => ms,
        _ => {
            warn!(
                event = "core.config.probe_timeout_invalid",
                value = val,
                fallback = DEFAULT_PROBE_TIMEOUT_MS
            );
            eprintln!(
                "Warning: Invalid DUX_PORT_PROBE_TIMEOUT_MS '{}', using default {}",
                val, DEFAULT_PROBE_TIMEOUT_MS
            );
            DEFAULT_PROBE_TIMEOUT_MS
        }
    }
}

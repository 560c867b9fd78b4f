//! Ingestion settings, loadable from YAML and overridable from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::packets::{FormatPolicy, MAX_PACKET_SIZE};
use crate::{Result, TelemetryError};

/// Default UDP port the simulator broadcasts on.
pub const DEFAULT_PORT: u16 = 20777;

/// Environment variable overriding [`IngestConfig::port`].
pub const PORT_ENV: &str = "TRACKSIDE_UDP_PORT";
/// Environment variable overriding [`IngestConfig::bind_address`].
pub const BIND_ADDRESS_ENV: &str = "TRACKSIDE_BIND_ADDRESS";

/// Settings for the UDP listener and the drain loop.
///
/// Every field has a default, so a YAML document only needs the keys it
/// changes:
///
/// ```yaml
/// port: 20778
/// format_policy: reject_unsupported
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Local address to bind.
    pub bind_address: IpAddr,
    /// Local port to bind; 0 picks an ephemeral port.
    pub port: u16,
    /// Size of the receive buffer. Must hold the longest packet, since the OS
    /// silently truncates longer datagrams.
    pub recv_buffer_bytes: usize,
    /// Socket read timeout used to notice shutdown requests.
    pub poll_interval_ms: u64,
    /// Handling of unrecognised packet format years.
    pub format_policy: FormatPolicy,
    /// Expected send rate of the simulator, used to normalise update rates.
    pub source_hz: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            recv_buffer_bytes: 2048,
            poll_interval_ms: 250,
            format_policy: FormatPolicy::Accept,
            source_hz: 60.0,
        }
    }
}

impl IngestConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::config(format!("YAML parsing failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|source| TelemetryError::ConfigFile { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "Loaded ingest configuration");
        Self::from_yaml_str(&yaml)
    }

    /// Apply `TRACKSIDE_UDP_PORT` and `TRACKSIDE_BIND_ADDRESS` if set.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = var(PORT_ENV) {
            self.port = raw
                .trim()
                .parse()
                .map_err(|_| TelemetryError::config(format!("{PORT_ENV} is not a port: {raw:?}")))?;
            debug!(port = self.port, "Port overridden from environment");
        }
        if let Some(raw) = var(BIND_ADDRESS_ENV) {
            self.bind_address = raw.trim().parse().map_err(|_| {
                TelemetryError::config(format!("{BIND_ADDRESS_ENV} is not an IP address: {raw:?}"))
            })?;
            debug!(address = %self.bind_address, "Bind address overridden from environment");
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.recv_buffer_bytes < MAX_PACKET_SIZE {
            return Err(TelemetryError::config(format!(
                "recv_buffer_bytes must be at least {MAX_PACKET_SIZE}, got {}",
                self.recv_buffer_bytes
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(TelemetryError::config("poll_interval_ms must be greater than zero"));
        }
        if !(self.source_hz.is_finite() && self.source_hz > 0.0) {
            return Err(TelemetryError::config("source_hz must be a positive number"));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Loopback on an ephemeral port.
    pub fn loopback() -> Self {
        Self { bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST), port: 0, ..Self::default() }
    }
}

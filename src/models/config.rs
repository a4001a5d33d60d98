//! Configuration data model and validation

use crate::delay::LatencyConfig;
use crate::logging::LogFormat;
use crate::types::{AppError, DistributionShape, EchoMode, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main application configuration for the reflector server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Address the echo server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Lower latency bound in seconds (sign is ignored)
    #[serde(default)]
    pub min_latency: f64,

    /// Upper latency bound in seconds (sign is ignored)
    #[serde(default)]
    pub max_latency: f64,

    /// Distribution shape for per-request delays
    #[serde(default)]
    pub shape: DistributionShape,

    /// Echo without any delay
    #[serde(default)]
    pub passthrough: bool,

    /// Seed for a reproducible delay sequence
    #[serde(default)]
    pub seed: Option<u64>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            min_latency: crate::defaults::DEFAULT_MIN_LATENCY,
            max_latency: crate::defaults::DEFAULT_MAX_LATENCY,
            shape: DistributionShape::default(),
            passthrough: false,
            seed: None,
            enable_color: default_enable_color(),
            log_format: LogFormat::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(AppError::config("Listen address cannot be empty"));
        }

        if self.passthrough && self.seed.is_some() {
            return Err(AppError::config("A seed has no effect in passthrough mode; drop --seed/REFLECTOR_SEED or --passthrough/REFLECTOR_PASSTHROUGH"));
        }

        self.socket_addr()?;
        self.latency_config()?;

        Ok(())
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        normalize_listen_addr(&self.listen_addr)
            .parse::<SocketAddr>()
            .map_err(|e| AppError::config(format!("Invalid listen address '{}': {}", self.listen_addr, e)))
    }

    /// Latency range and shape handed to the delay generator
    pub fn latency_config(&self) -> Result<LatencyConfig> {
        LatencyConfig::new(self.min_latency, self.max_latency, self.shape)
    }

    /// Whether requests are delayed or echoed straight back
    pub fn echo_mode(&self) -> EchoMode {
        EchoMode::from_passthrough(self.passthrough)
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(listen) = std::env::var("REFLECTOR_LISTEN") {
            self.listen_addr = normalize_listen_addr(&listen);
        }

        if let Ok(min_latency) = std::env::var("REFLECTOR_MIN_LATENCY") {
            self.min_latency = min_latency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid REFLECTOR_MIN_LATENCY value '{}': {}", min_latency, e)))?;
        }

        if let Ok(max_latency) = std::env::var("REFLECTOR_MAX_LATENCY") {
            self.max_latency = max_latency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid REFLECTOR_MAX_LATENCY value '{}': {}", max_latency, e)))?;
        }

        if let Ok(shape) = std::env::var("REFLECTOR_SHAPE") {
            self.shape = shape.parse()?;
        }

        if let Ok(passthrough) = std::env::var("REFLECTOR_PASSTHROUGH") {
            self.passthrough = passthrough.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid REFLECTOR_PASSTHROUGH value '{}': {}", passthrough, e)))?;
        }

        if let Ok(seed) = std::env::var("REFLECTOR_SEED") {
            self.seed = Some(seed.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid REFLECTOR_SEED value '{}': {}", seed, e)))?);
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(log_format) = std::env::var("LOG_FORMAT") {
            self.log_format = log_format.parse()?;
        }

        Ok(())
    }
}

/// Accept `8880`, `:8880` or `host:port`; bare ports bind to loopback
pub fn normalize_listen_addr(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(port) = raw.strip_prefix(':') {
        format!("{}:{}", crate::defaults::DEFAULT_HOST, port)
    } else if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("{}:{}", crate::defaults::DEFAULT_HOST, raw)
    } else {
        raw.to_string()
    }
}

// Default value functions for serde
fn default_listen_addr() -> String {
    format!("{}:{}", crate::defaults::DEFAULT_HOST, crate::defaults::DEFAULT_PORT)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

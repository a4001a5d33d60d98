//! Variable Reflector
//!
//! A synthetic-latency HTTP echo server. Every request is answered after a
//! delay drawn from a configurable distribution (uniform, symmetric,
//! right-skewed or left-skewed), so clients and proxies can be exercised
//! against slow backends without having one. A companion spam client fires
//! sequential requests and reports the observed round-trip times.

pub mod cli;
pub mod config;
pub mod delay;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod spam;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use delay::{DelayGenerator, DelaySample, LatencyConfig, RandomSource, SeededRandom, ThreadRandom};
pub use error::{AppError, Result};
pub use models::Config;
pub use server::ReflectorServer;
pub use spam::{SpamClient, SpamConfig};
pub use stats::LatencySummary;
pub use types::{DistributionShape, EchoMode};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_HOST: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8880;
    pub const DEFAULT_MIN_LATENCY: f64 = 0.0;
    pub const DEFAULT_MAX_LATENCY: f64 = 0.0;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Upper bounds beyond this draw a startup warning
    pub const LARGE_LATENCY_WARNING: f64 = 300.0;

    pub const DEFAULT_SPAM_COUNT: u32 = 100;
    pub const DEFAULT_SPAM_TARGET: &str = "http://localhost:8888";
    pub const DEFAULT_SPAM_PATH: &str = "/health";
    pub const DEFAULT_SPAM_TIMEOUT: Duration = Duration::from_secs(30);
}

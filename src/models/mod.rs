//! Data models and structures for the reflector

pub mod config;

// Re-export main model types
pub use config::{Config, normalize_listen_addr};

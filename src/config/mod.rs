//! Configuration management module

pub mod parser;
pub mod validation;
pub mod env;

// Re-export main functionality
pub use parser::{ConfigParser, load_config, display_config_summary};
pub use validation::{ConfigValidator, ValidationLevel, ValidationWarning, validate_config};
pub use env::EnvManager;

// Re-export from models for convenience
pub use crate::models::Config;

#[cfg(test)]
pub(crate) mod tests_support {
    use std::sync::Mutex;

    /// Serializes tests that read or write process environment variables
    pub(crate) static ENV_LOCK: Mutex<()> = Mutex::new(());

    pub(crate) fn clear_reflector_env() {
        for (var_name, _, _) in super::EnvManager::get_supported_env_vars() {
            std::env::remove_var(var_name);
        }
    }
}

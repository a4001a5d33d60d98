//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use crate::types::DistributionShape;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file; a missing file is not an error
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                println!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            println!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Variable Reflector Configuration
#
# Values here act as defaults and are overridden by command-line arguments.

# Bind address: a port, ":port" or "host:port"
# REFLECTOR_LISTEN=127.0.0.1:8880

# Latency bounds in seconds (signs are ignored, an inverted range is swapped)
# REFLECTOR_MIN_LATENCY=0.0
# REFLECTOR_MAX_LATENCY=0.0

# Distribution shape: u (uniform), m (symmetric), l (right-skewed), x (left-skewed)
# REFLECTOR_SHAPE=u

# Echo without delay (true/false)
# REFLECTOR_PASSTHROUGH=false

# Reproducible delay sequence
# REFLECTOR_SEED=42

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Log format: console, json or compact
# LOG_FORMAT=console

# Example: mostly fast backend with an occasional three-second stall
# REFLECTOR_MIN_LATENCY=0.05
# REFLECTOR_MAX_LATENCY=3
# REFLECTOR_SHAPE=l
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "REFLECTOR_LISTEN" => {
                crate::models::normalize_listen_addr(value)
                    .parse::<std::net::SocketAddr>()
                    .map_err(|e| AppError::config(format!("Invalid REFLECTOR_LISTEN value '{}': {}", value, e)))?;
            }
            "REFLECTOR_MIN_LATENCY" | "REFLECTOR_MAX_LATENCY" => {
                let latency: f64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if !latency.is_finite() {
                    return Err(AppError::config(format!("{} must be a finite number, got: {}", key, value)));
                }
            }
            "REFLECTOR_SHAPE" => {
                value.parse::<DistributionShape>()?;
            }
            "REFLECTOR_PASSTHROUGH" | "ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            "REFLECTOR_SEED" => {
                value.parse::<u64>()
                    .map_err(|e| AppError::config(format!("Invalid REFLECTOR_SEED value '{}': {}", value, e)))?;
            }
            "LOG_FORMAT" => {
                value.parse::<LogFormat>()?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("REFLECTOR_LISTEN", "Bind address (port, :port or host:port)", "127.0.0.1:8880"),
            ("REFLECTOR_MIN_LATENCY", "Lower latency bound in seconds", "0.1"),
            ("REFLECTOR_MAX_LATENCY", "Upper latency bound in seconds", "2.5"),
            ("REFLECTOR_SHAPE", "Distribution shape (u, m, l, x)", "m"),
            ("REFLECTOR_PASSTHROUGH", "Echo without delay", "false"),
            ("REFLECTOR_SEED", "Seed for a reproducible delay sequence", "42"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_FORMAT", "Log format (console, json, compact)", "json"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }

    /// Validate the key=value lines of an env file without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if let Err(e) = Self::validate_env_var(key.trim(), value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_mentions_every_var() {
        let content = EnvManager::create_example_env_content();
        for (var_name, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", var_name)), "missing {}", var_name);
        }
    }

    #[test]
    fn test_example_content_is_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        // Uncomment every assignment and check it validates
        let uncommented: String = EnvManager::create_example_env_content()
            .lines()
            .filter_map(|line| line.strip_prefix("# "))
            .filter(|line| line.starts_with("REFLECTOR_") || line.starts_with("ENABLE_") || line.starts_with("LOG_"))
            .map(|line| format!("{}\n", line))
            .collect();
        temp_file.write_all(uncommented.as_bytes()).unwrap();

        let warnings = EnvManager::check_env_file(temp_file.path()).unwrap().unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        EnvManager::save_example_env_file(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("Variable Reflector Configuration"));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("REFLECTOR_LISTEN", ":8880").is_ok());
        assert!(EnvManager::validate_env_var("REFLECTOR_LISTEN", "0.0.0.0:9000").is_ok());
        assert!(EnvManager::validate_env_var("REFLECTOR_MIN_LATENCY", "-0.5").is_ok());
        assert!(EnvManager::validate_env_var("REFLECTOR_MAX_LATENCY", " 3 ").is_ok());
        assert!(EnvManager::validate_env_var("REFLECTOR_SHAPE", "X").is_ok());
        assert!(EnvManager::validate_env_var("REFLECTOR_PASSTHROUGH", "true").is_ok());
        assert!(EnvManager::validate_env_var("REFLECTOR_SEED", "42").is_ok());
        assert!(EnvManager::validate_env_var("LOG_FORMAT", "json").is_ok());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "anything").is_ok());

        assert!(EnvManager::validate_env_var("REFLECTOR_LISTEN", "nowhere").is_err());
        assert!(EnvManager::validate_env_var("REFLECTOR_MIN_LATENCY", "fast").is_err());
        assert!(EnvManager::validate_env_var("REFLECTOR_MAX_LATENCY", "inf").is_err());
        assert!(EnvManager::validate_env_var("REFLECTOR_SHAPE", "q").is_err());
        assert!(EnvManager::validate_env_var("REFLECTOR_PASSTHROUGH", "maybe").is_err());
        assert!(EnvManager::validate_env_var("REFLECTOR_SEED", "-1").is_err());
        assert!(EnvManager::validate_env_var("LOG_FORMAT", "xml").is_err());
    }

    #[test]
    fn test_check_env_file_reports_bad_lines() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "# comment").unwrap();
        writeln!(temp_file, "REFLECTOR_SHAPE=m").unwrap();
        writeln!(temp_file, "REFLECTOR_MAX_LATENCY=lots").unwrap();
        writeln!(temp_file).unwrap();

        let warnings = EnvManager::check_env_file(temp_file.path()).unwrap().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("REFLECTOR_MAX_LATENCY"));
    }

    #[test]
    fn test_check_env_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.env");
        assert!(EnvManager::check_env_file(&missing).unwrap().is_none());
        assert!(EnvManager::load_env_file_from(&missing, false).is_ok());
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("REFLECTOR_SHAPE"));
        assert!(help.contains("Configuration Priority"));
    }
}

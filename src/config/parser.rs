//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::{normalize_listen_addr, Config},
};
use std::path::PathBuf;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read defaults from a different env file
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;

        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref listen) = self.cli.listen {
            config.listen_addr = normalize_listen_addr(listen);
        }

        if let Some(min_latency) = self.cli.min_latency {
            config.min_latency = min_latency;
        }

        if let Some(max_latency) = self.cli.max_latency {
            config.max_latency = max_latency;
        }

        if let Some(shape) = self.cli.shape {
            config.shape = shape;
        }

        if self.cli.passthrough {
            config.passthrough = true;
        }

        if let Some(seed) = self.cli.seed {
            config.seed = Some(seed);
        }

        if let Some(log_format) = self.cli.log_format {
            config.log_format = log_format;
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!("Final config: listen={}, range=[{}, {}], shape={}",
                config.listen_addr, config.min_latency, config.max_latency, config.shape.name());
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Listen Address: {}", config.listen_addr));
    summary.push(format!("Latency Range: {}s .. {}s", config.min_latency, config.max_latency));
    summary.push(format!("Shape: {} ({})", config.shape.name(), config.shape.token()));
    summary.push(format!("Mode: {}", if config.passthrough { "passthrough" } else { "delayed" }));
    summary.push(format!("Seed: {}", config.seed.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())));
    summary.push(format!("Log Format: {:?}", config.log_format));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

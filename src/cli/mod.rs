//! Command-line interfaces for the reflector server and the spam client

pub mod help;

pub use help::HelpSystem;

use crate::logging::LogFormat;
use crate::types::DistributionShape;
use clap::Parser;

/// Variable Reflector - echo HTTP requests back after a synthetic delay
#[derive(Parser, Debug, Clone)]
#[command(name = "reflector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Listen address: a port (8880), ":8880", or host:port [default: 127.0.0.1:8880]
    #[arg(short = 'i', long = "listen-port", value_name = "ADDR")]
    pub listen: Option<String>,

    /// Minimum reflection latency in seconds [default: 0.0]
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    pub min_latency: Option<f64>,

    /// Maximum reflection latency in seconds [default: 0.0]
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    pub max_latency: Option<f64>,

    /// Delay distribution: u (uniform), m (symmetric around mid-range),
    /// l (favour low latency), x (favour high latency) [default: u]
    #[arg(short = 'g', long, visible_alias = "gausian", value_parser = parse_shape, value_name = "SHAPE")]
    pub shape: Option<DistributionShape>,

    /// Echo immediately without injecting any delay
    #[arg(long)]
    pub passthrough: bool,

    /// Seed the delay generator for a reproducible sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log output format: console, json or compact
    #[arg(long, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output (echoed bodies are logged)
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for a specific topic (shapes, config, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!("Unknown help topic: '{}'\n\nAvailable topics: shapes, config, examples\n\n{}",
                        topic, help_system.display_main_help(use_colors))
                })
        } else {
            help_system.display_main_help(use_colors)
        }
    }
}

/// Reflector Spam - send sequential requests and report round-trip times
#[derive(Parser, Debug, Clone)]
#[command(name = "reflector-spam")]
#[command(version, about, long_about = None)]
pub struct SpamCli {
    /// Number of queries to send
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_SPAM_COUNT)]
    pub count: u32,

    /// Base URL of the server (or proxy) under test
    #[arg(short, long, default_value = crate::defaults::DEFAULT_SPAM_TARGET)]
    pub target: String,

    /// Path requested on every iteration
    #[arg(long, default_value = crate::defaults::DEFAULT_SPAM_PATH)]
    pub path: String,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = parse_timeout, default_value_t = crate::defaults::DEFAULT_SPAM_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Skip the latency summary after the last request
    #[arg(long)]
    pub no_summary: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl SpamCli {
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse a distribution shape selector
fn parse_shape(s: &str) -> Result<DistributionShape, String> {
    s.parse::<DistributionShape>().map_err(|e| e.to_string())
}

/// Parse a log format name
fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}

/// Parse timeout from seconds string
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > 3600 {
                Err("Timeout cannot exceed 3600 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::parse_from(["reflector"]);
        assert!(cli.listen.is_none());
        assert!(cli.min_latency.is_none());
        assert!(cli.max_latency.is_none());
        assert!(cli.shape.is_none());
        assert!(!cli.passthrough);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["reflector", "-i", ":9000", "-l", "0.5", "-x", "2.5", "-g", "m"]);
        assert_eq!(cli.listen.as_deref(), Some(":9000"));
        assert_eq!(cli.min_latency, Some(0.5));
        assert_eq!(cli.max_latency, Some(2.5));
        assert_eq!(cli.shape, Some(DistributionShape::Symmetric));
    }

    #[test]
    fn test_cli_long_flags_and_alias() {
        let cli = Cli::parse_from([
            "reflector",
            "--listen-port", "0.0.0.0:8880",
            "--min-latency", "1",
            "--max-latency", "11",
            "--gausian", "x",
            "--seed", "42",
            "--log-format", "json",
            "--no-color",
            "--debug",
        ]);
        assert_eq!(cli.shape, Some(DistributionShape::LeftSkewed));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(cli.no_color);
        assert!(cli.debug);
    }

    #[test]
    fn test_negative_latency_accepted() {
        let cli = Cli::parse_from(["reflector", "-l", "-0.25", "-x", "-1"]);
        assert_eq!(cli.min_latency, Some(-0.25));
        assert_eq!(cli.max_latency, Some(-1.0));
    }

    #[test]
    fn test_invalid_shape_rejected() {
        let result = Cli::try_parse_from(["reflector", "-g", "h"]);
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Unknown distribution shape"));
    }

    #[test]
    fn test_invalid_latency_rejected() {
        assert!(Cli::try_parse_from(["reflector", "-x", "slow"]).is_err());
    }

    #[test]
    fn test_cli_validation() {
        let cli = Cli::parse_from(["reflector", "--color", "--no-color"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["reflector", "--passthrough"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_use_colors_method() {
        let cli = Cli::parse_from(["reflector", "--color"]);
        assert!(cli.use_colors());

        let cli = Cli::parse_from(["reflector", "--no-color"]);
        assert!(!cli.use_colors());
    }

    #[test]
    fn test_help_display() {
        let cli = Cli::parse_from(["reflector", "--no-color", "--help-topic", "shapes"]);
        assert!(cli.should_show_topic_help());
        assert!(cli.display_help().contains("right-skewed"));

        let cli = Cli::parse_from(["reflector", "--no-color", "--help-topic", "nonsense"]);
        assert!(cli.display_help().contains("Unknown help topic: 'nonsense'"));
    }

    #[test]
    fn test_spam_cli_defaults() {
        let cli = SpamCli::parse_from(["reflector-spam"]);
        assert_eq!(cli.count, 100);
        assert_eq!(cli.target, "http://localhost:8888");
        assert_eq!(cli.path, "/health");
        assert_eq!(cli.timeout, 30);
        assert!(!cli.no_summary);
    }

    #[test]
    fn test_spam_cli_overrides() {
        let cli = SpamCli::parse_from(["reflector-spam", "-c", "5", "-t", "http://127.0.0.1:8880", "--timeout", "2", "--no-summary"]);
        assert_eq!(cli.count, 5);
        assert_eq!(cli.target, "http://127.0.0.1:8880");
        assert_eq!(cli.timeout, 2);
        assert!(cli.no_summary);
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout("10"), Ok(10));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("+5").is_err());
        assert!(parse_timeout("0x10").is_err());
        assert!(parse_timeout("3601").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}

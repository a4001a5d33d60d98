//! Configuration validation utilities and rules

use crate::{
    delay::LatencyConfig,
    error::Result,
    models::Config,
    types::DistributionShape,
};
use colored::*;

/// Configuration validator producing startup warnings
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    ///
    /// Hard errors (unparsable address, non-finite bounds) are returned as
    /// `Err`; everything else that deserves operator attention comes back as
    /// a list of warnings.
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_listen_address(config)?);
        warnings.extend(Self::validate_latency_range(config)?);
        warnings.extend(Self::validate_mode(config));

        Ok(warnings)
    }

    fn validate_listen_address(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let addr = config.socket_addr()?;

        if !addr.ip().is_loopback() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Listening on non-loopback address {}; the echo server will reflect request bodies to anyone who can reach it", addr),
            ));
        }

        if addr.port() == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Port 0 requested; the operating system will pick a free port".to_string(),
            ));
        }

        Ok(warnings)
    }

    fn validate_latency_range(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let latency = config.latency_config()?;

        if latency.was_inverted() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Minimum latency {} is greater than maximum {}; using range [{}, {}]",
                    config.min_latency, config.max_latency, latency.min_latency(), latency.max_latency()
                ),
            ));
        }

        if config.min_latency < 0.0 || config.max_latency < 0.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Negative latency bounds are treated as magnitudes: [{}, {}] becomes [{}, {}]",
                    config.min_latency, config.max_latency, latency.min_latency(), latency.max_latency()
                ),
            ));
        }

        if !config.passthrough {
            warnings.extend(Self::validate_shape_fit(&latency));
        }

        if latency.max_latency() > crate::defaults::LARGE_LATENCY_WARNING {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Maximum latency {}s exceeds {}s; most clients will time out first",
                    latency.max_latency(), crate::defaults::LARGE_LATENCY_WARNING
                ),
            ));
        }

        Ok(warnings)
    }

    fn validate_shape_fit(latency: &LatencyConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if latency.span() == 0.0 && latency.shape() != DistributionShape::Uniform {
            let message = if latency.shape() == DistributionShape::Symmetric {
                "Zero-width latency range with the symmetric shape; every delay will be 0".to_string()
            } else {
                format!(
                    "Zero-width latency range with the {} shape; delays are not confined to {}s",
                    latency.shape().name(), latency.min_latency()
                )
            };
            warnings.push(ValidationWarning::new(ValidationLevel::Warning, message));
        }

        if latency.shape() == DistributionShape::Symmetric && latency.span() > 0.0 {
            let mu = latency.span() / 2.0;
            let sigma = mu - latency.signed_min_latency();
            if mu < sigma.abs() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!(
                        "Symmetric shape has mean {:.3}s and deviation {:.3}s; many draws will be clamped to 0",
                        mu, sigma.abs()
                    ),
                ));
            }
        }

        warnings
    }

    fn validate_mode(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.passthrough && (config.min_latency != 0.0 || config.max_latency != 0.0) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Passthrough mode is enabled; the configured latency range is ignored".to_string(),
            ));
        }

        if let Some(seed) = config.seed {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Delay generator seeded with {}; the delay sequence is reproducible", seed),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if !use_color {
            return format!("{} {}", tag, self.message);
        }

        let tag = match self.level {
            ValidationLevel::Info => tag.blue().bold(),
            ValidationLevel::Warning => tag.yellow().bold(),
        };
        format!("{} {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Statistical shape used to draw per-request delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionShape {
    /// Flat across the configured range
    #[default]
    Uniform,
    /// Bell curve centered mid-range, tails unclamped
    Symmetric,
    /// Mostly near the lower bound with a long tail upward
    RightSkewed,
    /// Mirror of `RightSkewed`: mostly slow, occasionally fast
    LeftSkewed,
}

impl DistributionShape {
    /// All shapes in selector order
    pub const ALL: [DistributionShape; 4] = [
        DistributionShape::Uniform,
        DistributionShape::Symmetric,
        DistributionShape::RightSkewed,
        DistributionShape::LeftSkewed,
    ];

    /// Single-letter selector accepted on the command line
    pub fn token(&self) -> &'static str {
        match self {
            DistributionShape::Uniform => "u",
            DistributionShape::Symmetric => "m",
            DistributionShape::RightSkewed => "l",
            DistributionShape::LeftSkewed => "x",
        }
    }

    /// Long selector name
    pub fn name(&self) -> &'static str {
        match self {
            DistributionShape::Uniform => "uniform",
            DistributionShape::Symmetric => "symmetric",
            DistributionShape::RightSkewed => "right-skewed",
            DistributionShape::LeftSkewed => "left-skewed",
        }
    }

    /// Every token and name accepted by `FromStr`, for help and error text
    pub fn accepted_tokens() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .flat_map(|shape| [shape.token(), shape.name()])
            .collect()
    }
}

impl fmt::Display for DistributionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionShape {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "uniform" => Ok(DistributionShape::Uniform),
            "m" | "symmetric" | "mean" => Ok(DistributionShape::Symmetric),
            "l" | "right-skewed" | "right" | "low" => Ok(DistributionShape::RightSkewed),
            "x" | "left-skewed" | "left" | "high" => Ok(DistributionShape::LeftSkewed),
            other => Err(AppError::config(format!(
                "Unknown distribution shape '{}' (expected one of: {})",
                other,
                Self::accepted_tokens().join(", ")
            ))),
        }
    }
}

/// How the echo server treats each request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EchoMode {
    /// Sleep for a generated delay before echoing
    Delayed,
    /// Echo immediately, for baseline comparison
    Passthrough,
}

impl EchoMode {
    pub fn from_passthrough(passthrough: bool) -> Self {
        if passthrough {
            EchoMode::Passthrough
        } else {
            EchoMode::Delayed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_tokens_round_trip() {
        for shape in DistributionShape::ALL {
            assert_eq!(shape.token().parse::<DistributionShape>().unwrap(), shape);
            assert_eq!(shape.name().parse::<DistributionShape>().unwrap(), shape);
        }
    }

    #[test]
    fn test_shape_parsing_is_case_insensitive() {
        assert_eq!("U".parse::<DistributionShape>().unwrap(), DistributionShape::Uniform);
        assert_eq!(" Left-Skewed ".parse::<DistributionShape>().unwrap(), DistributionShape::LeftSkewed);
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = "h".parse::<DistributionShape>().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("'h'"));
        assert!(err.to_string().contains("uniform"));
    }

    #[test]
    fn test_default_shape_is_uniform() {
        assert_eq!(DistributionShape::default(), DistributionShape::Uniform);
    }

    #[test]
    fn test_shape_serde_names() {
        let json = serde_json::to_string(&DistributionShape::RightSkewed).unwrap();
        assert_eq!(json, "\"right-skewed\"");
        let back: DistributionShape = serde_json::from_str("\"left-skewed\"").unwrap();
        assert_eq!(back, DistributionShape::LeftSkewed);
    }

    #[test]
    fn test_echo_mode() {
        assert_eq!(EchoMode::from_passthrough(true), EchoMode::Passthrough);
        assert_eq!(EchoMode::from_passthrough(false), EchoMode::Delayed);
    }
}

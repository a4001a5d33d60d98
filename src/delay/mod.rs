//! Delay generation for the reflector
//!
//! Turns a [`LatencyConfig`] into one non-negative [`DelaySample`] per
//! request. The four shapes share the same bounds:
//!
//! - uniform: flat over `[lo, hi]` at millisecond precision
//! - symmetric: normal with `mu = (hi - lo) / 2`, tails left unclamped
//! - right-skewed: folded log-normal scaled onto the range, long upper tail
//! - left-skewed: the right-skewed value mirrored about `(lo + hi) / 2`
//!
//! Every result is floored at zero.

pub mod random;


pub use random::{RandomSource, SeededRandom, ThreadRandom};

use crate::{
    error::{AppError, Result},
    types::DistributionShape,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Draws are rounded to this many steps per second
pub const PRECISION: f64 = 1000.0;

/// Folded log-normal draws are kept at or below this value
pub const SKEW_CEILING: f64 = 10.0;

/// Latency range and shape, fixed at startup
///
/// Bounds are absolute values with `min_latency <= max_latency`. An inverted
/// pair is swapped on construction and [`LatencyConfig::was_inverted`]
/// reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyConfig {
    min_latency: f64,
    max_latency: f64,
    /// Lower bound as supplied, sign included. Feeds the symmetric sigma.
    signed_min_latency: f64,
    shape: DistributionShape,
    inverted: bool,
}

impl LatencyConfig {
    /// Build a config from raw bounds in seconds
    pub fn new(min_latency: f64, max_latency: f64, shape: DistributionShape) -> Result<Self> {
        if !min_latency.is_finite() {
            return Err(AppError::validation(format!("min_latency must be a finite number, got {}", min_latency)));
        }
        if !max_latency.is_finite() {
            return Err(AppError::validation(format!("max_latency must be a finite number, got {}", max_latency)));
        }

        let (lo, hi) = (min_latency.abs(), max_latency.abs());
        let config = if lo > hi {
            Self {
                min_latency: hi,
                max_latency: lo,
                signed_min_latency: max_latency,
                shape,
                inverted: true,
            }
        } else {
            Self {
                min_latency: lo,
                max_latency: hi,
                signed_min_latency: min_latency,
                shape,
                inverted: false,
            }
        };

        Ok(config)
    }

    /// Lower bound in seconds (`lo`)
    pub fn min_latency(&self) -> f64 {
        self.min_latency
    }

    /// Upper bound in seconds (`hi`)
    pub fn max_latency(&self) -> f64 {
        self.max_latency
    }

    /// Lower bound exactly as supplied, before sign normalization
    pub fn signed_min_latency(&self) -> f64 {
        self.signed_min_latency
    }

    pub fn shape(&self) -> DistributionShape {
        self.shape
    }

    /// Whether the supplied bounds had to be swapped
    pub fn was_inverted(&self) -> bool {
        self.inverted
    }

    /// `hi - lo`, never negative
    pub fn span(&self) -> f64 {
        self.max_latency - self.min_latency
    }

    /// Point the left-skewed shape mirrors about
    pub fn midpoint(&self) -> f64 {
        (self.min_latency + self.max_latency) / 2.0
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            min_latency: 0.0,
            max_latency: 0.0,
            signed_min_latency: 0.0,
            shape: DistributionShape::Uniform,
            inverted: false,
        }
    }
}

/// One generated delay in seconds, always `>= 0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DelaySample(f64);

impl DelaySample {
    /// Floor a raw formula output at zero
    pub fn clamped(raw: f64) -> Self {
        // NaN compares false and lands on zero as well
        if raw > 0.0 {
            Self(raw)
        } else {
            Self(0.0)
        }
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    pub fn millis(&self) -> f64 {
        self.0 * 1000.0
    }

    /// Duration to sleep for. Saturates on values too large to represent.
    pub fn as_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.0).unwrap_or(Duration::MAX)
    }
}

/// Compute one delay for `config` using draws from `source`
pub fn generate(config: &LatencyConfig, source: &dyn RandomSource) -> DelaySample {
    let raw = match config.shape() {
        DistributionShape::Uniform => uniform_delay(config, source),
        DistributionShape::Symmetric => symmetric_delay(config, source.standard_normal()),
        DistributionShape::RightSkewed => right_skewed_delay(config, log_normal_draw(source)),
        DistributionShape::LeftSkewed => left_skewed_delay(config, log_normal_draw(source)),
    };
    DelaySample::clamped(raw)
}

/// LogNormal(0, 1)
fn log_normal_draw(source: &dyn RandomSource) -> f64 {
    source.standard_normal().exp()
}

fn uniform_delay(config: &LatencyConfig, source: &dyn RandomSource) -> f64 {
    let (lo, hi) = (config.min_latency(), config.max_latency());
    let drawn = source.uniform(lo, hi);
    ((drawn * PRECISION).round() / PRECISION).clamp(lo, hi)
}

/// Raw symmetric value for a standard normal draw `z`, before the zero floor
pub fn symmetric_delay(config: &LatencyConfig, z: f64) -> f64 {
    let mu = config.span() / 2.0;
    let sigma = mu - config.signed_min_latency();
    mu + sigma * z
}

/// Raw right-skewed value for a log-normal draw, before the zero floor
pub fn right_skewed_delay(config: &LatencyConfig, draw: f64) -> f64 {
    let mut x = if draw.is_finite() { draw } else { SKEW_CEILING };
    while x > SKEW_CEILING {
        x /= SKEW_CEILING;
    }

    let span = config.span();
    let scale = if span > 0.0 { span / SKEW_CEILING } else { 1.0 };
    scale * x + config.min_latency()
}

/// Raw left-skewed value: the right-skewed value for the same draw,
/// reflected about the middle of the range
pub fn left_skewed_delay(config: &LatencyConfig, draw: f64) -> f64 {
    (config.min_latency() + config.max_latency()) - right_skewed_delay(config, draw)
}

/// Per-request delay generator with an injected randomness source
#[derive(Clone)]
pub struct DelayGenerator {
    config: LatencyConfig,
    source: Arc<dyn RandomSource>,
}

impl DelayGenerator {
    pub fn new(config: LatencyConfig, source: Arc<dyn RandomSource>) -> Self {
        Self { config, source }
    }

    /// Generator drawing from the thread-local RNG
    pub fn with_thread_rng(config: LatencyConfig) -> Self {
        Self::new(config, Arc::new(ThreadRandom::new()))
    }

    /// Generator with a reproducible sequence of draws
    pub fn seeded(config: LatencyConfig, seed: u64) -> Self {
        Self::new(config, Arc::new(SeededRandom::new(seed)))
    }

    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    /// Draw the delay for one request
    pub fn generate(&self) -> DelaySample {
        generate(&self.config, self.source.as_ref())
    }
}

impl std::fmt::Debug for DelayGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

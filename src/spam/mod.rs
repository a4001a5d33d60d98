//! Sequential load generator for the echo server (or a proxy in front of it)

use crate::{
    error::{AppError, Result},
    stats::LatencySummary,
};
use reqwest::Client;
use std::io::Write;
use std::time::{Duration, Instant};
use url::Url;

/// Spam client settings
#[derive(Debug, Clone, PartialEq)]
pub struct SpamConfig {
    /// Base URL of the server under test
    pub target: String,
    /// Path requested on every iteration
    pub path: String,
    /// Number of requests to send
    pub count: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            target: crate::defaults::DEFAULT_SPAM_TARGET.to_string(),
            path: crate::defaults::DEFAULT_SPAM_PATH.to_string(),
            count: crate::defaults::DEFAULT_SPAM_COUNT,
            timeout: crate::defaults::DEFAULT_SPAM_TIMEOUT,
        }
    }
}

impl SpamConfig {
    /// URL for request `id`: `<target><path>?id=<id>`
    pub fn request_url(&self, id: u32) -> Result<Url> {
        let mut url = Url::parse(&self.target)
            .map_err(|e| AppError::config(format!("Invalid target URL '{}': {}", self.target, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::config(format!("Target URL must use http or https: {}", self.target)));
        }

        url.set_path(&self.path);
        url.set_query(Some(&format!("id={}", id)));
        Ok(url)
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub id: u32,
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl RoundTrip {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

/// All round trips of a run plus a summary of the successful ones
#[derive(Debug, Clone)]
pub struct SpamReport {
    pub round_trips: Vec<RoundTrip>,
    pub summary: Option<LatencySummary>,
}

impl SpamReport {
    fn from_round_trips(round_trips: Vec<RoundTrip>) -> Self {
        let seconds: Vec<f64> = round_trips
            .iter()
            .filter(|rt| rt.is_success())
            .map(|rt| rt.elapsed.as_secs_f64())
            .collect();

        Self {
            summary: LatencySummary::from_samples(&seconds),
            round_trips,
        }
    }

    pub fn failures(&self) -> usize {
        self.round_trips.iter().filter(|rt| !rt.is_success()).count()
    }
}

/// Fires `count` sequential GETs and times each one
pub struct SpamClient {
    config: SpamConfig,
    client: Client,
}

impl SpamClient {
    pub fn new(config: SpamConfig) -> Result<Self> {
        // Fail on a bad target before sending anything
        config.request_url(0)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SpamConfig {
        &self.config
    }

    /// Send one request and time it; failures are recorded, not returned
    pub async fn send(&self, id: u32) -> Result<RoundTrip> {
        let url = self.config.request_url(id)?;
        let started = Instant::now();

        let outcome = match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the echo so the timing covers the whole response
                match response.bytes().await {
                    Ok(_) => (Some(status), None),
                    Err(e) => (Some(status), Some(AppError::from(e).to_string())),
                }
            }
            Err(e) => (None, Some(AppError::from(e).to_string())),
        };

        Ok(RoundTrip {
            id,
            status: outcome.0,
            elapsed: started.elapsed(),
            error: outcome.1,
        })
    }

    /// Run the whole sequence, writing one progress pair per request to `out`
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<SpamReport> {
        let mut round_trips = Vec::with_capacity(self.config.count as usize);

        for id in 0..self.config.count {
            writeln!(out, "sending request {}", id)?;
            let round_trip = self.send(id).await?;

            let secs = round_trip.elapsed.as_secs_f64();
            if round_trip.is_success() {
                writeln!(out, "Delay for request {}: {}", id, secs)?;
            } else {
                let reason = match (&round_trip.error, round_trip.status) {
                    (Some(error), _) => error.clone(),
                    (None, Some(status)) => format!("HTTP status {}", status),
                    (None, None) => "no response".to_string(),
                };
                writeln!(out, "Request {} failed after {}: {}", id, secs, reason)?;
            }

            round_trips.push(round_trip);
        }

        Ok(SpamReport::from_round_trips(round_trips))
    }
}

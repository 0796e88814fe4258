// src/pacing.rs
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::errors::Result;

/// The cosmetic pauses that make one request look like a staged pipeline.
/// None of them affects what is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PacingSchedule {
    /// Between marking the input step and sending the request.
    pub before_request_ms: u64,
    /// Between receiving the response and showing the generator card.
    pub after_response_ms: u64,
    /// While the reviewer step is active.
    pub review_ms: u64,
    /// Before showing the refined card.
    pub refine_ms: u64,
}

impl Default for PacingSchedule {
    fn default() -> Self {
        Self {
            before_request_ms: 500,
            after_response_ms: 300,
            review_ms: 800,
            refine_ms: 500,
        }
    }
}

impl PacingSchedule {
    pub fn instant() -> Self {
        Self {
            before_request_ms: 0,
            after_response_ms: 0,
            review_ms: 0,
            refine_ms: 0,
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn before_request(&self) -> Duration {
        Duration::from_millis(self.before_request_ms)
    }

    pub fn after_response(&self) -> Duration {
        Duration::from_millis(self.after_response_ms)
    }

    pub fn review(&self) -> Duration {
        Duration::from_millis(self.review_ms)
    }

    pub fn refine(&self) -> Duration {
        Duration::from_millis(self.refine_ms)
    }
}

/// How a pause is carried out.
pub trait Pacer: Send + Sync {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    async fn pause(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = PacingSchedule::default();
        assert_eq!(schedule.before_request(), Duration::from_millis(500));
        assert_eq!(schedule.after_response(), Duration::from_millis(300));
        assert_eq!(schedule.review(), Duration::from_millis(800));
        assert_eq!(schedule.refine(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let schedule = PacingSchedule::from_toml("review_ms = 50\nrefine_ms = 0\n").unwrap();
        assert_eq!(schedule.review_ms, 50);
        assert_eq!(schedule.refine_ms, 0);
        assert_eq!(schedule.before_request_ms, 500);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(PacingSchedule::from_toml("review_ms = \"slow\"").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_pacer_waits() {
        let start = tokio::time::Instant::now();
        TokioPacer.pause(Duration::from_millis(800)).await;
        assert!(start.elapsed() >= Duration::from_millis(800));
    }
}

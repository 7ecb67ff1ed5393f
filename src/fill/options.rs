use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detect::discovery::DiscoveryOptions;

/// Options recognised by `attempt_fill_email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOptions {
    /// Rounds run before the final unconditional round.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between consecutive retry rounds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_true")]
    pub include_nested_frames: bool,

    /// Wait for a visible candidate before attempting.
    #[serde(default = "default_true")]
    pub wait_for_visible: bool,

    /// Candidate wait budget; defaults to 5000 ms when visibility is
    /// required, 1000 ms otherwise.
    #[serde(default)]
    pub wait_for_visible_ms: Option<u64>,

    /// Advisory ceiling for the whole invocation. Exceeding it is logged,
    /// never enforced.
    #[serde(default = "default_overall_timeout_ms")]
    pub overall_timeout_ms: u64,

    /// Additional regex discovery rules.
    #[serde(default)]
    pub extra_patterns: Vec<String>,

    #[serde(default)]
    pub timing: FillTiming,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            include_nested_frames: true,
            wait_for_visible: true,
            wait_for_visible_ms: None,
            overall_timeout_ms: default_overall_timeout_ms(),
            extra_patterns: Vec::new(),
            timing: FillTiming::default(),
        }
    }
}

impl FillOptions {
    pub fn wait_budget(&self) -> Duration {
        let ms = self
            .wait_for_visible_ms
            .unwrap_or(if self.wait_for_visible { 5000 } else { 1000 });
        Duration::from_millis(ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn overall_timeout(&self) -> Duration {
        Duration::from_millis(self.overall_timeout_ms)
    }

    pub fn discovery(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            include_nested_frames: self.include_nested_frames,
            extra_patterns: self.extra_patterns.clone(),
        }
    }
}

/// Short waits inside a single round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillTiming {
    /// Interval between discovery polls while waiting for candidates.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay before the second `input` event.
    #[serde(default = "default_resync_delay_ms")]
    pub resync_delay_ms: u64,

    /// Time given to the page to normalise the value, counted from the
    /// first event burst.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for FillTiming {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            resync_delay_ms: default_resync_delay_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl FillTiming {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn resync_delay(&self) -> Duration {
        Duration::from_millis(self.resync_delay_ms)
    }

    /// Remaining settle time once the resync event has fired.
    pub fn settle_after_resync(&self) -> Duration {
        Duration::from_millis(self.settle_ms.saturating_sub(self.resync_delay_ms))
    }
}

// Serde default helpers
fn default_max_retries() -> u32 { 10 }
fn default_retry_delay_ms() -> u64 { 500 }
fn default_overall_timeout_ms() -> u64 { 30_000 }
fn default_poll_interval_ms() -> u64 { 100 }
fn default_resync_delay_ms() -> u64 { 50 }
fn default_settle_ms() -> u64 { 150 }
fn default_true() -> bool { true }

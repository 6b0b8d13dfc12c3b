// Logging setup and render outcome reporting
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::render::Rendering;
use crate::{NlgError, Result};

/// Initialize the tracing subscriber (fmt output, filter from `RUST_LOG`).
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| NlgError::Telemetry(e.to_string()))?;

    info!(target: "telemetry", "Logging initialized");
    Ok(())
}

/// Side channel for generation outcomes.
///
/// Every method defaults to a no-op so observers only implement what they
/// care about. Called synchronously on the rendering thread.
pub trait RenderObserver: Send + Sync {
    /// The action has no templates at all
    fn unknown_action(&self, _action_id: &str) {}

    /// The action exists but nothing is eligible for `channel`
    fn no_eligible_variant(&self, _action_id: &str, _channel: &str) {}

    /// A variant was selected and rendered; check `rendering.fault()` for fallbacks
    fn rendered(&self, _action_id: &str, _rendering: &Rendering) {}
}

/// Point-in-time copy of [`RenderMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMetricsSnapshot {
    pub rendered: u64,
    pub filled: u64,
    pub fallbacks: u64,
    pub unknown_actions: u64,
    pub no_eligible_variant: u64,
}

impl RenderMetricsSnapshot {
    /// Share of rendered responses that fell back to unfilled text
    pub fn fallback_rate(&self) -> f64 {
        if self.rendered == 0 {
            0.0
        } else {
            self.fallbacks as f64 / self.rendered as f64
        }
    }
}

/// Lock-free outcome counters
#[derive(Debug, Default)]
pub struct RenderMetrics {
    rendered: AtomicU64,
    filled: AtomicU64,
    fallbacks: AtomicU64,
    unknown_actions: AtomicU64,
    no_eligible_variant: AtomicU64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RenderMetricsSnapshot {
        RenderMetricsSnapshot {
            rendered: self.rendered.load(Ordering::Relaxed),
            filled: self.filled.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            unknown_actions: self.unknown_actions.load(Ordering::Relaxed),
            no_eligible_variant: self.no_eligible_variant.load(Ordering::Relaxed),
        }
    }
}

impl RenderObserver for RenderMetrics {
    fn unknown_action(&self, _action_id: &str) {
        self.unknown_actions.fetch_add(1, Ordering::Relaxed);
    }

    fn no_eligible_variant(&self, _action_id: &str, _channel: &str) {
        self.no_eligible_variant.fetch_add(1, Ordering::Relaxed);
    }

    fn rendered(&self, _action_id: &str, rendering: &Rendering) {
        self.rendered.fetch_add(1, Ordering::Relaxed);
        if rendering.is_fallback() {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        } else {
            self.filled.fetch_add(1, Ordering::Relaxed);
        }
    }
}

//! Runs an observation source over a bounded sampling window.

use crate::observation::{Observation, ObservationError, ObservationSource};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const LOG_TARGET: &str = "sampling";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SamplingWindow {
    /// Tick, pause for `interval`, repeat until `duration` has elapsed.
    Timed { duration: Duration, interval: Duration },
    /// A fixed number of ticks, back to back.
    Counted { attempts: u32 },
}

impl SamplingWindow {
    pub const ENGAGEMENT: SamplingWindow = SamplingWindow::Timed {
        duration: Duration::from_secs(15),
        interval: Duration::from_secs(2),
    };
    pub const FACE_EMOTION: SamplingWindow = SamplingWindow::Counted { attempts: 10 };
    pub const SPEECH: SamplingWindow = SamplingWindow::Counted { attempts: 1 };
}

/// Cooperative cancellation for an in-progress window.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears a previous cancellation so the next window can run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

enum Tick {
    Continue,
    Stop,
}

async fn tick<S: ObservationSource + ?Sized>(source: &S, out: &mut Vec<Observation>) -> Tick {
    match source.observe().await {
        Ok(labels) => {
            if labels.is_empty() {
                tracing::debug!(target: LOG_TARGET, "tick produced no observations");
            }
            out.extend(labels);
            Tick::Continue
        }
        Err(ObservationError::Exhausted) => {
            tracing::debug!(target: LOG_TARGET, "source exhausted");
            Tick::Stop
        }
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, error = %e, "observation failed, skipping");
            Tick::Continue
        }
    }
}

/// Collects labels until the window's budget runs out, the source is
/// exhausted, or `cancel` is set. Source failures are skipped.
pub async fn collect<S: ObservationSource + ?Sized>(
    source: &S,
    window: SamplingWindow,
    cancel: &CancelFlag,
) -> Vec<Observation> {
    let mut out = Vec::new();
    let mut ticks = 0u32;

    match window {
        SamplingWindow::Timed { duration, interval } => {
            let started = Instant::now();
            while !cancel.is_cancelled() {
                ticks += 1;
                if let Tick::Stop = tick(source, &mut out).await {
                    break;
                }
                sleep(interval).await;
                if started.elapsed() >= duration {
                    break;
                }
            }
        }
        SamplingWindow::Counted { attempts } => {
            for _ in 0..attempts {
                if cancel.is_cancelled() {
                    break;
                }
                ticks += 1;
                if let Tick::Stop = tick(source, &mut out).await {
                    break;
                }
            }
        }
    }

    if cancel.is_cancelled() {
        tracing::info!(target: LOG_TARGET, ticks, collected = out.len(), "sampling cancelled");
    } else {
        tracing::info!(target: LOG_TARGET, ticks, collected = out.len(), "sampling window complete");
    }
    out
}

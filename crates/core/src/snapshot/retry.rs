//! Fixed-schedule retry around [`SnapshotAggregator::fetch_snapshot`].

use std::time::Duration;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use super::{Snapshot, SnapshotAggregator};

/// Delays slept before each attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delays: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    pub fn max_attempts(&self) -> usize {
        self.delays.len()
    }
}

impl Default for RetryPolicy {
    /// Three attempts: immediately, after 1 s, after another 3 s.
    fn default() -> Self {
        Self::new(vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(3),
        ])
    }
}

/// Fetches snapshots until one is usable or the schedule runs out.
///
/// Returns `None` when every attempt produced a snapshot without data, or
/// as soon as `cancel` fires (in a delay or mid-attempt).
pub async fn fetch_with_retry(
    aggregator: &SnapshotAggregator,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Option<Snapshot> {
    let attempts = policy.max_attempts();

    for (index, delay) in policy.delays.iter().enumerate() {
        let attempt = index + 1;

        if !delay.is_zero() {
            debug!("Retrying snapshot fetch in {:?}", delay);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Snapshot fetch cancelled before attempt {}", attempt);
                    return None;
                }
                _ = tokio::time::sleep(*delay) => {}
            }
        }

        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Snapshot fetch cancelled during attempt {}", attempt);
                return None;
            }
            snapshot = aggregator.fetch_snapshot() => snapshot,
        };

        if snapshot.has_data() {
            if attempt > 1 {
                info!("Snapshot fetch succeeded on attempt {}/{}", attempt, attempts);
            }
            return Some(snapshot);
        }
        warn!("Snapshot attempt {}/{} returned no data", attempt, attempts);
    }

    None
}

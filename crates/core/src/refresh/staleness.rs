//! Staleness of the displayed snapshot.
//!
//! A snapshot is stale when the last cycle failed, when no cycle ever
//! succeeded, or when the last success is older than the interval budget:
//! `max(interval * 1.5, 180 s)`.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::settings::RefreshInterval;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StalenessPolicy {
    /// Period of the re-evaluation ticker
    pub tick: Duration,
    pub interval_multiplier: f64,
    /// Lower bound of the age budget, also used for manual refresh
    pub minimum_budget: Duration,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(30),
            interval_multiplier: 1.5,
            minimum_budget: Duration::from_secs(180),
        }
    }
}

impl StalenessPolicy {
    /// Age a successful snapshot may reach before it counts as stale.
    pub fn budget(&self, interval: RefreshInterval) -> Duration {
        let scaled = Duration::from_secs_f64(interval.seconds() as f64 * self.interval_multiplier);
        scaled.max(self.minimum_budget)
    }

    /// `since_success` is `None` when no cycle has succeeded yet.
    pub fn is_stale(
        &self,
        since_success: Option<Duration>,
        has_error: bool,
        interval: RefreshInterval,
    ) -> bool {
        if has_error {
            return true;
        }
        match since_success {
            Some(elapsed) => elapsed > self.budget(interval),
            None => true,
        }
    }
}

/// Wall-clock staleness with the default policy.
///
/// A last success in the future (clock moved backwards) counts as zero age.
pub fn evaluate_staleness(
    now: DateTime<Utc>,
    last_success: Option<DateTime<Utc>>,
    has_error: bool,
    interval: RefreshInterval,
) -> bool {
    let since_success = last_success.map(|at| (now - at).to_std().unwrap_or(Duration::ZERO));
    StalenessPolicy::default().is_stale(since_success, has_error, interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_budget_scales_interval() {
        let policy = StalenessPolicy::default();
        assert_eq!(
            policy.budget(RefreshInterval::TenMinutes),
            Duration::from_secs(900)
        );
        assert_eq!(
            policy.budget(RefreshInterval::FifteenMinutes),
            Duration::from_secs(1350)
        );
    }

    #[test]
    fn test_budget_floor() {
        let policy = StalenessPolicy::default();
        assert_eq!(policy.budget(RefreshInterval::Manual), Duration::from_secs(180));
        // 5 min * 1.5 = 450 s, above the floor
        assert_eq!(
            policy.budget(RefreshInterval::FiveMinutes),
            Duration::from_secs(450)
        );
    }

    #[test]
    fn test_error_is_always_stale() {
        let now = Utc::now();
        assert!(evaluate_staleness(
            now,
            Some(now),
            true,
            RefreshInterval::TenMinutes
        ));
    }

    #[test]
    fn test_never_succeeded_is_stale() {
        assert!(evaluate_staleness(
            Utc::now(),
            None,
            false,
            RefreshInterval::FiveMinutes
        ));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let now = Utc::now();
        let at = |secs| Some(now - TimeDelta::seconds(secs));
        let interval = RefreshInterval::TenMinutes;

        assert!(!evaluate_staleness(now, at(899), false, interval));
        assert!(!evaluate_staleness(now, at(900), false, interval));
        assert!(evaluate_staleness(now, at(901), false, interval));
    }

    #[test]
    fn test_future_success_is_fresh() {
        let now = Utc::now();
        assert!(!evaluate_staleness(
            now,
            Some(now + TimeDelta::seconds(60)),
            false,
            RefreshInterval::Manual
        ));
    }
}

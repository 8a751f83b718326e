//! Periodic tasks feeding the coordinator.
//!
//! Both timers only post commands; the coordinator decides what to do with
//! them. The first tick fires one full period after the timer is armed.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::coordinator::{Command, RefreshTrigger};

pub(crate) fn spawn_refresh_timer(
    period: Duration,
    commands: UnboundedSender<Command>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    spawn_ticker("refresh timer", period, cancel, move || {
        commands.send(Command::Refresh(RefreshTrigger::Timer)).is_ok()
    })
}

pub(crate) fn spawn_staleness_ticker(
    tick: Duration,
    commands: UnboundedSender<Command>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    spawn_ticker("staleness ticker", tick, cancel, move || {
        commands.send(Command::EvaluateStaleness).is_ok()
    })
}

/// Calls `on_tick` every `period` until cancelled or `on_tick` returns false.
fn spawn_ticker<F>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut on_tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> bool + Send + 'static,
{
    tokio::spawn(async move {
        debug!("Starting {} ({:?})", name, period);
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticks.tick() => {
                    if !on_tick() {
                        break;
                    }
                }
            }
        }
        debug!("Stopped {}", name);
    })
}

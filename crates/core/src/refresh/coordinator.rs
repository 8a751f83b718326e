//! The actor that owns [`StoreState`].
//!
//! Every state change happens on this task, in command order. Fetches,
//! timers and the staleness ticker run as separate tasks that report back
//! through the same command channel.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::staleness::StalenessPolicy;
use super::state::{StoreState, FETCH_ERROR_MESSAGE};
use super::timers::{spawn_refresh_timer, spawn_staleness_ticker};
use crate::events::{EventBus, StoreEvent};
use crate::settings::RefreshInterval;
use crate::snapshot::{fetch_with_retry, RetryPolicy, Snapshot, SnapshotAggregator};

/// What asked for a refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RefreshTrigger {
    Startup,
    Manual,
    Timer,
}

#[derive(Debug)]
pub(crate) enum Command {
    Refresh(RefreshTrigger),
    SetInterval(RefreshInterval),
    EvaluateStaleness,
    FetchFinished(Option<Box<Snapshot>>),
}

pub(crate) struct Coordinator {
    aggregator: Arc<SnapshotAggregator>,
    retry: RetryPolicy,
    staleness: StalenessPolicy,
    state: StoreState,
    /// Monotonic time of the last success, for staleness
    last_success_at: Option<Instant>,
    state_tx: watch::Sender<StoreState>,
    events: EventBus,
    commands: mpsc::UnboundedSender<Command>,
    shutdown: CancellationToken,
    refresh_timer: Option<CancellationToken>,
    fetch_task: Option<JoinHandle<()>>,
}

impl Coordinator {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        aggregator: Arc<SnapshotAggregator>,
        retry: RetryPolicy,
        staleness: StalenessPolicy,
        state: StoreState,
        state_tx: watch::Sender<StoreState>,
        events: EventBus,
        commands: mpsc::UnboundedSender<Command>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            aggregator,
            retry,
            staleness,
            state,
            last_success_at: None,
            state_tx,
            events,
            commands,
            shutdown,
            refresh_timer: None,
            fetch_task: None,
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!(
            "Block store started ({})",
            self.state.refresh_interval.label()
        );
        self.start_refresh(RefreshTrigger::Startup);
        self.arm_refresh_timer();
        let ticker = spawn_staleness_ticker(
            self.staleness.tick,
            self.commands.clone(),
            self.shutdown.child_token(),
        );

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }

        // Stop every child task and wait for them to unwind.
        self.shutdown.cancel();
        let _ = ticker.await;
        if let Some(fetch) = self.fetch_task.take() {
            let _ = fetch.await;
        }
        info!("Block store stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Refresh(trigger) => self.start_refresh(trigger),
            Command::SetInterval(interval) => self.set_interval(interval),
            Command::EvaluateStaleness => {
                if self.update_staleness() {
                    self.publish_state();
                }
            }
            Command::FetchFinished(outcome) => self.finish_refresh(outcome),
        }
    }

    fn start_refresh(&mut self, trigger: RefreshTrigger) {
        if self.state.is_fetching {
            debug!("Refresh ({:?}) ignored: a fetch is already running", trigger);
            return;
        }
        debug!("Refresh started ({:?})", trigger);

        self.state.is_fetching = true;
        self.state.error_message = None;
        self.publish_state();
        self.events.publish(StoreEvent::RefreshStarted);

        let aggregator = Arc::clone(&self.aggregator);
        let retry = self.retry.clone();
        let cancel = self.shutdown.child_token();
        let commands = self.commands.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let outcome = fetch_with_retry(&aggregator, &retry, &cancel).await;
            // The coordinator is gone after shutdown; nothing left to report to.
            let _ = commands.send(Command::FetchFinished(outcome.map(Box::new)));
        }));
    }

    fn finish_refresh(&mut self, outcome: Option<Box<Snapshot>>) {
        self.fetch_task = None;
        self.state.is_fetching = false;

        match outcome {
            Some(snapshot) => {
                let snapshot = Arc::new(*snapshot);
                debug!("Publishing snapshot fetched at {}", snapshot.fetched_at);
                self.state.snapshot = Some(Arc::clone(&snapshot));
                self.state.last_successful_fetch = Some(Utc::now());
                self.state.error_message = None;
                self.last_success_at = Some(Instant::now());
                self.events.publish(StoreEvent::SnapshotPublished(snapshot));
            }
            None => {
                warn!("Refresh failed after all attempts; keeping previous snapshot");
                self.state.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
                self.events.publish(StoreEvent::RefreshFailed {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                });
            }
        }

        self.update_staleness();
        self.publish_state();
    }

    fn set_interval(&mut self, interval: RefreshInterval) {
        if interval == self.state.refresh_interval {
            debug!("Refresh interval unchanged ({})", interval.label());
            return;
        }
        info!("Refresh interval set to {}", interval.label());

        self.state.refresh_interval = interval;
        self.arm_refresh_timer();
        self.update_staleness();
        self.publish_state();
        self.events.publish(StoreEvent::IntervalChanged(interval));
    }

    /// Cancels the current refresh timer and starts one for the current
    /// interval. `Manual` leaves no timer running.
    fn arm_refresh_timer(&mut self) {
        if let Some(timer) = self.refresh_timer.take() {
            timer.cancel();
        }

        let Some(period) = self.state.refresh_interval.period() else {
            debug!("Manual refresh: no timer armed");
            return;
        };
        let cancel = self.shutdown.child_token();
        spawn_refresh_timer(period, self.commands.clone(), cancel.clone());
        self.refresh_timer = Some(cancel);
    }

    /// Recomputes the stale flag. Returns whether it changed.
    fn update_staleness(&mut self) -> bool {
        let since_success = self.last_success_at.map(|at| at.elapsed());
        let is_stale = self.staleness.is_stale(
            since_success,
            self.state.has_error(),
            self.state.refresh_interval,
        );
        if is_stale == self.state.is_stale {
            return false;
        }

        debug!("Snapshot is now {}", if is_stale { "stale" } else { "fresh" });
        self.state.is_stale = is_stale;
        self.events.publish(StoreEvent::StalenessChanged { is_stale });
        true
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

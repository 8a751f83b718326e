use std::sync::Arc;

use blockbar_chain_data::{ChainDataSource, UpstreamClient};
use blockbar_core::{BlockStore, StoreEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::report::summarize;

pub fn init_tracing() {
    let log_format = std::env::var("BLOCKBAR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_store(config: &Config) -> BlockStore {
    let upstream = config.upstream();
    tracing::info!(
        "Upstreams: {} and {}",
        upstream.mempool_base_url,
        upstream.coingecko_base_url
    );
    let source: Arc<dyn ChainDataSource> = Arc::new(UpstreamClient::new(upstream));
    BlockStore::attach(source, config.store())
}

/// Logs store events until the store shuts down.
pub fn spawn_event_logger(store: &BlockStore) -> JoinHandle<()> {
    let mut events = store.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Event logger skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &StoreEvent) {
    match event {
        StoreEvent::RefreshStarted => tracing::debug!("Refreshing"),
        StoreEvent::SnapshotPublished(snapshot) => tracing::info!("{}", summarize(snapshot)),
        StoreEvent::RefreshFailed { message } => tracing::warn!("{}", message),
        StoreEvent::StalenessChanged { is_stale: true } => {
            tracing::warn!("Displayed data is stale")
        }
        StoreEvent::StalenessChanged { is_stale: false } => tracing::info!("Data is fresh again"),
        StoreEvent::IntervalChanged(interval) => {
            tracing::info!("Refresh interval: {}", interval.label())
        }
    }
}

mod config;
mod console;
mod main_lib;
mod report;

use config::Config;
use main_lib::{build_store, init_tracing, spawn_event_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let store = build_store(&config);
    let logger = spawn_event_logger(&store);

    let outcome = console::run(&store).await;

    store.shutdown().await;
    drop(store);
    let _ = logger.await;
    outcome
}

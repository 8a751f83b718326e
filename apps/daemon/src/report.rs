//! One-line snapshot summaries for the log.

use blockbar_chain_data::{Block, Difficulty, Fees, MempoolStats};
use blockbar_core::{Snapshot, StoreState};
use rust_decimal::Decimal;

pub fn summarize(snapshot: &Snapshot) -> String {
    let mut parts = Vec::new();

    if let Some(block) = &snapshot.block {
        parts.push(block_line(block));
    }
    if let Some(price) = snapshot.price_usd {
        parts.push(price_line(snapshot, price));
    }
    if let Some(fees) = &snapshot.fees {
        parts.push(fees_line(fees));
    }
    if let Some(mempool) = &snapshot.mempool {
        parts.push(mempool_line(mempool));
    }
    if let Some(difficulty) = &snapshot.difficulty {
        parts.push(difficulty_line(difficulty));
    }

    if parts.is_empty() {
        return "No data".to_string();
    }
    parts.join(" | ")
}

/// Multi-line status for the `status` console command.
pub fn status(state: &StoreState) -> String {
    let mut lines = vec![format!("Interval: {}", state.refresh_interval.label())];
    match state.last_successful_fetch {
        Some(at) => lines.push(format!("Last update: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))),
        None => lines.push("Last update: never".to_string()),
    }
    if state.is_fetching {
        lines.push("Refreshing...".to_string());
    }
    if state.is_stale {
        lines.push("Data is stale".to_string());
    }
    if let Some(error) = &state.error_message {
        lines.push(error.clone());
    }
    if let Some(snapshot) = &state.snapshot {
        lines.push(summarize(snapshot));
    }
    lines.join("\n")
}

fn block_line(block: &Block) -> String {
    let mut line = format!("Block {} ({} tx", block.height, block.tx_count);
    if let Some(pool) = block.extras.as_ref().and_then(|e| e.pool_name.as_deref()) {
        line.push_str(&format!(", {}", pool));
    }
    if let Some(span) = block.extras.as_ref().and_then(|e| e.fee_span()) {
        line.push_str(&format!(", {} sat/vB", span));
    }
    let subsidy = blockbar_chain_data::block_subsidy_btc(block.height);
    line.push_str(&format!(", subsidy {} BTC)", subsidy.normalize()));
    line
}

fn price_line(snapshot: &Snapshot, price: Decimal) -> String {
    let mut line = format!("${}", price.round_dp(0));
    if let Some(change) = snapshot.price_change_24h {
        line.push_str(&format!(" ({:+.2}% 24h)", change));
    }
    if let Some(sats) = snapshot.sats_per_dollar() {
        line.push_str(&format!(", {} sats/$", sats));
    }
    if let Some(source) = snapshot.price_source {
        line.push_str(&format!(" via {}", source));
    }
    line
}

fn fees_line(fees: &Fees) -> String {
    format!(
        "Fees {}/{}/{} sat/vB",
        fees.fastest_fee.normalize(),
        fees.half_hour_fee.normalize(),
        fees.hour_fee.normalize()
    )
}

fn mempool_line(mempool: &MempoolStats) -> String {
    format!(
        "Mempool {} tx, {:.1} MvB",
        mempool.count,
        mempool.vsize as f64 / 1_000_000.0
    )
}

fn difficulty_line(difficulty: &Difficulty) -> String {
    let mut line = "Retarget".to_string();
    if let Some(progress) = difficulty.progress_percent {
        line.push_str(&format!(" {:.1}%", progress));
    }
    if let Some(days) = difficulty.days_until_retarget() {
        line.push_str(&format!(", ~{:.1} days", days));
    }
    if let Some(delta) = difficulty.estimated_difficulty_delta {
        line.push_str(&format!(", {:+.2}%", delta));
    }
    if let Some(avg) = difficulty.average_block_time() {
        let secs = avg.as_secs();
        line.push_str(&format!(", avg block {}m {}s", secs / 60, secs % 60));
    }
    line
}

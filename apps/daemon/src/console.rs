//! Line commands read from stdin.

use anyhow::anyhow;
use blockbar_core::{BlockStore, RefreshInterval};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::report;

const HELP: &str = "Commands: r|refresh, i|interval <manual|5|10|15>, s|status, q|quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Refresh,
    SetInterval(RefreshInterval),
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "r" | "refresh" => Command::Refresh,
        "i" | "interval" => {
            let value = words
                .next()
                .ok_or_else(|| anyhow!("Missing interval (manual, 5, 10 or 15)"))?;
            let interval = value
                .parse::<RefreshInterval>()
                .map_err(|e| anyhow!("{e}"))?;
            Command::SetInterval(interval)
        }
        "s" | "status" => Command::Status,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(anyhow!("Unknown command: {other}")),
    };
    Ok(Some(command))
}

/// Serves console commands until `quit` or Ctrl-C.
///
/// When stdin closes (e.g. running under a supervisor) only Ctrl-C ends the
/// loop.
pub async fn run(store: &BlockStore) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("{}", HELP);

    loop {
        let line = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Interrupted");
                return Ok(());
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::debug!("stdin closed; waiting for Ctrl-C");
            tokio::signal::ctrl_c().await?;
            tracing::info!("Interrupted");
            return Ok(());
        };

        match parse(&line) {
            Ok(Some(Command::Quit)) => return Ok(()),
            Ok(Some(command)) => execute(store, command)?,
            Ok(None) => {}
            Err(e) => tracing::warn!("{}. {}", e, HELP),
        }
    }
}

fn execute(store: &BlockStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Refresh => store.refresh_now()?,
        Command::SetInterval(interval) => store.set_refresh_interval(interval)?,
        Command::Status => println!("{}", report::status(&store.state())),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

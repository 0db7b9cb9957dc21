// src/host.rs
// Line-delimited JSON control surface over stdin/stdout

use crate::clip::ClipRequest;
use crate::events::{BroadcastEvents, ClipEvent};
use crate::orchestrator::ClipOrchestrator;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

pub const EVENT_CAPACITY: usize = 64;
const DEFAULT_LOG_FILTER: &str = "clipnote=info";

/// One request line from the UI
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostCommand {
    SaveClip { data: ClipRequest },
    GenerateInsights,
    CheckRecentClip,
}

pub fn parse_command(line: &str) -> Result<HostCommand, serde_json::Error> {
    serde_json::from_str(line.trim())
}

/// Logs go to stderr so stdout carries only protocol lines
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Serve until stdin closes, then let in-flight work and pending events drain
pub async fn serve(orchestrator: Arc<ClipOrchestrator>, events: Arc<BroadcastEvents>) -> std::io::Result<()> {
    let printer = tokio::spawn(print_events(events.subscribe()));
    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Skipping malformed command ({}): {}", e, line);
                continue;
            }
        };

        match command {
            HostCommand::SaveClip { data } => {
                let orchestrator = orchestrator.clone();
                tasks.spawn(async move {
                    let _ = orchestrator.submit_clip(data).await;
                });
            }
            HostCommand::GenerateInsights => {
                let orchestrator = orchestrator.clone();
                tasks.spawn(async move {
                    let _ = orchestrator.generate_insights_for_latest_clip().await;
                });
            }
            HostCommand::CheckRecentClip => {
                let recent = orchestrator.check_recent_clip();
                match serde_json::to_string(&recent) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::error!("Failed to encode recent clip: {}", e),
                }
            }
        }
    }

    tracing::info!("stdin closed, waiting for {} task(s)", tasks.len());
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Task panicked: {}", e);
        }
    }

    // Last senders go away here, which ends the printer once it has drained.
    drop(orchestrator);
    drop(events);
    let _ = printer.await;
    Ok(())
}

async fn print_events(mut rx: tokio::sync::broadcast::Receiver<ClipEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Failed to encode event: {}", e),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Event printer lagged, {} event(s) dropped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

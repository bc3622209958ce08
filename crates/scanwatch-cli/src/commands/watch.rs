use std::io::{self, Write};
use std::time::Duration;

use scanwatch_core::api::{HttpScanApi, ScanApi};
use scanwatch_core::config::ClientConfig;
use scanwatch_core::sync::{IngestOutcome, ScanEvent, ScanEventKind, SyncEngine, TickOutcome};
use scanwatch_core::view::stats_now;
use scanwatch_core::ScanRecord;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::commands::common::{format_scan_line, open_engine};
use crate::error::CliError;

const BELL: char = '\u{7}';

/// What a line typed at the confirmation prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Accept(String),
    Ignore,
}

/// Blank input keeps the prefilled label; `-` or `/ignore` discards the scan.
pub fn prompt_action(line: &str, pending_label: &str) -> PromptAction {
    let trimmed = line.trim();
    match trimmed {
        "-" | "/ignore" => PromptAction::Ignore,
        "" => PromptAction::Accept(pending_label.to_string()),
        label => PromptAction::Accept(label.to_string()),
    }
}

pub fn format_event(event: &ScanEvent) -> String {
    match event.kind {
        ScanEventKind::Recognized => match event.scan_count {
            Some(count) => format!("{BELL}RECOGNIZED ({count}x)  {}", event.data),
            None => format!("{BELL}RECOGNIZED  {}", event.data),
        },
        ScanEventKind::New => format!("{BELL}NEW CODE  {}", event.data),
    }
}

pub async fn run_watch(config: &ClientConfig, interval_ms: Option<u64>) -> Result<(), CliError> {
    let period = interval_ms.map_or_else(|| config.poll_interval(), Duration::from_millis);
    if period.is_zero() {
        return Err(CliError::Config(
            "Polling interval must be greater than zero".to_string(),
        ));
    }

    let mut engine = open_engine(config)?;
    let mut events = engine.subscribe();

    match engine.load().await {
        Ok(count) => println!("Loaded {count} scans from {}", engine.api().base_url()),
        Err(error) if error.is_transport() => {
            tracing::warn!("Initial load failed, retrying while polling: {error}");
        }
        Err(error) => return Err(error.into()),
    }
    println!("Watching for scans. Type /refresh or /stats, Ctrl-C to stop.");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                println!();
                break;
            }
            _ = ticker.tick() => {
                let outcome = engine.tick().await;
                drain_events(&mut events);
                match outcome {
                    Ok(TickOutcome::Ingested(outcome)) => report_ingest(&engine, &outcome)?,
                    Ok(TickOutcome::Skipped | TickOutcome::NoCandidate) => {}
                    Err(error) => tracing::warn!("Polling failed: {error}"),
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => handle_input(&mut engine, &line).await?,
                    None => stdin_open = false,
                }
            }
        }
    }

    Ok(())
}

fn drain_events(events: &mut mpsc::UnboundedReceiver<ScanEvent>) {
    while let Ok(event) = events.try_recv() {
        println!("{}", format_event(&event));
    }
}

fn report_ingest<A: ScanApi>(
    engine: &SyncEngine<A>,
    outcome: &IngestOutcome,
) -> Result<(), CliError> {
    match outcome {
        IngestOutcome::Persisted(record) => print_saved(engine, record),
        IngestOutcome::Escalated => print_prompt(engine)?,
        IngestOutcome::Ignored | IngestOutcome::Suppressed => {}
    }
    Ok(())
}

fn print_saved<A: ScanApi>(engine: &SyncEngine<A>, record: &ScanRecord) {
    let occurrences = engine.cache().occurrence_count(&record.data);
    println!("Saved {}", format_scan_line(record, occurrences));
}

fn print_prompt<A: ScanApi>(engine: &SyncEngine<A>) -> Result<(), CliError> {
    let Some(pending) = engine.session().gate().pending() else {
        return Ok(());
    };

    let candidate = pending.candidate();
    println!(
        "Unknown code {} ({}). Product name, Enter to accept, '-' to ignore:",
        candidate.data, candidate.code_type
    );
    let mut stdout = io::stdout();
    if pending.label().is_empty() {
        write!(stdout, "> ")?;
    } else {
        write!(stdout, "[{}] > ", pending.label())?;
    }
    stdout.flush()?;
    Ok(())
}

async fn handle_input(engine: &mut SyncEngine<HttpScanApi>, line: &str) -> Result<(), CliError> {
    let pending_label = engine
        .session()
        .gate()
        .pending()
        .map(|pending| pending.label().to_string());

    let Some(pending_label) = pending_label else {
        return handle_command(engine, line.trim()).await;
    };

    match prompt_action(line, &pending_label) {
        PromptAction::Ignore => {
            let candidate = engine.resolve_ignore()?;
            println!("Ignored {}", candidate.data);
        }
        PromptAction::Accept(label) => {
            engine.set_label(label.clone())?;
            match engine.resolve_accept(&label).await {
                Ok(record) => print_saved(engine, &record),
                Err(error) => {
                    eprintln!("Save failed: {error}");
                    print_prompt(engine)?;
                }
            }
        }
    }

    Ok(())
}

async fn handle_command(
    engine: &mut SyncEngine<HttpScanApi>,
    command: &str,
) -> Result<(), CliError> {
    match command {
        "" => {}
        "/refresh" => match engine.refresh().await {
            Ok(count) => println!("Reloaded {count} scans"),
            Err(error) => eprintln!("Refresh failed: {error}"),
        },
        "/stats" => {
            let stats = stats_now(engine.cache());
            println!("Total: {}  Today: {}", stats.total, stats.today);
        }
        other => println!("No scan is waiting for confirmation; unknown command '{other}'"),
    }
    Ok(())
}

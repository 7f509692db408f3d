//! Sync command handlers

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use quoth_core::sync::{
    spawn_sync_task, sync_once, HttpRemote, PeriodicSyncConfig, SyncTaskEvent,
};
use quoth_core::{Config, MergeReport, QuoteBook};

use crate::output::{Output, OutputFormat};

/// How long a watch notice stays on screen
const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Fetch server quotes once and merge them
pub async fn sync(book: QuoteBook, config: &Config, output: &Output) -> Result<()> {
    let remote = HttpRemote::new(config.sync_url.as_str())?;
    output.message(&format!("Fetching quotes from {}...", remote.url()));

    let book = Mutex::new(book);
    let saved = sync_once(&book, &remote).await;
    let report = saved.value;

    if let Some(ref e) = saved.save_error {
        output.warn_not_saved(e);
    }

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "added": report.added,
                    "updated": report.updated,
                    "total": book.lock().await.len(),
                })
            );
        }
        OutputFormat::Quiet => println!("{}", report.changed()),
        OutputFormat::Human => {
            if report.changed() > 0 {
                output.success(&format!(
                    "Sync complete - {} added, {} updated",
                    report.added, report.updated
                ));
            } else {
                output.success("Sync complete - already up to date");
            }
        }
    }

    Ok(())
}

/// Sync on the configured interval until Ctrl-C
pub async fn watch(book: QuoteBook, config: &Config, output: &Output) -> Result<()> {
    let remote = Arc::new(HttpRemote::new(config.sync_url.as_str())?);
    let book = Arc::new(Mutex::new(book));
    let sync_config = PeriodicSyncConfig::from(config);

    output.message(&format!(
        "Syncing with {} every {}s. Press Ctrl-C to stop.",
        remote.url(),
        sync_config.interval.as_secs()
    ));

    let mut handle = spawn_sync_task(sync_config, book, remote);
    let mut notice = Notice::new(output.format, atty::is(atty::Stream::Stdout));

    loop {
        let expires_at = notice.expires_at;

        tokio::select! {
            event = handle.event_rx.recv() => {
                let Some(SyncTaskEvent::CycleCompleted { cycle, report, save_error }) = event else {
                    break;
                };
                debug!("Sync cycle {} finished: {:?}", cycle, report);
                if let Some(e) = save_error {
                    output.warning(&format!("Could not save synced quotes: {}", e));
                }
                notice.cycle_completed(cycle, &report);
            }
            _ = wait_until(expires_at) => notice.clear(),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    notice.clear();
    handle.shutdown().await;
    output.message("Stopped syncing.");

    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Per-cycle report line for `watch`
///
/// On a terminal the line is rewritten in place and erased after
/// `NOTICE_DURATION`; otherwise each report is a plain line.
struct Notice {
    format: OutputFormat,
    interactive: bool,
    expires_at: Option<Instant>,
}

impl Notice {
    fn new(format: OutputFormat, is_tty: bool) -> Self {
        Self {
            format,
            interactive: is_tty && format == OutputFormat::Human,
            expires_at: None,
        }
    }

    fn cycle_completed(&mut self, cycle: u64, report: &MergeReport) {
        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "cycle": cycle,
                        "added": report.added,
                        "updated": report.updated,
                    })
                );
            }
            OutputFormat::Quiet => {}
            OutputFormat::Human => {
                if report.changed() == 0 {
                    return;
                }
                let text = notice_text(report);
                if self.interactive {
                    print!("\r\x1b[2K{}", text);
                    let _ = io::stdout().flush();
                    self.expires_at = Some(Instant::now() + NOTICE_DURATION);
                } else {
                    println!("{}", text);
                }
            }
        }
    }

    fn clear(&mut self) {
        if self.expires_at.take().is_some() {
            print!("\r\x1b[2K");
            let _ = io::stdout().flush();
        }
    }
}

fn notice_text(report: &MergeReport) -> String {
    format!("{} quote(s) updated from server", report.changed())
}

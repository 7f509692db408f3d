//! Periodic remote sync
//!
//! A spawned task that fetches the remote list and merges it into the
//! shared `QuoteBook`: once at start, then on every interval tick, until
//! told to stop. A cycle runs to completion before the next one starts;
//! ticks missed during a slow fetch are delayed, not replayed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::remote::RemoteSource;
use crate::book::{QuoteBook, Saved};
use crate::config::{Config, DEFAULT_SYNC_INTERVAL_SECS};
use crate::store::MergeReport;

/// Commands sent to the sync task
#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// Run a cycle now and restart the interval
    SyncNow,
    /// Stop the task
    Shutdown,
}

/// Events emitted by the sync task
#[derive(Debug, Clone)]
pub enum SyncTaskEvent {
    /// A fetch+merge cycle finished
    CycleCompleted {
        /// 1-based cycle counter
        cycle: u64,
        report: MergeReport,
        /// Set when the merged list could not be saved
        save_error: Option<String>,
    },
}

/// Sync task status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Waiting for the next tick
    Idle,
    /// Fetch+merge in flight
    Syncing,
    /// Task has exited
    Stopped,
}

/// Configuration for periodic sync
#[derive(Debug, Clone)]
pub struct PeriodicSyncConfig {
    /// Time between cycle starts
    pub interval: Duration,
}

impl Default for PeriodicSyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
        }
    }
}

impl From<&Config> for PeriodicSyncConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.sync_interval(),
        }
    }
}

/// Handle to control the periodic sync task
///
/// Dropping the handle also stops the task.
pub struct PeriodicSyncHandle {
    /// Send commands to the sync task
    pub command_tx: mpsc::Sender<SyncCommand>,
    /// Receive events from the sync task
    pub event_rx: mpsc::UnboundedReceiver<SyncTaskEvent>,
    /// Watch task status
    pub status_rx: watch::Receiver<SyncStatus>,
    task: JoinHandle<()>,
}

impl PeriodicSyncHandle {
    /// Request an immediate cycle
    pub async fn sync_now(&self) {
        let _ = self.command_tx.send(SyncCommand::SyncNow).await;
    }

    /// Stop the task and wait for it to exit
    ///
    /// A cycle already in flight is finished first.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Run one fetch+merge cycle against the shared book
///
/// The fetch happens without holding the lock; merge and save happen
/// under it.
pub async fn sync_once<R>(book: &Mutex<QuoteBook>, remote: &R) -> Saved<MergeReport>
where
    R: RemoteSource + ?Sized,
{
    let remote_quotes = remote.fetch_quotes().await;
    debug!("Merging {} remote quotes", remote_quotes.len());

    let mut book = book.lock().await;
    book.merge_remote(remote_quotes)
}

/// Spawn the periodic sync task
///
/// The first cycle starts immediately.
pub fn spawn_sync_task<R>(
    config: PeriodicSyncConfig,
    book: Arc<Mutex<QuoteBook>>,
    remote: Arc<R>,
) -> PeriodicSyncHandle
where
    R: RemoteSource + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);

    let task = tokio::spawn(sync_task_loop(
        config, book, remote, command_rx, event_tx, status_tx,
    ));

    PeriodicSyncHandle {
        command_tx,
        event_rx,
        status_rx,
        task,
    }
}

async fn sync_task_loop<R>(
    config: PeriodicSyncConfig,
    book: Arc<Mutex<QuoteBook>>,
    remote: Arc<R>,
    mut command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::UnboundedSender<SyncTaskEvent>,
    status_tx: watch::Sender<SyncStatus>,
) where
    R: RemoteSource + 'static,
{
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycle: u64 = 0;

    info!("Periodic sync started (every {:?})", config.interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => ticker.reset(),
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }

        cycle += 1;
        let _ = status_tx.send(SyncStatus::Syncing);
        let saved = sync_once(&book, remote.as_ref()).await;
        let _ = status_tx.send(SyncStatus::Idle);

        debug!(
            "Sync cycle {} done: {} change(s)",
            cycle,
            saved.value.changed()
        );
        let _ = event_tx.send(SyncTaskEvent::CycleCompleted {
            cycle,
            report: saved.value,
            save_error: saved.save_error.map(|e| e.to_string()),
        });
    }

    let _ = status_tx.send(SyncStatus::Stopped);
    info!("Periodic sync stopped after {} cycle(s)", cycle);
}

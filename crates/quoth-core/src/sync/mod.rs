//! Remote sync
//!
//! Pulls quotes from a remote endpoint and merges them into the local
//! book by exact text match. The remote category always wins; there is
//! no version or timestamp comparison.
//!
//! ## Usage
//!
//! ```ignore
//! let remote = Arc::new(HttpRemote::new(&config.sync_url)?);
//! let book = Arc::new(Mutex::new(QuoteBook::open()?));
//!
//! let mut handle = spawn_sync_task(PeriodicSyncConfig::from(&config), book, remote);
//! while let Some(event) = handle.event_rx.recv().await {
//!     // report changes
//! }
//! ```

mod periodic;
mod remote;

pub use periodic::{
    spawn_sync_task, sync_once, PeriodicSyncConfig, PeriodicSyncHandle, SyncCommand, SyncStatus,
    SyncTaskEvent,
};
pub use remote::{parse_remote_quotes, HttpRemote, RemoteSource, UNCATEGORIZED};

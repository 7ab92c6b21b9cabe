//! POS Sync Core
//!
//! Platform-neutral synchronization layer shared by the POS support screens:
//! - state: observable `ViewState` and status lifecycle
//! - records: wire rows and view-model records per screen
//! - resource: per-screen endpoints and field mapping
//! - controller: `SyncController` (refresh / mutate / clear)
//! - debounce: `ScanDebouncer` with transient flash feedback
//! - feed: push-based camera detection feed
//! - transport: network and timer seams

mod config;
mod controller;
mod debounce;
mod error;
mod feed;
mod records;
mod resource;
mod state;
mod transport;

#[cfg(test)]
mod tests;

pub use config::{ClientConfig, FailurePolicy, ReceiptsApi};
pub use controller::SyncController;
pub use debounce::{Flash, ScanDebouncer, ScanView, FLASH_DURATION};
pub use error::{SyncError, SyncResult};
pub use feed::{listen, CodeFeed};
pub use records::{CategoryRecord, Fixed, ReceiptKey, ReceiptRecord, ReceiptRow, ScanReply};
pub use resource::{Categories, Clearable, Mutable, ReceiptsV1, ReceiptsV2, Resource};
pub use state::{Observable, Status, Subscription, ViewState};
pub use transport::{endpoints, Timer, Transport};

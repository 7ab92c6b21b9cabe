//! Transport Seams
//!
//! The network and timer capabilities the controllers are built on. The
//! browser build provides fetch- and setTimeout-backed implementations; tests
//! provide scripted ones.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SyncResult;

/// Remote JSON API paths
pub mod endpoints {
    pub const CATEGORIES_LIST: &str = "/api/categories/list";
    pub const CATEGORIES_UPDATE: &str = "/api/categories/update";
    pub const TICKETS_V1: &str = "/api/tickets";
    pub const TICKETS_LIST: &str = "/api/tickets/list";
    pub const TICKETS_CLEAR: &str = "/api/tickets/clear";
    pub const QRCODE: &str = "/api/qrcode";
}

/// Issues one POST against the remote API.
///
/// `body` is an already encoded JSON document; when present the request is
/// sent as `application/json`. The response body is returned as text whatever
/// the HTTP status; only a rejected request is an error.
#[async_trait(?Send)]
pub trait Transport {
    async fn post(&self, path: &str, body: Option<String>) -> SyncResult<String>;
}

/// One-shot delay used for transient visual feedback
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

//! Browser Transport
//!
//! Fetch-backed `Transport` and setTimeout-backed `Timer` for the sync core.

use std::time::Duration;

use async_trait::async_trait;
use gloo_net::http::Request;
use log::{debug, warn};
use pos_sync::{ClientConfig, SyncError, SyncResult, Timer, Transport};

/// POSTs to the API through `fetch`
pub struct FetchTransport {
    config: ClientConfig,
}

impl FetchTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn post(&self, path: &str, body: Option<String>) -> SyncResult<String> {
        let url = self.config.url(path);
        debug!("POST {}", url);

        let builder = Request::post(&url);
        let request = match body {
            Some(body) => builder.header("Content-Type", "application/json").body(body),
            None => builder.build(),
        }
        .map_err(|e| SyncError::Transport(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        // Status is not part of the contract; the body decides
        if !response.ok() {
            warn!("POST {} returned HTTP {}", url, response.status());
        }

        response
            .text()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))
    }
}

/// `setTimeout` based sleep
pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

//! Client Configuration
//!
//! Deserialized from an optional page-provided object; every field has a
//! default so an empty or partial object is valid.

use serde::{Deserialize, Serialize};

/// What a failed call does to the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Failure sets `Status::Error`
    #[default]
    SetError,
    /// Failure leaves `Status::Success`; only the message reports it
    KeepSuccess,
}

impl FailurePolicy {
    pub fn sets_error_flag(&self) -> bool {
        matches!(self, FailurePolicy::SetError)
    }
}

/// Which receipts endpoint the receipts screen reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptsApi {
    /// `/api/tickets`, rows keyed by ticket
    V1,
    /// `/api/tickets/list`, rows keyed by date
    #[default]
    V2,
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every API path; empty means same origin
    pub base_url: String,
    pub receipts_api: ReceiptsApi,
    pub categories_failure: FailurePolicy,
    pub receipts_v1_failure: FailurePolicy,
    pub receipts_v2_failure: FailurePolicy,
    /// Forget the last scanned code when the camera is started again
    pub rescan_on_restart: bool,
    /// `log` level filter name
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            receipts_api: ReceiptsApi::default(),
            categories_failure: FailurePolicy::SetError,
            // The ticket-keyed screen never raised its error flag
            receipts_v1_failure: FailurePolicy::KeepSuccess,
            receipts_v2_failure: FailurePolicy::SetError,
            rescan_on_restart: false,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Failure policy of the configured receipts screen
    pub fn receipts_failure(&self) -> FailurePolicy {
        match self.receipts_api {
            ReceiptsApi::V1 => self.receipts_v1_failure,
            ReceiptsApi::V2 => self.receipts_v2_failure,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

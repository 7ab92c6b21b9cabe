//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;
use pos_sync::ClientConfig;

use crate::transport::FetchTransport;

/// App-wide handles every screen builds its controller from
#[derive(Clone, Copy)]
pub struct AppContext {
    /// One transport shared by all screens
    transport: StoredValue<Rc<FetchTransport>, LocalStorage>,
    config: StoredValue<ClientConfig>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: StoredValue::new_local(Rc::new(FetchTransport::new(config.clone()))),
            config: StoredValue::new(config),
        }
    }

    pub fn transport(&self) -> Rc<FetchTransport> {
        self.transport.get_value()
    }

    pub fn config(&self) -> ClientConfig {
        self.config.get_value()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

//! POS Support Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod logging;
mod scanner;
mod store;
mod transport;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let loaded = config::load_config();
    let level = loaded
        .as_ref()
        .map(|config| config.log_level())
        .unwrap_or(log::LevelFilter::Info);
    if let Err(e) = logging::init(level) {
        web_sys::console::error_1(&e.into());
    }

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Ignoring POS_CONFIG: {}", e);
        pos_sync::ClientConfig::default()
    });
    log::info!("Starting with receipts api {:?}", config.receipts_api);

    mount_to_body(move || view! { <App config=config /> });
}

//! Page Configuration
//!
//! Reads the optional `window.POS_CONFIG` object into a `ClientConfig`.

use pos_sync::ClientConfig;
use wasm_bindgen::JsValue;

/// Global the hosting page may define before the bundle loads
const CONFIG_GLOBAL: &str = "POS_CONFIG";

/// Load the page-provided config; absent means defaults
pub fn load_config() -> Result<ClientConfig, String> {
    let window = web_sys::window().ok_or("No window available")?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|e| format!("Failed to read {}: {:?}", CONFIG_GLOBAL, e))?;

    if value.is_undefined() || value.is_null() {
        return Ok(ClientConfig::default());
    }

    serde_wasm_bindgen::from_value(value)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_GLOBAL, e))
}

//! Camera Scanner Binding
//!
//! Wraps the page's `QrScanner` JS class. Every decoded string is pushed into
//! a `CodeFeed`; `start` hands out the detection stream for one camera
//! session and `stop` closes it.

use std::rc::Rc;

use futures::channel::mpsc::UnboundedReceiver;
use leptos::task::spawn_local;
use log::error;
use pos_sync::CodeFeed;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    type QrScanner;

    #[wasm_bindgen(constructor)]
    fn new(video: &web_sys::HtmlVideoElement, on_decode: &Closure<dyn FnMut(JsValue)>) -> QrScanner;

    #[wasm_bindgen(method, catch)]
    fn start(this: &QrScanner) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method)]
    fn stop(this: &QrScanner);
}

/// Decoded text from either callback shape (`"text"` or `{data: "text"}`)
fn decoded_text(value: &JsValue) -> Option<String> {
    value.as_string().or_else(|| {
        js_sys::Reflect::get(value, &JsValue::from_str("data"))
            .ok()
            .and_then(|data| data.as_string())
    })
}

/// Live camera attached to a video element
pub struct Camera {
    scanner: QrScanner,
    feed: Rc<CodeFeed>,
    // Kept alive for as long as the scanner may call it
    _on_decode: Closure<dyn FnMut(JsValue)>,
}

impl Camera {
    pub fn new(video: &web_sys::HtmlVideoElement) -> Self {
        let feed = Rc::new(CodeFeed::new());
        let sink = feed.clone();
        let on_decode = Closure::new(move |value: JsValue| {
            if let Some(code) = decoded_text(&value) {
                sink.push(code);
            }
        });
        let scanner = QrScanner::new(video, &on_decode);

        Self {
            scanner,
            feed,
            _on_decode: on_decode,
        }
    }

    /// Start capturing; detections of this session arrive on the returned stream
    pub fn start(&self) -> UnboundedReceiver<String> {
        let codes = self.feed.subscribe();
        match self.scanner.start() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    error!("Camera failed to start: {:?}", e);
                }
            }),
            Err(e) => error!("Camera failed to start: {:?}", e),
        }
        codes
    }

    /// Stop capturing and end the current detection stream
    pub fn stop(&self) {
        self.scanner.stop();
        self.feed.unsubscribe();
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.stop();
    }
}

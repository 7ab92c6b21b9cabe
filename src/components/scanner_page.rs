//! Scanner Page
//!
//! Live camera view. Each newly decoded receipt QR code is sent to the server
//! once; the frame flashes green or red with the outcome.

use std::rc::Rc;

use leptos::html::Video;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pos_sync::{listen, ScanDebouncer};

use super::StatusBanner;
use crate::context::use_app_context;
use crate::scanner::Camera;
use crate::store::watch_scanner;
use crate::transport::BrowserTimer;

#[component]
pub fn ScannerPage() -> impl IntoView {
    let ctx = use_app_context();
    let debouncer = ScanDebouncer::new(ctx.transport(), Rc::new(BrowserTimer));
    let scan = watch_scanner(&debouncer);
    let debouncer = StoredValue::new_local(debouncer);
    let rescan_on_restart = ctx.config().rescan_on_restart;

    let video_ref = NodeRef::<Video>::new();
    // Created on first start, dropped (and stopped) with the page
    let camera = StoredValue::new_local(None::<Camera>);
    let (running, set_running) = signal(false);

    let start = move |_| {
        let Some(video) = video_ref.get() else {
            return;
        };
        camera.update_value(|slot| {
            if slot.is_none() {
                *slot = Some(Camera::new(&video));
            }
        });
        let codes = camera.with_value(|slot| slot.as_ref().map(Camera::start));
        if let Some(codes) = codes {
            debouncer.with_value(|d| {
                // The last code survives a restart unless configured otherwise
                if rescan_on_restart {
                    d.reset();
                }
                spawn_local(listen(d.clone(), codes));
            });
            set_running.set(true);
        }
    };

    let stop = move |_| {
        camera.with_value(|slot| {
            if let Some(camera) = slot {
                camera.stop();
            }
        });
        set_running.set(false);
    };

    view! {
        <section class="scanner-page">
            <header class="page-header">
                <h1>"Scanner"</h1>
                <button disabled=move || running.get() on:click=start>"Start camera"</button>
                <button disabled=move || !running.get() on:click=stop>"Stop camera"</button>
            </header>

            <div class=move || format!("scanner-frame {}", scan.with(|s| s.flash.as_str()))>
                <video node_ref=video_ref playsinline=true muted=true></video>
            </div>

            <StatusBanner
                status=Signal::derive(move || scan.with(|s| s.status))
                message=Signal::derive(move || scan.with(|s| s.message.clone()))
            />

            <Show when=move || scan.with(|s| !s.code.is_empty())>
                <p class=move || if scan.with(|s| s.success) { "last-code success" } else { "last-code" }>
                    <span class="label">"Last code: "</span>
                    <code>{move || scan.with(|s| s.code.clone())}</code>
                </p>
            </Show>
        </section>
    }
}

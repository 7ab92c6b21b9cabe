//! Status Banner Component
//!
//! Loading indicator and last message of a screen's controller.

use leptos::prelude::*;
use pos_sync::Status;

#[component]
pub fn StatusBanner(
    #[prop(into)] status: Signal<Status>,
    #[prop(into)] message: Signal<String>,
) -> impl IntoView {
    view! {
        <div class=move || format!("status-banner {}", status.get().as_str())>
            <Show when=move || status.get() == Status::Loading>
                <span class="spinner">"Loading..."</span>
            </Show>
            <Show when=move || !message.get().is_empty()>
                <span class="message">{move || message.get()}</span>
            </Show>
        </div>
    }
}

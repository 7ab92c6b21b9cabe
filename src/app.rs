//! POS Support App
//!
//! Tab layout switching between the categories, receipts and scanner screens.

use leptos::prelude::*;
use pos_sync::ClientConfig;

use crate::components::{CategoriesPage, ReceiptsPage, ScannerPage};
use crate::context::AppContext;

/// Screen selection
#[derive(Clone, Copy, PartialEq)]
enum Screen {
    Categories,
    Receipts,
    Scanner,
}

const SCREENS: &[(Screen, &str)] = &[
    (Screen::Categories, "Categories"),
    (Screen::Receipts, "Receipts"),
    (Screen::Scanner, "Scanner"),
];

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_context(AppContext::new(config));

    let (screen, set_screen) = signal(Screen::Categories);

    view! {
        <div class="app-layout">
            <nav class="screen-tabs">
                {SCREENS.iter().map(|(target, label)| {
                    let target = *target;
                    view! {
                        <button
                            class=move || if screen.get() == target { "tab active" } else { "tab" }
                            on:click=move |_| set_screen.set(target)
                        >
                            {*label}
                        </button>
                    }
                }).collect_view()}
            </nav>

            // Each screen builds its own controller and loads on mount
            <main class="main-content">
                {move || match screen.get() {
                    Screen::Categories => view! { <CategoriesPage /> }.into_any(),
                    Screen::Receipts => view! { <ReceiptsPage /> }.into_any(),
                    Screen::Scanner => view! { <ScannerPage /> }.into_any(),
                }}
            </main>
        </div>
    }
}

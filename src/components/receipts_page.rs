//! Receipts Page
//!
//! Purchase-receipt line items collected from scanned tickets, with a button
//! to clear them all server-side. The endpoint variant comes from the config.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pos_sync::{Clearable, ReceiptRecord, ReceiptsApi, ReceiptsV1, ReceiptsV2, SyncController};

use super::StatusBanner;
use crate::context::use_app_context;
use crate::store::watch_controller;
use crate::transport::FetchTransport;

#[component]
pub fn ReceiptsPage() -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();
    let transport = ctx.transport();

    match config.receipts_api {
        ReceiptsApi::V1 => {
            let controller = SyncController::<ReceiptsV1, FetchTransport>::new(transport, config.receipts_v1_failure);
            receipts_view(controller).into_any()
        }
        ReceiptsApi::V2 => {
            let controller = SyncController::<ReceiptsV2, FetchTransport>::new(transport, config.receipts_v2_failure);
            receipts_view(controller).into_any()
        }
    }
}

fn receipts_view<R>(controller: SyncController<R, FetchTransport>) -> impl IntoView
where
    R: Clearable<Record = ReceiptRecord>,
{
    let state = watch_controller(&controller);
    let controller = StoredValue::new_local(controller);

    // Load on mount
    controller.with_value(|c| spawn_local(c.refresh()));

    let loading = move || state.with(|s| s.is_loading());
    let key_heading = move || state.with(|s| s.items.first().map(|item| item.key.label()).unwrap_or(""));
    let refresh = move |_| controller.with_value(|c| spawn_local(c.refresh()));
    let clear = move |_| controller.with_value(|c| spawn_local(c.clear()));

    view! {
        <section class="receipts-page">
            <header class="page-header">
                <h1>"Receipts"</h1>
                <button disabled=loading on:click=refresh>"Refresh"</button>
                <button
                    class="danger"
                    disabled=move || loading() || !state.with(|s| s.has_items())
                    on:click=clear
                >
                    "Clear"
                </button>
            </header>

            <StatusBanner
                status=Signal::derive(move || state.with(|s| s.status))
                message=Signal::derive(move || state.with(|s| s.message.clone()))
            />

            <Show
                when=move || state.with(|s| s.has_items())
                fallback=|| view! { <p class="empty">"No receipt items"</p> }
            >
                <table class="receipts-table">
                    <thead>
                        <tr>
                            <th>{key_heading}</th>
                            <th>"Product"</th>
                            <th>"Category"</th>
                            <th>"Name"</th>
                            <th class="number">"Quantity"</th>
                            <th class="number">"Sum"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || state.with(|s| s.items.iter().map(receipt_row).collect_view())}
                    </tbody>
                </table>
            </Show>
        </section>
    }
}

fn receipt_row(item: &ReceiptRecord) -> impl IntoView {
    let class = if item.categorized { "receipt-row categorized" } else { "receipt-row uncategorized" };
    view! {
        <tr class=class>
            <td>{item.key.as_str().to_string()}</td>
            <td>{item.product.clone()}</td>
            <td>{item.category.clone()}</td>
            <td>{item.name.clone()}</td>
            <td class="number">{item.quantity.to_string()}</td>
            <td class="number">{item.sum.to_string()}</td>
        </tr>
    }
}

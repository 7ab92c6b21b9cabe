//! Categories Page
//!
//! Lists every known product with its category and display name. Editing a
//! field writes the whole row back; the list itself only changes on refresh.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pos_sync::{Categories, CategoryRecord, SyncController};

use super::StatusBanner;
use crate::context::use_app_context;
use crate::store::watch_controller;
use crate::transport::FetchTransport;

type CategoriesController = SyncController<Categories, FetchTransport>;

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let ctx = use_app_context();
    let controller = CategoriesController::new(ctx.transport(), ctx.config().categories_failure);
    let state = watch_controller(&controller);
    let controller = StoredValue::new_local(controller);

    // Load on mount
    controller.with_value(|c| spawn_local(c.refresh()));

    let loading = Signal::derive(move || state.with(|s| s.is_loading()));
    let items = Memo::new(move |_| state.with(|s| s.items.clone()));

    let refresh = move |_| controller.with_value(|c| spawn_local(c.refresh()));
    let save = Callback::new(move |record: CategoryRecord| {
        controller.with_value(|c| spawn_local(c.mutate(record)));
    });

    view! {
        <section class="categories-page">
            <header class="page-header">
                <h1>"Categories"</h1>
                <button disabled=move || loading.get() on:click=refresh>"Refresh"</button>
            </header>

            <StatusBanner
                status=Signal::derive(move || state.with(|s| s.status))
                message=Signal::derive(move || state.with(|s| s.message.clone()))
            />

            <Show
                when=move || state.with(|s| s.has_items())
                fallback=|| view! { <p class="empty">"No products yet"</p> }
            >
                <table class="categories-table">
                    <thead>
                        <tr>
                            <th>"Product"</th>
                            <th>"Category"</th>
                            <th>"Name"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item| item.clone()
                            children=move |item| view! {
                                <CategoryRow item=item on_save=save disabled=loading />
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}

/// One editable row; invalid fields are highlighted
#[component]
fn CategoryRow(
    item: CategoryRecord,
    on_save: Callback<CategoryRecord>,
    disabled: Signal<bool>,
) -> impl IntoView {
    let (category, set_category) = signal(item.category.clone());
    let (name, set_name) = signal(item.name.clone());
    let product = item.product.clone();

    let draft = move || CategoryRecord {
        product: product.clone(),
        category: category.get(),
        name: name.get(),
    };
    let row_draft = draft.clone();
    let category_draft = draft.clone();
    let name_draft = draft.clone();
    let commit = move || on_save.run(draft());
    let commit_category = commit.clone();

    view! {
        <tr class=move || if row_draft().item_valid() { "category-row" } else { "category-row invalid" }>
            <td class="product">{item.product}</td>
            <td class=move || if category_draft().category_valid() { "" } else { "invalid" }>
                <input
                    type="text"
                    prop:value=move || category.get()
                    prop:disabled=move || disabled.get()
                    on:input=move |ev| set_category.set(event_target_value(&ev))
                    on:change=move |_| commit_category()
                />
            </td>
            <td class=move || if name_draft().name_valid() { "" } else { "invalid" }>
                <input
                    type="text"
                    prop:value=move || name.get()
                    prop:disabled=move || disabled.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    on:change=move |_| commit()
                />
            </td>
        </tr>
    }
}

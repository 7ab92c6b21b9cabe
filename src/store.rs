//! Controller Signals
//!
//! Bridges the sync core's observable state into Leptos signals.

use leptos::prelude::*;
use pos_sync::{Resource, ScanDebouncer, ScanView, SyncController, Timer, Transport, ViewState};

/// Signal mirroring a controller's view state
pub fn watch_controller<R, T>(controller: &SyncController<R, T>) -> ReadSignal<ViewState<R::Record>>
where
    R: Resource,
    R::Record: Send + Sync,
    T: Transport + 'static,
{
    let (state, set_state) = signal(controller.state());
    controller.subscribe(move |snapshot| {
        // A late completion may land after the screen is gone
        let _ = set_state.try_set(snapshot.clone());
    });
    state
}

/// Signal mirroring the scanner view
pub fn watch_scanner<T, M>(debouncer: &ScanDebouncer<T, M>) -> ReadSignal<ScanView>
where
    T: Transport + 'static,
    M: Timer + 'static,
{
    let (view, set_view) = signal(debouncer.state());
    debouncer.subscribe(move |snapshot| {
        let _ = set_view.try_set(snapshot.clone());
    });
    view
}

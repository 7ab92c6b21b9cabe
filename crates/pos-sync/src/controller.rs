//! Sync Controller
//!
//! Owns the view state of one remote resource and runs every remote call
//! through the same `Loading -> Success | Error` lifecycle.
//!
//! Operations set `Loading` synchronously when invoked and return the future
//! that performs the call, so a caller reading the state right after invoking
//! always sees `Loading`. Calls are not serialized: two overlapping calls both
//! hit the network and whichever resolves last decides the final state.
//! Callers that need exclusivity disable their triggers while loading.

use std::future::Future;
use std::rc::Rc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::FailurePolicy;
use crate::error::SyncResult;
use crate::records::ListReply;
use crate::resource::{Clearable, Mutable, Resource};
use crate::state::{Observable, Status, Subscription, ViewState};
use crate::transport::Transport;

/// Controller for one screen's resource
pub struct SyncController<R: Resource, T> {
    transport: Rc<T>,
    state: Rc<Observable<ViewState<R::Record>>>,
    policy: FailurePolicy,
}

impl<R: Resource, T> Clone for SyncController<R, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            state: self.state.clone(),
            policy: self.policy,
        }
    }
}

impl<R: Resource, T: Transport + 'static> SyncController<R, T> {
    pub fn new(transport: Rc<T>, policy: FailurePolicy) -> Self {
        Self {
            transport,
            state: Rc::new(Observable::new(ViewState::default())),
            policy,
        }
    }

    /// Snapshot of the current view state
    pub fn state(&self) -> ViewState<R::Record> {
        self.state.get()
    }

    pub fn status(&self) -> Status {
        self.state.with(|state| state.status)
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Called with a snapshot after every state change
    pub fn subscribe(&self, listener: impl Fn(&ViewState<R::Record>) + 'static) -> Subscription {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.state.unsubscribe(subscription);
    }

    /// Re-read the whole list from the server
    pub fn refresh(&self) -> impl Future<Output = ()> + 'static {
        self.begin();
        let this = self.clone();
        async move {
            debug!("[{}] refresh dispatched", R::NAME);
            match this.fetch().await {
                Ok(items) => {
                    info!("[{}] loaded {} items", R::NAME, items.len());
                    this.state.set(ViewState {
                        status: Status::Success,
                        items,
                        message: String::new(),
                    });
                }
                Err(err) => {
                    warn!("[{}] refresh failed: {}", R::NAME, err);
                    this.state.set(ViewState {
                        status: this.failure_status(),
                        items: Vec::new(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    async fn fetch(&self) -> SyncResult<Vec<R::Record>> {
        let body = self.transport.post(R::LIST, None).await?;
        let reply: ListReply<R::Row> = serde_json::from_str(&body)?;
        Ok(reply.items.into_iter().map(R::map).collect())
    }

    fn begin(&self) {
        self.state.update(|state| state.status = Status::Loading);
    }

    fn failure_status(&self) -> Status {
        if self.policy.sets_error_flag() {
            Status::Error
        } else {
            Status::Success
        }
    }

    fn finish(&self, result: SyncResult<()>, on_settle: impl FnOnce(&mut ViewState<R::Record>)) {
        let failure = self.failure_status();
        self.state.update(|state| {
            on_settle(state);
            match result {
                Ok(()) => {
                    state.status = Status::Success;
                    state.message.clear();
                }
                Err(err) => {
                    state.status = failure;
                    state.message = err.to_string();
                }
            }
        });
    }
}

impl<R, T> SyncController<R, T>
where
    R: Mutable,
    R::Record: Serialize,
    T: Transport + 'static,
{
    /// Write one full record back.
    ///
    /// The local list is left as it is whatever the outcome; a later
    /// `refresh` shows what the server accepted.
    pub fn mutate(&self, record: R::Record) -> impl Future<Output = ()> + 'static {
        self.begin();
        let this = self.clone();
        async move {
            debug!("[{}] update dispatched", R::NAME);
            let result = match serde_json::to_string(&record) {
                Ok(body) => this.transport.post(R::UPDATE, Some(body)).await.map(|_| ()),
                Err(err) => Err(err.into()),
            };
            if let Err(err) = &result {
                warn!("[{}] update failed: {}", R::NAME, err);
            }
            this.finish(result, |_| {});
        }
    }
}

impl<R, T> SyncController<R, T>
where
    R: Clearable,
    T: Transport + 'static,
{
    /// Delete every item server-side. The local list is emptied even when the
    /// request fails.
    pub fn clear(&self) -> impl Future<Output = ()> + 'static {
        self.begin();
        let this = self.clone();
        async move {
            debug!("[{}] clear dispatched", R::NAME);
            let result = this.transport.post(R::CLEAR, None).await.map(|_| ());
            match &result {
                Ok(()) => info!("[{}] cleared", R::NAME),
                Err(err) => warn!("[{}] clear failed: {}", R::NAME, err),
            }
            this.finish(result, |state| state.items.clear());
        }
    }
}

//! Detection Feed
//!
//! Push-based bridge between the camera decoder callback and the debouncer.
//! The page pushes every decoded string; the subscriber side is a stream that
//! ends when the camera is stopped.

use std::cell::RefCell;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future;
use futures::{Stream, StreamExt};
use log::{debug, trace};

use crate::debounce::ScanDebouncer;
use crate::transport::{Timer, Transport};

/// Source side of the camera detections
#[derive(Default)]
pub struct CodeFeed {
    sender: RefCell<Option<UnboundedSender<String>>>,
}

impl CodeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new subscription, closing any previous one
    pub fn subscribe(&self) -> UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded();
        if self.sender.replace(Some(tx)).is_some() {
            debug!("[feed] previous subscription replaced");
        }
        rx
    }

    /// Close the current subscription; its stream ends once drained
    pub fn unsubscribe(&self) {
        if self.sender.replace(None).is_some() {
            debug!("[feed] unsubscribed");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Forward one detection. Returns false when nobody is listening.
    pub fn push(&self, code: String) -> bool {
        match self.sender.borrow().as_ref() {
            Some(tx) => tx.unbounded_send(code).is_ok(),
            None => {
                trace!("[feed] detection dropped, no subscriber");
                false
            }
        }
    }
}

/// Drive the debouncer from a detection stream.
///
/// Lookups run concurrently with further detections. Resolves when the stream
/// ends and every dispatched lookup has settled.
pub async fn listen<T, M>(debouncer: ScanDebouncer<T, M>, codes: impl Stream<Item = String>)
where
    T: Transport + 'static,
    M: Timer + 'static,
{
    codes
        .filter_map(|code| future::ready(debouncer.on_detect(&code)))
        .for_each_concurrent(None, |lookup| lookup)
        .await;
    debug!("[feed] detection stream ended");
}

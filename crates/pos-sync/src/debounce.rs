//! Scan Debouncer
//!
//! Turns the camera's continuous detections into distinct lookups. The key is
//! the decoded string itself: a detection equal to the last dispatched code is
//! dropped, however much time has passed or however many physical scans it
//! stands for.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::error::SyncResult;
use crate::records::ScanReply;
use crate::state::{Observable, Status, Subscription};
use crate::transport::{endpoints, Timer, Transport};

/// How long the pass/fail flash stays on
pub const FLASH_DURATION: Duration = Duration::from_millis(200);

/// Transient visual acknowledgment of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flash {
    #[default]
    None,
    Green,
    Red,
}

impl Flash {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flash::None => "",
            Flash::Green => "green",
            Flash::Red => "red",
        }
    }
}

/// What the scanner screen renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanView {
    pub status: Status,
    /// Last dispatched code
    pub code: String,
    pub success: bool,
    pub message: String,
    pub flash: Flash,
}

impl ScanView {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

struct Inner<T, M> {
    transport: Rc<T>,
    timer: Rc<M>,
    state: Observable<ScanView>,
    last_dispatched: RefCell<Option<String>>,
    // Bumped on every flash so an older timer never clears a newer flash
    flash_generation: Cell<u64>,
}

/// Debounced QR code lookup
pub struct ScanDebouncer<T, M> {
    inner: Rc<Inner<T, M>>,
}

impl<T, M> Clone for ScanDebouncer<T, M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, M> ScanDebouncer<T, M>
where
    T: Transport + 'static,
    M: Timer + 'static,
{
    pub fn new(transport: Rc<T>, timer: Rc<M>) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                timer,
                state: Observable::new(ScanView::default()),
                last_dispatched: RefCell::new(None),
                flash_generation: Cell::new(0),
            }),
        }
    }

    pub fn state(&self) -> ScanView {
        self.inner.state.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&ScanView) + 'static) -> Subscription {
        self.inner.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner.state.unsubscribe(subscription);
    }

    pub fn last_dispatched(&self) -> Option<String> {
        self.inner.last_dispatched.borrow().clone()
    }

    /// Forget the last dispatched code so the next detection goes out even
    /// if it repeats it.
    pub fn reset(&self) {
        self.inner.last_dispatched.replace(None);
    }

    /// Handle one detection.
    ///
    /// Returns the lookup to drive, or `None` when the detection is empty or
    /// repeats the last dispatched code. The marker is updated before the
    /// lookup is polled, so re-detections during the request are dropped too.
    pub fn on_detect(&self, code: &str) -> Option<impl Future<Output = ()> + 'static> {
        if code.is_empty() {
            debug!("[scan] ignoring empty detection");
            return None;
        }
        {
            let mut last = self.inner.last_dispatched.borrow_mut();
            if last.as_deref() == Some(code) {
                trace!("[scan] suppressed repeat of {}", code);
                return None;
            }
            *last = Some(code.to_string());
        }

        let code = code.to_string();
        self.inner.state.update(|state| {
            state.status = Status::Loading;
            state.code = code.clone();
        });

        let inner = self.inner.clone();
        Some(async move { inner.lookup(code).await })
    }
}

impl<T, M> Inner<T, M>
where
    T: Transport,
    M: Timer,
{
    async fn lookup(&self, code: String) {
        debug!("[scan] lookup dispatched for {}", code);
        let (success, message) = match self.request(&code).await {
            Ok(reply) => {
                info!("[scan] {} -> success={}", code, reply.success);
                (reply.success, reply.message.unwrap_or_default())
            }
            Err(err) => {
                warn!("[scan] lookup for {} failed: {}", code, err);
                (false, err.to_string())
            }
        };

        let generation = self.flash_generation.get() + 1;
        self.flash_generation.set(generation);
        self.state.update(|state| {
            state.status = if success { Status::Success } else { Status::Error };
            state.success = success;
            state.message = message;
            state.flash = if success { Flash::Green } else { Flash::Red };
        });

        self.timer.sleep(FLASH_DURATION).await;

        if self.flash_generation.get() == generation {
            self.state.update(|state| state.flash = Flash::None);
        }
    }

    async fn request(&self, code: &str) -> SyncResult<ScanReply> {
        let body = serde_json::to_string(code)?;
        let text = self.transport.post(endpoints::QRCODE, Some(body)).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

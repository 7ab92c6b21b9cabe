//! View State
//!
//! The observable `{status, items, message}` tuple a controller exposes to the
//! presentation layer, plus the small single-threaded observable cell that
//! carries it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Lifecycle of the last operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last resolved request succeeded
    Success,
    /// The last resolved request failed
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

/// What a screen renders for one remote resource
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<R> {
    pub status: Status,
    pub items: Vec<R>,
    pub message: String,
}

impl<R> Default for ViewState<R> {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            items: Vec::new(),
            message: String::new(),
        }
    }
}

impl<R> ViewState<R> {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

type Listener<S> = Rc<dyn Fn(&S)>;

/// Single-threaded value cell that notifies listeners on every replacement.
///
/// Listeners receive a snapshot after the borrow is released, so they may read
/// the cell again or subscribe further listeners.
pub struct Observable<S> {
    value: RefCell<S>,
    listeners: RefCell<Vec<(Subscription, Listener<S>)>>,
    next_id: Cell<u64>,
}

impl<S: Clone> Observable<S> {
    pub fn new(initial: S) -> Self {
        Self {
            value: RefCell::new(initial),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> S {
        self.value.borrow().clone()
    }

    /// Read without cloning
    pub fn with<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.value.borrow())
    }

    /// Replace the whole value and notify
    pub fn set(&self, value: S) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Modify in place and notify once
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        f(&mut self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> Subscription {
        let id = Subscription(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.listeners.borrow_mut().retain(|(id, _)| *id != subscription);
    }

    fn notify(&self) {
        let snapshot = self.get();
        let listeners: Vec<Listener<S>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

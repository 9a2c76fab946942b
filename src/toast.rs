//! Transient user-facing notifications with automatic expiry.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::Cell;
use crate::scheduler::{Scheduler, TaskHandle};

pub const TOAST_TTL_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Insertion-ordered queue of live toasts. Each toast expires
/// independently [`TOAST_TTL_MS`] after it was shown.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Rc<Inner>,
}

struct Inner {
    toasts: Cell<Vec<Toast>>,
    next_id: std::cell::Cell<u64>,
    scheduler: Rc<dyn Scheduler>,
    expiries: RefCell<Vec<(u64, TaskHandle)>>,
}

impl ToastQueue {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            inner: Rc::new(Inner {
                toasts: Cell::new(Vec::new()),
                next_id: std::cell::Cell::new(0),
                scheduler,
                expiries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn toasts(&self) -> &Cell<Vec<Toast>> {
        &self.inner.toasts
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let inner = &self.inner;
        let id = inner.next_id.get();
        inner.next_id.set(id + 1);
        inner.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                message: message.into(),
                severity,
            });
        });

        let weak = Rc::downgrade(inner);
        let handle = inner.scheduler.schedule(
            TOAST_TTL_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.expire(id);
                }
            }),
        );
        inner.expiries.borrow_mut().push((id, handle));
        id
    }

    pub fn show_info(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Info)
    }

    /// Remove a toast before its expiry and cancel the pending timer.
    pub fn dismiss(&self, id: u64) {
        let handle = {
            let mut expiries = self.inner.expiries.borrow_mut();
            let index = expiries.iter().position(|(entry, _)| *entry == id);
            index.map(|index| expiries.remove(index).1)
        };
        if let Some(handle) = handle {
            handle.cancel();
        }
        self.inner.remove(id);
    }
}

impl Inner {
    fn expire(&self, id: u64) {
        self.expiries.borrow_mut().retain(|(entry, _)| *entry != id);
        self.remove(id);
    }

    fn remove(&self, id: u64) {
        let present = self.toasts.with(|toasts| toasts.iter().any(|toast| toast.id == id));
        if present {
            self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
        }
    }
}

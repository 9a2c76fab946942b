//! Cancellable one-shot task scheduling behind a seam so tests advance
//! virtual time deterministically instead of waiting on real delays.

use std::cell::RefCell;
use std::rc::Rc;

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle;
}

/// Handle for a scheduled task. `cancel` is a no-op once the task has
/// fired; dropping the handle leaves the task scheduled.
pub struct TaskHandle {
    canceller: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new(canceller: impl FnOnce() + 'static) -> Self {
        Self {
            canceller: Some(Box::new(canceller)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(canceller) = self.canceller.take() {
            canceller();
        }
    }
}

struct PendingTask {
    due_ms: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualInner {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// Virtual-clock scheduler: nothing fires until [`ManualScheduler::advance`]
/// moves time forward. Tasks run in due order (insertion order on ties),
/// and a task scheduled while advancing still fires within the same call
/// if it falls due.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn advance(&self, delta_ms: u64) {
        let target = self.inner.borrow().now_ms + delta_ms;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let index = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due_ms <= target)
                    .min_by_key(|(_, task)| (task.due_ms, task.seq))
                    .map(|(index, _)| index);
                match index {
                    Some(index) => {
                        let pending = inner.pending.remove(index);
                        inner.now_ms = pending.due_ms;
                        Some(pending.task)
                    }
                    None => None,
                }
            };
            // Borrow released: the task may schedule or cancel freely.
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now_ms = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let due_ms = inner.now_ms + u64::from(delay_ms);
        inner.pending.push(PendingTask { due_ms, seq, task });

        let weak = Rc::downgrade(&self.inner);
        TaskHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().pending.retain(|task| task.seq != seq);
            }
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::TimeoutScheduler;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo::timers::callback::Timeout;

    use super::{Scheduler, TaskHandle};

    /// Browser scheduler backed by `setTimeout`. Dropping the gloo
    /// `Timeout` cancels it, so the timer parks in a slot the callback
    /// itself empties on fire.
    pub struct TimeoutScheduler;

    impl Scheduler for TimeoutScheduler {
        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
            let slot: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
            let fired_slot = Rc::clone(&slot);
            let timeout = Timeout::new(delay_ms, move || {
                let _keep = fired_slot.borrow_mut().take();
                task();
            });
            *slot.borrow_mut() = Some(timeout);

            TaskHandle::new(move || {
                slot.borrow_mut().take();
            })
        }
    }
}

//! Reactive value cells. A [`Cell`] holds a value and notifies its
//! subscribers after every change; a [`Derived`] is a read-only cell
//! recomputed synchronously from one or two source cells.

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;
type SubscriberList<T> = Rc<RefCell<Vec<(u64, Subscriber<T>)>>>;

pub struct Cell<T> {
    value: Rc<RefCell<T>>,
    subscribers: SubscriberList<T>,
    next_id: Rc<std::cell::Cell<u64>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            subscribers: Rc::clone(&self.subscribers),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T> Cell<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(std::cell::Cell::new(0)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }
}

impl<T: Clone + 'static> Cell<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
        self.notify();
    }

    /// Register `f`, invoke it immediately with the current value, and
    /// invoke it again after every future change. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let subscriber: Subscriber<T> = Rc::new(f);
        self.subscribers.borrow_mut().push((id, subscriber.clone()));

        let current = self.get();
        subscriber(&current);

        let subscribers = Rc::clone(&self.subscribers);
        Subscription {
            remove: Some(Box::new(move || {
                subscribers.borrow_mut().retain(|(entry, _)| *entry != id);
            })),
        }
    }

    // Subscribers are cloned out before the value borrow is released so a
    // callback may set or subscribe on this very cell without panicking.
    fn notify(&self) {
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        let value = self.get();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }
}

pub struct Subscription {
    remove: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

/// Read-only cell recomputed from its sources. The combining function must
/// be pure; recomputation and notification are synchronous.
pub struct Derived<T> {
    cell: Cell<T>,
    _sources: Vec<Subscription>,
}

impl<T: Clone + 'static> Derived<T> {
    pub fn map<A: Clone + 'static>(source: &Cell<A>, f: impl Fn(&A) -> T + 'static) -> Self {
        let cell = Cell::new(source.with(|value| f(value)));
        let target = cell.clone();
        let subscription = source.subscribe(move |value| target.set(f(value)));
        Self {
            cell,
            _sources: vec![subscription],
        }
    }

    pub fn zip<A: Clone + 'static, B: Clone + 'static>(
        a: &Cell<A>,
        b: &Cell<B>,
        f: impl Fn(&A, &B) -> T + 'static,
    ) -> Self {
        let f = Rc::new(f);
        let cell = Cell::new(a.with(|av| b.with(|bv| f(av, bv))));

        let sub_a = {
            let target = cell.clone();
            let b = b.clone();
            let f = Rc::clone(&f);
            a.subscribe(move |av| {
                let next = b.with(|bv| f(av, bv));
                target.set(next);
            })
        };
        let sub_b = {
            let target = cell.clone();
            let a = a.clone();
            let f = Rc::clone(&f);
            b.subscribe(move |bv| {
                let next = a.with(|av| f(av, bv));
                target.set(next);
            })
        };

        Self {
            cell,
            _sources: vec![sub_a, sub_b],
        }
    }

    pub fn get(&self) -> T {
        self.cell.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        self.cell.subscribe(f)
    }
}

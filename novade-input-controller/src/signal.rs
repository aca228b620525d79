//! Host notification bus.
//!
//! The host owns one [`Signal`] per lifecycle notification and emits on it
//! from its event loop. Listeners subscribe with a closure and get back a
//! [`Subscription`]; cancelling or dropping the subscription removes the
//! listener. Everything here is single-threaded.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct SignalInner<T> {
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
    emitting: Cell<bool>,
}

impl<T> SignalInner<T> {
    fn is_subscribed(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(listener_id, _)| *listener_id == id)
    }

    fn unsubscribe(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Observer list for one kind of notification.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(SignalInner {
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                emitting: Cell::new(false),
            }),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `listener`. It stays subscribed until the returned handle is
    /// cancelled or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        self.inner.listeners.borrow_mut().push((id, listener));

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.unsubscribe(id);
                }
            })),
        }
    }

    /// Calls every listener with `payload`, in subscription order.
    ///
    /// A listener cancelled by an earlier listener during the same emission
    /// is skipped. Emitting on a signal from one of its own listeners is
    /// refused.
    pub fn emit(&self, payload: &T) {
        if self.inner.emitting.get() {
            tracing::warn!("Re-entrant emission dropped");
            return;
        }
        self.inner.emitting.set(true);

        let snapshot: Vec<(u64, Listener<T>)> = self.inner.listeners.borrow().clone();
        for (id, listener) in snapshot {
            if self.inner.is_subscribed(id) {
                let mut call = listener.borrow_mut();
                (&mut *call)(payload);
            }
        }

        self.inner.emitting.set(false);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

/// Cancellation handle returned by [`Signal::subscribe`].
#[must_use = "dropping the Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// The lifecycle notifications a host raises for the input controller.
///
/// `S` is the host's surface handle type.
#[derive(Debug)]
pub struct HostSignals<S> {
    pub seat_created: Signal<crate::host::SeatSnapshot>,
    pub seat_capabilities_changed: Signal<crate::host::SeatSnapshot>,
    pub seat_removed: Signal<crate::host::SeatSnapshot>,
    pub surface_created: Signal<S>,
    pub surface_removed: Signal<S>,
}

impl<S> Default for HostSignals<S> {
    fn default() -> Self {
        Self {
            seat_created: Signal::default(),
            seat_capabilities_changed: Signal::default(),
            seat_removed: Signal::default(),
            surface_created: Signal::default(),
            surface_removed: Signal::default(),
        }
    }
}

impl<S: 'static> HostSignals<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_in_subscription_order() {
        let signal: Signal<u32> = Signal::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let seen = seen.clone();
            signal.subscribe(move |v| seen.borrow_mut().push(("first", *v)))
        };
        let second = {
            let seen = seen.clone();
            signal.subscribe(move |v| seen.borrow_mut().push(("second", *v)))
        };

        signal.emit(&7);
        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
        drop((first, second));
    }

    #[test]
    fn test_cancel_and_drop_unsubscribe() {
        let signal: Signal<u32> = Signal::new();
        let count = Rc::new(Cell::new(0));
        let a = {
            let count = count.clone();
            signal.subscribe(move |_| count.set(count.get() + 1))
        };
        let b = {
            let count = count.clone();
            signal.subscribe(move |_| count.set(count.get() + 10))
        };
        assert_eq!(signal.listener_count(), 2);

        a.cancel();
        signal.emit(&0);
        assert_eq!(count.get(), 10);

        drop(b);
        signal.emit(&0);
        assert_eq!(count.get(), 10);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_signal() {
        let signal: Signal<u32> = Signal::new();
        let subscription = signal.subscribe(|_| {});
        drop(signal);
        subscription.cancel();
    }

    #[test]
    fn test_reentrant_emit_is_dropped() {
        let signal: Rc<Signal<u32>> = Rc::new(Signal::new());
        let depth = Rc::new(Cell::new(0));
        let _subscription = {
            let weak = Rc::downgrade(&signal);
            let depth = depth.clone();
            signal.subscribe(move |v| {
                depth.set(depth.get() + 1);
                if let Some(signal) = weak.upgrade() {
                    signal.emit(&(v + 1));
                }
            })
        };

        signal.emit(&0);
        assert_eq!(depth.get(), 1);
    }
}

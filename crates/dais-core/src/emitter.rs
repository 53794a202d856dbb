#![forbid(unsafe_code)]

//! Single-threaded event streams for dais.
//!
//! This module provides the notification primitive the overlay layers are
//! built on:
//!
//! - [`Emitter`]: A shared, clonable event stream. Mounted content reports
//!   animation events through one; hosts re-emit them through another.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop, so
//!   a listener can never outlive its owner and dangle.
//!
//! # Architecture
//!
//! `Emitter<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Cloning an emitter clones the handle, not the subscriber list; all clones
//! dispatch to the same subscribers. Dispatch snapshots the subscriber list
//! before invoking any callback, so callbacks are free to subscribe,
//! unsubscribe (including themselves), or emit on the same stream without
//! re-entrant borrow failures.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    dispatch cycle. A dispatch already in progress completes with the list
//!    it started with.
//! 3. A callback registered during a dispatch first fires on the next
//!    dispatch.
//! 4. Emitting with no subscribers is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use dais_core::emitter::Emitter;
//!
//! let events: Emitter<u32> = Emitter::new();
//! let sub = events.subscribe(|n| println!("saw {n}"));
//! events.emit(&1);
//! drop(sub); // listener removed
//! events.emit(&2); // nobody listening
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

impl<T> Slots<T> {
    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// A shared, single-threaded event stream.
///
/// See the [module documentation](self) for dispatch semantics.
pub struct Emitter<T> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Emitter<T> {
    /// Create an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `callback` to run on every subsequent [`emit`](Self::emit).
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription
    where
        T: 'static,
    {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.entries.push((id, Rc::new(callback)));
            id
        };
        let weak: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.borrow_mut().remove(id);
            }
        })
    }

    /// Dispatch `event` to every current subscriber, in registration order.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Callback<T>> = self
            .slots
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.slots.borrow().entries.len()
    }

    /// Whether two handles dispatch to the same subscriber list.
    #[must_use]
    pub fn same_stream(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slots, &other.slots)
    }
}

/// RAII guard for a registered callback.
///
/// Dropping the subscription removes the callback from its stream. If the
/// stream itself has already been dropped, the guard is inert.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Remove the callback now instead of waiting for drop.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_reaches_subscribers_in_registration_order() {
        let events: Emitter<u32> = Emitter::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = events.subscribe(move |n| l1.borrow_mut().push(("a", *n)));
        let l2 = Rc::clone(&log);
        let _b = events.subscribe(move |n| l2.borrow_mut().push(("b", *n)));

        events.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn drop_unsubscribes() {
        let events: Emitter<u32> = Emitter::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let sub = events.subscribe(move |_| c.set(c.get() + 1));
        events.emit(&0);
        assert_eq!(count.get(), 1);

        drop(sub);
        events.emit(&0);
        assert_eq!(count.get(), 1, "callback must not fire after drop");
        assert_eq!(events.subscriber_count(), 0);
    }

    #[test]
    fn explicit_unsubscribe() {
        let events: Emitter<u32> = Emitter::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let sub = events.subscribe(move |_| c.set(c.get() + 1));
        sub.unsubscribe();
        events.emit(&0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn emit_with_no_subscribers_is_noop() {
        let events: Emitter<&str> = Emitter::new();
        events.emit(&"nobody home");
        assert_eq!(events.subscriber_count(), 0);
    }

    #[test]
    fn clone_shares_subscriber_list() {
        let a: Emitter<u32> = Emitter::new();
        let b = a.clone();
        assert!(a.same_stream(&b));

        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = a.subscribe(move |_| c.set(c.get() + 1));

        b.emit(&0);
        assert_eq!(count.get(), 1, "clone must dispatch to shared subscribers");
    }

    #[test]
    fn subscription_outlives_emitter() {
        let count = Rc::new(Cell::new(0));
        let sub = {
            let events: Emitter<u32> = Emitter::new();
            let c = Rc::clone(&count);
            events.subscribe(move |_| c.set(c.get() + 1))
        };
        // Stream is gone; dropping the guard must not panic.
        drop(sub);
    }

    // ---- Re-entrancy ----

    #[test]
    fn callback_may_subscribe_during_dispatch() {
        let events: Emitter<u32> = Emitter::new();
        let late_hits = Rc::new(Cell::new(0));
        let held = Rc::new(RefCell::new(Vec::new()));

        let inner_events = events.clone();
        let hits = Rc::clone(&late_hits);
        let slots = Rc::clone(&held);
        let _outer = events.subscribe(move |_| {
            let h = Rc::clone(&hits);
            let sub = inner_events.subscribe(move |_| h.set(h.get() + 1));
            slots.borrow_mut().push(sub);
        });

        events.emit(&0);
        assert_eq!(late_hits.get(), 0, "new subscriber fires next cycle, not this one");

        events.emit(&0);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself_during_dispatch() {
        let events: Emitter<u32> = Emitter::new();
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let c = Rc::clone(&count);
        let s = Rc::clone(&slot);
        let sub = events.subscribe(move |_| {
            c.set(c.get() + 1);
            s.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        events.emit(&0);
        events.emit(&0);
        assert_eq!(count.get(), 1, "self-removed callback must not fire again");
    }

    #[test]
    fn dispatch_in_progress_uses_starting_list() {
        let events: Emitter<u32> = Emitter::new();
        let second_fired = Rc::new(Cell::new(false));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let s = Rc::clone(&slot);
        let _first = events.subscribe(move |_| {
            s.borrow_mut().take();
        });
        let fired = Rc::clone(&second_fired);
        let second = events.subscribe(move |_| fired.set(true));
        *slot.borrow_mut() = Some(second);

        events.emit(&0);
        assert!(
            second_fired.get(),
            "removal mid-dispatch takes effect on the next cycle"
        );

        second_fired.set(false);
        events.emit(&0);
        assert!(!second_fired.get());
    }

    #[test]
    fn callback_may_emit_on_same_stream() {
        let events: Emitter<u32> = Emitter::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_events = events.clone();
        let l = Rc::clone(&log);
        let _sub = events.subscribe(move |n| {
            l.borrow_mut().push(*n);
            if *n == 0 {
                inner_events.emit(&1);
            }
        });

        events.emit(&0);
        assert_eq!(*log.borrow(), vec![0, 1]);
    }

    #[test]
    fn payload_passed_by_reference() {
        let events: Emitter<String> = Emitter::new();
        let seen = Rc::new(RefCell::new(String::new()));

        let s = Rc::clone(&seen);
        let _sub = events.subscribe(move |msg| s.borrow_mut().push_str(msg));

        events.emit(&"hello".to_string());
        assert_eq!(*seen.borrow(), "hello");
    }
}

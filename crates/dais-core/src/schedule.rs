#![forbid(unsafe_code)]

//! Cooperative deferred-task scheduling.
//!
//! An overlay host never acts on fresh DOM-like state in the same turn it
//! mutated that state; it defers by one scheduler turn so the mutation can
//! settle. [`Scheduler`] models that turn boundary for single-threaded event
//! loops:
//!
//! - [`Scheduler::defer`] queues a one-shot task and returns a [`TaskHandle`].
//! - The embedding event loop calls [`Scheduler::run_pending`] once per turn.
//! - Dropping a [`TaskHandle`] cancels the task if it has not run, tying the
//!   deferred work to its owner's lifetime.
//!
//! # Invariants
//!
//! 1. Tasks run in the order they were deferred.
//! 2. A task runs at most once.
//! 3. `run_pending` drains only the tasks queued before it was called; tasks
//!    deferred while draining run on the next call. A task that re-queues
//!    itself therefore cannot starve the loop.
//! 4. Canceling is idempotent, and canceling after the task ran is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use dais_core::schedule::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let handle = scheduler.defer(|| println!("next turn"));
//! assert!(handle.is_pending());
//! assert_eq!(scheduler.run_pending(), 1);
//! assert!(!handle.is_pending());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Task = Box<dyn FnOnce()>;

struct Queue {
    next_id: u64,
    entries: Vec<(u64, Task)>,
}

impl Queue {
    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// A shared handle to a single-threaded deferred-task queue.
///
/// Clones share the queue. The embedder decides when a "turn" ends by calling
/// [`run_pending`](Self::run_pending).
pub struct Scheduler {
    queue: Rc<RefCell<Queue>>,
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Scheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Queue `task` to run on the next [`run_pending`](Self::run_pending)
    /// call. Dropping the returned handle cancels the task.
    #[must_use = "dropping the handle cancels the task; call detach() for fire-and-forget"]
    pub fn defer(&self, task: impl FnOnce() + 'static) -> TaskHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.entries.push((id, Box::new(task)));
        TaskHandle {
            id,
            queue: Rc::downgrade(&self.queue),
            armed: true,
        }
    }

    /// Run every task queued before this call, in order. Returns how many ran.
    ///
    /// The queue borrow is released before any task runs, so tasks may defer
    /// further work or cancel other handles freely.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<(u64, Task)> = std::mem::take(&mut self.queue.borrow_mut().entries);
        let ran = batch.len();
        for (_, task) in batch {
            task();
        }
        ran
    }

    /// Number of tasks waiting for the next turn.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    /// Whether no work is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending_count() == 0
    }
}

/// Owner's handle to one deferred task.
///
/// Dropping the handle cancels the task unless [`detach`](Self::detach) was
/// called first. Once the task has run, the handle is inert.
pub struct TaskHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
    armed: bool,
}

impl TaskHandle {
    /// Cancel the task now if it has not run yet.
    pub fn cancel(&self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().remove(self.id);
        }
    }

    /// Whether the task is still queued.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|queue| queue.borrow().contains(self.id))
    }

    /// Let the task run even after this handle is gone.
    pub fn detach(mut self) {
        self.armed = false;
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if self.armed {
            self.cancel();
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
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
    fn tasks_run_in_defer_order() {
        let scheduler = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let h1 = scheduler.defer(move || l1.borrow_mut().push(1));
        let l2 = Rc::clone(&log);
        let h2 = scheduler.defer(move || l2.borrow_mut().push(2));

        assert_eq!(scheduler.run_pending(), 2);
        assert_eq!(*log.borrow(), vec![1, 2]);
        drop((h1, h2));
    }

    #[test]
    fn drop_cancels_pending_task() {
        let scheduler = Scheduler::new();
        let ran = Rc::new(Cell::new(false));

        let r = Rc::clone(&ran);
        let handle = scheduler.defer(move || r.set(true));
        drop(handle);

        assert_eq!(scheduler.run_pending(), 0);
        assert!(!ran.get(), "dropped handle must cancel the task");
    }

    #[test]
    fn cancel_is_explicit_and_idempotent() {
        let scheduler = Scheduler::new();
        let ran = Rc::new(Cell::new(false));

        let r = Rc::clone(&ran);
        let handle = scheduler.defer(move || r.set(true));
        assert!(handle.is_pending());
        handle.cancel();
        handle.cancel();
        assert!(!handle.is_pending());

        assert_eq!(scheduler.run_pending(), 0);
        assert!(!ran.get());
    }

    #[test]
    fn detach_keeps_task_alive() {
        let scheduler = Scheduler::new();
        let ran = Rc::new(Cell::new(false));

        let r = Rc::clone(&ran);
        scheduler.defer(move || r.set(true)).detach();

        assert_eq!(scheduler.run_pending(), 1);
        assert!(ran.get());
    }

    #[test]
    fn handle_is_inert_after_task_ran() {
        let scheduler = Scheduler::new();
        let handle = scheduler.defer(|| {});
        assert!(handle.is_pending());

        scheduler.run_pending();
        assert!(!handle.is_pending());
        handle.cancel();
        drop(handle);
    }

    #[test]
    fn tasks_deferred_while_draining_run_next_turn() {
        let scheduler = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner = scheduler.clone();
        let l = Rc::clone(&log);
        scheduler
            .defer(move || {
                l.borrow_mut().push("first");
                let l2 = Rc::clone(&l);
                inner.defer(move || l2.borrow_mut().push("second")).detach();
            })
            .detach();

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*log.borrow(), vec!["first"]);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn cancel_during_drain_cannot_stop_same_batch_task() {
        let scheduler = Scheduler::new();
        let ran = Rc::new(Cell::new(false));
        let held: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));

        let h = Rc::clone(&held);
        scheduler.defer(move || drop(h.borrow_mut().take())).detach();
        let r = Rc::clone(&ran);
        *held.borrow_mut() = Some(scheduler.defer(move || r.set(true)));

        assert_eq!(scheduler.run_pending(), 2);
        assert!(ran.get(), "a draining batch completes with the tasks it started with");
    }

    #[test]
    fn cancel_during_drain_stops_next_turn_task() {
        let scheduler = Scheduler::new();
        let ran = Rc::new(Cell::new(false));

        let inner = scheduler.clone();
        let r = Rc::clone(&ran);
        scheduler
            .defer(move || {
                let r2 = Rc::clone(&r);
                let handle = inner.defer(move || r2.set(true));
                handle.cancel();
            })
            .detach();

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(scheduler.run_pending(), 0);
        assert!(!ran.get(), "a next-turn task canceled mid-drain must not run");
    }

    #[test]
    fn clone_shares_queue() {
        let a = Scheduler::new();
        let b = a.clone();

        let ran = Rc::new(Cell::new(false));
        let r = Rc::clone(&ran);
        a.defer(move || r.set(true)).detach();

        assert_eq!(b.pending_count(), 1);
        assert_eq!(b.run_pending(), 1);
        assert!(ran.get());
        assert!(a.is_idle());
    }

    #[test]
    fn handle_survives_scheduler_drop() {
        let handle = {
            let scheduler = Scheduler::new();
            scheduler.defer(|| {})
        };
        assert!(!handle.is_pending());
        handle.cancel();
        drop(handle);
    }
}

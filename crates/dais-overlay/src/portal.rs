#![forbid(unsafe_code)]

//! Mountable content and the portals that deliver it.
//!
//! A portal describes one unit of content for the overlay host to mount.
//! Component portals carry a one-shot constructor; the host runs it exactly
//! once, at attach time, with no internal borrow held. Template portals
//! exist only to be rejected: this host mounts componentized content and
//! nothing else.
//!
//! Mounted content is owned by a [`ContentHandle`], a cheap clone-to-share
//! handle. The host keeps one clone in its mount slot and the attaching
//! caller keeps another, so the caller can keep driving the content
//! (ticking its transition, forwarding input) while the host observes its
//! event stream.
//!
//! # Invariants
//!
//! 1. A [`ComponentPortal`] constructor runs at most once.
//! 2. [`ContentHandle`] clones all refer to the same content cell; the
//!    content is dropped when the last clone goes away.
//! 3. [`OverlayContent::events`] returns handles onto one shared stream:
//!    every call observes the same subscribers.
//!
//! # Failure Modes
//!
//! - [`ContentHandle::with_mut`] panics if the content cell is already
//!   borrowed. Observers on the content's event stream must not re-enter
//!   the cell while its own dispatch is in flight.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use dais_core::emitter::Emitter;
use dais_core::motion::MotionEvent;

// ---------------------------------------------------------------------------
// Content identity
// ---------------------------------------------------------------------------

static NEXT_CONTENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for one mounted content unit.
///
/// Ids are process-wide and never reused, so a stale handle can always be
/// told apart from a newly mounted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(u64);

impl ContentId {
    fn next() -> Self {
        Self(NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "content#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Content trait
// ---------------------------------------------------------------------------

/// A unit of content the overlay host can mount.
///
/// Content owns its transition reporting: it emits a `Start` event when a
/// transition begins and a `Done` event when one settles, on the stream
/// returned by [`events`](Self::events). The host subscribes to that stream
/// at attach time and derives its whole lifecycle from it.
pub trait OverlayContent {
    /// A handle onto this content's transition event stream.
    ///
    /// Every call returns a handle onto the same underlying stream.
    fn events(&self) -> Emitter<MotionEvent>;

    /// Ask the content to begin its leave transition.
    ///
    /// The content decides how (and whether) to comply; the host only
    /// reacts to the events that follow.
    fn request_exit(&mut self);
}

// ---------------------------------------------------------------------------
// Portals
// ---------------------------------------------------------------------------

/// A one-shot constructor for componentized content.
pub struct ComponentPortal {
    build: Box<dyn FnOnce() -> Box<dyn OverlayContent>>,
}

impl ComponentPortal {
    /// Wraps a content constructor.
    ///
    /// The constructor runs when the host attaches the portal, after the
    /// mount slot has been reserved and with no host borrow held.
    pub fn new(build: impl FnOnce() -> Box<dyn OverlayContent> + 'static) -> Self {
        Self {
            build: Box::new(build),
        }
    }

    /// Runs the constructor, consuming the portal.
    pub(crate) fn build(self) -> Box<dyn OverlayContent> {
        (self.build)()
    }
}

impl std::fmt::Debug for ComponentPortal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentPortal").finish_non_exhaustive()
    }
}

/// An inline template fragment.
///
/// Carried only so the host has something concrete to reject; see
/// [`OverlayError::TemplateUnsupported`](crate::OverlayError::TemplateUnsupported).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplatePortal;

// ---------------------------------------------------------------------------
// Content handle
// ---------------------------------------------------------------------------

/// Shared handle onto one mounted content unit.
///
/// Clones are cheap and all point at the same content. Access goes through
/// [`with`](Self::with) and [`with_mut`](Self::with_mut) so the borrow is
/// scoped to the closure and released before any event it triggers fans out.
pub struct ContentHandle {
    id: ContentId,
    cell: Rc<RefCell<Box<dyn OverlayContent>>>,
}

impl Clone for ContentHandle {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Rc::clone(&self.cell),
        }
    }
}

impl ContentHandle {
    pub(crate) fn new(content: Box<dyn OverlayContent>) -> Self {
        Self {
            id: ContentId::next(),
            cell: Rc::new(RefCell::new(content)),
        }
    }

    /// Identifier of the content this handle refers to.
    #[must_use]
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// A handle onto the content's transition event stream.
    #[must_use]
    pub fn events(&self) -> Emitter<MotionEvent> {
        self.cell.borrow().events()
    }

    /// Runs `f` with a shared borrow of the content.
    ///
    /// # Panics
    ///
    /// Panics if the content is exclusively borrowed.
    pub fn with<R>(&self, f: impl FnOnce(&dyn OverlayContent) -> R) -> R {
        f(&**self.cell.borrow())
    }

    /// Runs `f` with an exclusive borrow of the content.
    ///
    /// Events the content emits inside `f` fan out while the borrow is
    /// still held, so their observers must not call back into this handle.
    ///
    /// # Panics
    ///
    /// Panics if the content is already borrowed.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn OverlayContent) -> R) -> R {
        f(&mut **self.cell.borrow_mut())
    }

    /// `true` if both handles refer to the same content cell.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl std::fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct CountingContent {
        events: Emitter<MotionEvent>,
        exits: Rc<Cell<u32>>,
    }

    impl OverlayContent for CountingContent {
        fn events(&self) -> Emitter<MotionEvent> {
            self.events.clone()
        }

        fn request_exit(&mut self) {
            self.exits.set(self.exits.get() + 1);
        }
    }

    fn counting() -> (Box<dyn OverlayContent>, Rc<Cell<u32>>) {
        let exits = Rc::new(Cell::new(0));
        let content = CountingContent {
            events: Emitter::new(),
            exits: Rc::clone(&exits),
        };
        (Box::new(content), exits)
    }

    // ---- identity ----

    #[test]
    fn content_ids_are_unique() {
        let (a, _) = counting();
        let (b, _) = counting();
        let first = ContentHandle::new(a);
        let second = ContentHandle::new(b);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn content_id_displays_with_prefix() {
        let (content, _) = counting();
        let handle = ContentHandle::new(content);
        assert!(handle.id().to_string().starts_with("content#"));
    }

    // ---- portals ----

    #[test]
    fn portal_constructor_runs_on_build() {
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let portal = ComponentPortal::new(move || {
            flag.set(true);
            counting().0
        });
        assert!(!ran.get(), "constructor must not run before build");
        let _content = portal.build();
        assert!(ran.get());
    }

    // ---- handles ----

    #[test]
    fn clones_share_the_content() {
        let (content, exits) = counting();
        let handle = ContentHandle::new(content);
        let alias = handle.clone();

        assert_eq!(handle.id(), alias.id());
        assert!(handle.same_content(&alias));

        alias.with_mut(|content| content.request_exit());
        assert_eq!(exits.get(), 1, "exit reaches the shared content");
    }

    #[test]
    fn events_returns_the_same_stream_each_time() {
        let (content, _) = counting();
        let handle = ContentHandle::new(content);
        assert!(handle.events().same_stream(&handle.events()));
    }

    #[test]
    fn with_reads_without_consuming() {
        let (content, _) = counting();
        let handle = ContentHandle::new(content);
        let count = handle.with(|content| content.events().subscriber_count());
        assert_eq!(count, 0);
    }
}

#![forbid(unsafe_code)]

//! Overlay host: the lifecycle controller for one mounted content unit.
//!
//! [`OverlayContainer`] owns a single mount slot and derives everything else
//! from the content's transition events. Attach captures focus memory and
//! schedules a one-turn interim focus hop onto the host root; the `Open`
//! completion creates (once) and engages the focus trap; the `Closed`
//! completion restores remembered focus, releases the trap, and unmounts the
//! slot so a fresh attach becomes legal. Every inbound event is re-emitted
//! unchanged on [`animation_state_changed`](OverlayContainer::animation_state_changed)
//! after host state has settled.
//!
//! # Architecture
//!
//! ```text
//! caller ── attach_component_portal ──> [mount slot] ──> ContentHandle
//!                                            │
//! content events (Start/Done) ──> dispatch ──┤ focus actions
//!                                            │ is_animating flag
//!                                            └─> re-emit outbound
//! ```
//!
//! The container is a cheap clone-to-share handle over one shared state
//! cell, like the other single-threaded services it composes with.
//!
//! # Invariants
//!
//! 1. One mount slot. A second attach while content is mounted, or while an
//!    attach is still running its content constructor, fails with
//!    [`OverlayError::AlreadyAttached`].
//! 2. Focus memory is captured before any focus movement the host causes.
//! 3. At most one trap exists per mounted lifecycle; creation is lazy and
//!    the instance is cached across repeated `Open` completions.
//! 4. Outbound re-emission happens after host state has settled, with no
//!    internal borrow held: observers may call any container method.
//! 5. Dropping the container cancels the pending interim focus task and
//!    releases the trap, but does not restore remembered focus.
//!
//! # Failure Modes
//!
//! - Focus restoration and interim focus are tolerant: a target that no
//!   longer exists is skipped silently.
//! - Surface and trap-provider implementations are leaf services; they must
//!   not call back into the container. The same holds for observers on a
//!   surface's own focus-change stream, which can fire while the container
//!   is mid-dispatch.
//!
//! # Example
//!
//! ```ignore
//! let container = OverlayContainer::new(root, surface, traps, scheduler);
//! container.set_config(OverlayConfig::generated().described_by("picker-hint"));
//! let handle = container.attach_component_portal(portal)?;
//! // Content reports its enter transition; once `Open` completes the trap
//! // engages. Later:
//! container.start_exit_animation()?;
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use dais_a11y::{AriaAttrs, FocusSurface, FocusTrap, FocusTrapProvider, NodeId};
use dais_core::emitter::{Emitter, Subscription};
use dais_core::motion::{MotionEvent, MotionHook, MotionState, ZoomOrigin};
use dais_core::schedule::{Scheduler, TaskHandle};

use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::portal::{ComponentPortal, ContentHandle, ContentId, TemplatePortal};

// ---------------------------------------------------------------------------
// Focus phase
// ---------------------------------------------------------------------------

/// Focus guardianship states of the host.
///
/// The phase advances `Idle -> Captured -> Trapped -> Idle` across one
/// content lifecycle. `Trapped` is skipped when the content never settles
/// open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusPhase {
    /// No focus responsibility held.
    Idle,
    /// Prior focus remembered; content mounted but not yet settled open.
    Captured,
    /// A trap confines focus to the host subtree.
    Trapped,
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

struct Mounted {
    handle: ContentHandle,
    _events: Subscription,
}

struct Inner {
    root: NodeId,
    surface: Rc<dyn FocusSurface>,
    traps: Rc<dyn FocusTrapProvider>,
    scheduler: Scheduler,
    config: Option<OverlayConfig>,
    labelled_by: Option<String>,
    zoom: ZoomOrigin,
    slot: Option<Mounted>,
    attaching: bool,
    animating: bool,
    phase: FocusPhase,
    remembered: Option<NodeId>,
    trap: Option<Box<dyn FocusTrap>>,
    interim_focus: Option<TaskHandle>,
    events_out: Emitter<MotionEvent>,
}

impl Inner {
    /// `Open` completion: ensure the trap exists and engage it.
    fn trap_focus(&mut self) {
        if self.phase == FocusPhase::Idle {
            return;
        }
        if self.trap.is_none() {
            self.trap = Some(self.traps.create(self.root));
        }
        if self.config.as_ref().is_none_or(|c| c.auto_focus)
            && let Some(trap) = self.trap.as_mut()
        {
            let _ = trap.focus_initial_when_ready();
        }
        self.phase = FocusPhase::Trapped;
    }

    /// `Closed` completion: give focus back, tear down, unmount.
    fn finish_exit(&mut self) {
        self.restore_focus();
        self.slot = None;
        self.interim_focus = None;
    }

    /// Refocuses the remembered element, then destroys the trap.
    fn restore_focus(&mut self) {
        if let Some(node) = self.remembered.take() {
            let restored = self.surface.focus(node);
            if !restored {
                #[cfg(feature = "tracing")]
                tracing::debug!(node = %node, "remembered focus target gone; restore skipped");
            }
        }
        if let Some(mut trap) = self.trap.take() {
            trap.release();
        }
        self.phase = FocusPhase::Idle;
    }
}

type SharedInner = Rc<RefCell<Inner>>;

fn dispatch(inner: &SharedInner, event: &MotionEvent) {
    match event.hook {
        MotionHook::Start => handle_start(inner, event),
        MotionHook::Done => handle_done(inner, event),
    }
}

fn handle_start(inner: &SharedInner, event: &MotionEvent) {
    let outbound = {
        let mut state = inner.borrow_mut();
        state.animating = true;
        state.events_out.clone()
    };
    outbound.emit(event);
}

fn handle_done(inner: &SharedInner, event: &MotionEvent) {
    let outbound = {
        let mut state = inner.borrow_mut();
        match &event.to {
            MotionState::Open => state.trap_focus(),
            MotionState::Closed => state.finish_exit(),
            _ => {}
        }
        state.animating = false;
        state.events_out.clone()
    };
    outbound.emit(event);
}

/// Host for one unit of overlay content.
///
/// Cloning yields another handle onto the same host.
pub struct OverlayContainer {
    inner: SharedInner,
}

impl Clone for OverlayContainer {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl OverlayContainer {
    /// Creates an idle host rooted at `root`.
    ///
    /// `surface` answers focus queries, `traps` manufactures focus traps
    /// over the root, and `scheduler` runs the deferred interim focus hop.
    pub fn new(
        root: NodeId,
        surface: Rc<dyn FocusSurface>,
        traps: Rc<dyn FocusTrapProvider>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                root,
                surface,
                traps,
                scheduler,
                config: None,
                labelled_by: None,
                zoom: ZoomOrigin::default(),
                slot: None,
                attaching: false,
                animating: false,
                phase: FocusPhase::Idle,
                remembered: None,
                trap: None,
                interim_focus: None,
                events_out: Emitter::new(),
            })),
        }
    }

    // -- configuration ------------------------------------------------------

    /// Applies the per-lifecycle configuration.
    ///
    /// Expected once per mounted content unit; a second call replaces the
    /// previous configuration wholesale. The pointer sample, when present,
    /// is consumed here to derive the zoom origin and is not retained.
    pub fn set_config(&self, config: OverlayConfig) {
        let mut state = self.inner.borrow_mut();
        #[cfg(feature = "tracing")]
        if state.config.is_some() {
            tracing::warn!(
                id = %config.id,
                "overlay config replaced; set_config is expected once per mount"
            );
        }
        let mut config = config;
        state.zoom = config
            .pointer
            .take()
            .map(|sample| ZoomOrigin::from_sample(&sample))
            .unwrap_or_default();
        state.config = Some(config);
    }

    /// The applied configuration, if any.
    #[must_use]
    pub fn config(&self) -> Option<OverlayConfig> {
        self.inner.borrow().config.clone()
    }

    /// Origin the enter transition grows out of.
    ///
    /// Centered until a configuration with a pointer sample is applied.
    #[must_use]
    pub fn zoom_origin(&self) -> ZoomOrigin {
        self.inner.borrow().zoom
    }

    /// The host's root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    /// Points `aria-labelledby` at the element titling the overlay.
    ///
    /// Mutable at any time; content typically sets this once its title
    /// exists.
    pub fn set_aria_labelled_by(&self, reference: Option<String>) {
        self.inner.borrow_mut().labelled_by = reference;
    }

    /// The attribute set the host element renders with.
    ///
    /// Always carries `tabindex="-1"` so the host can take interim focus.
    #[must_use]
    pub fn attrs(&self) -> AriaAttrs {
        let state = self.inner.borrow();
        let mut attrs = AriaAttrs::anchor();
        if let Some(config) = &state.config {
            attrs = attrs.id(config.id.clone());
            if let Some(role) = config.role {
                attrs = attrs.role(role);
            }
            if let Some(reference) = &config.described_by {
                attrs = attrs.described_by(reference.clone());
            }
        }
        if let Some(reference) = &state.labelled_by {
            attrs = attrs.labelled_by(reference.clone());
        }
        attrs
    }

    // -- attachment ---------------------------------------------------------

    /// Mounts componentized content into the slot.
    ///
    /// Reserves the slot, captures focus memory, and schedules the interim
    /// focus hop before the portal's constructor runs; the constructor
    /// executes with no host borrow held, so content that re-enters the
    /// host during construction observes the reservation and gets
    /// [`OverlayError::AlreadyAttached`]. On success the content's event
    /// stream is subscribed and a shared handle to the content is returned.
    pub fn attach_component_portal(
        &self,
        portal: ComponentPortal,
    ) -> Result<ContentHandle, OverlayError> {
        {
            let mut state = self.inner.borrow_mut();
            if state.slot.is_some() || state.attaching {
                return Err(OverlayError::AlreadyAttached);
            }
            state.attaching = true;
            state.remembered = state.surface.active();
            state.phase = FocusPhase::Captured;
            // One-turn hop: parks focus on the host root so it cannot sit
            // on stale content while the enter transition plays.
            let surface = Rc::downgrade(&state.surface);
            let root = state.root;
            let task = state.scheduler.defer(move || {
                if let Some(surface) = surface.upgrade() {
                    let _ = surface.focus(root);
                }
            });
            state.interim_focus = Some(task);
        }

        let content = portal.build();

        let handle = ContentHandle::new(content);
        let weak = Rc::downgrade(&self.inner);
        let events = handle.events().subscribe(move |event| {
            if let Some(inner) = weak.upgrade() {
                dispatch(&inner, event);
            }
        });
        {
            let mut state = self.inner.borrow_mut();
            state.attaching = false;
            state.slot = Some(Mounted {
                handle: handle.clone(),
                _events: events,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(content = %handle.id(), "overlay content attached");

        Ok(handle)
    }

    /// Template fragments cannot be mounted here.
    ///
    /// Always fails with [`OverlayError::TemplateUnsupported`].
    pub fn attach_template_portal(
        &self,
        _portal: TemplatePortal,
    ) -> Result<ContentHandle, OverlayError> {
        Err(OverlayError::TemplateUnsupported)
    }

    /// Asks the mounted content to begin its leave transition.
    ///
    /// The host reacts only to the events that follow; unmounting happens
    /// when the `Closed` completion arrives.
    pub fn start_exit_animation(&self) -> Result<(), OverlayError> {
        let handle = {
            let state = self.inner.borrow();
            let Some(mounted) = &state.slot else {
                return Err(OverlayError::NothingAttached);
            };
            mounted.handle.clone()
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(content = %handle.id(), "overlay exit requested");
        handle.with_mut(|content| content.request_exit());
        Ok(())
    }

    // -- animation events ---------------------------------------------------

    /// Feeds a transition-start event through the host.
    ///
    /// Equivalent to the mounted content reporting it on its own stream.
    pub fn on_animation_start(&self, event: MotionEvent) {
        handle_start(&self.inner, &event);
    }

    /// Feeds a transition-done event through the host.
    ///
    /// Focus dispatch runs first, then the animating flag clears, then the
    /// event is re-emitted outbound.
    pub fn on_animation_done(&self, event: MotionEvent) {
        handle_done(&self.inner, &event);
    }

    /// The outbound stream mirroring every inbound transition event.
    #[must_use]
    pub fn animation_state_changed(&self) -> Emitter<MotionEvent> {
        self.inner.borrow().events_out.clone()
    }

    /// `true` between a transition start and its completion.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().animating
    }

    // -- introspection ------------------------------------------------------

    /// Current focus guardianship phase.
    #[must_use]
    pub fn focus_phase(&self) -> FocusPhase {
        self.inner.borrow().phase
    }

    /// `true` while content occupies the mount slot.
    #[must_use]
    pub fn has_attached(&self) -> bool {
        self.inner.borrow().slot.is_some()
    }

    /// Identifier of the mounted content, if any.
    #[must_use]
    pub fn content_id(&self) -> Option<ContentId> {
        self.inner.borrow().slot.as_ref().map(|m| m.handle.id())
    }
}

impl std::fmt::Debug for OverlayContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("OverlayContainer")
                .field("root", &state.root)
                .field("attached", &state.slot.is_some())
                .field("animating", &state.animating)
                .field("focus_phase", &state.phase)
                .finish_non_exhaustive(),
            Err(_) => f
                .debug_struct("OverlayContainer")
                .field("state", &"<in dispatch>")
                .finish_non_exhaustive(),
        }
    }
}

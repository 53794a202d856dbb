#![forbid(unsafe_code)]

//! Capability traits between overlay hosts and the focus-bearing surface.
//!
//! Hosts never touch a concrete screen or document; they speak to these
//! three seams:
//!
//! - [`FocusSurface`]: read which node holds focus, move focus to a node.
//! - [`FocusTrap`]: one live Tab-confinement scope, created per activation.
//! - [`FocusTrapProvider`]: the factory a host asks for traps.
//!
//! All three are object-safe and single-threaded. Implementations use
//! interior mutability where they need it; [`FocusSurface`] methods take
//! `&self` so one surface can be shared by a host and its embedder.
//!
//! # Failure Modes
//!
//! - Focusing a missing or unfocusable node returns `false`, never an error.
//!   Surfaces may lose nodes at any time and callers must tolerate it.
//! - Releasing a trap twice is a no-op.

use crate::node::NodeId;

/// Read and write the surface's single focus pointer.
pub trait FocusSurface {
    /// The node currently holding focus, if any.
    ///
    /// Surfaces may null this out when the focused node disappears; callers
    /// must not assume a previously read node is still focusable.
    fn active(&self) -> Option<NodeId>;

    /// Move focus to `node`. Returns `false` when the node is missing or not
    /// focusable; focus then stays where it was.
    fn focus(&self, node: NodeId) -> bool;

    /// Whether `node` currently exists on the surface.
    fn contains(&self, node: NodeId) -> bool;
}

/// A live Tab-confinement scope rooted at one host element.
///
/// Implementations should also release their scope on drop, so a leaked
/// trap cannot confine navigation forever.
pub trait FocusTrap {
    /// Focus the trap's designated initial element once the surface has
    /// settled. Returns whether focus moved.
    fn focus_initial_when_ready(&mut self) -> bool;

    /// Tear the scope down. Navigation confinement ends. Idempotent.
    fn release(&mut self);
}

/// Factory for [`FocusTrap`]s.
pub trait FocusTrapProvider {
    /// Create a trap confining Tab navigation to the subtree under `root`.
    fn create(&self, root: NodeId) -> Box<dyn FocusTrap>;
}

#![forbid(unsafe_code)]

//! In-memory focus registry: the reference [`FocusSurface`] and
//! [`FocusTrapProvider`] for tests, demos, and headless runtimes.
//!
//! The registry tracks focusable nodes in insertion order (which doubles as
//! Tab order), a single active node, and a stack of live trap scopes. Trap
//! membership is live: a node inserted under a trapped root after the trap
//! was created is confined like any other member. Transitions of the active
//! node are reported on [`focus_changes`](FocusRegistry::focus_changes), so
//! embedders can follow focus the way they follow animation state.
//!
//! # Invariants
//!
//! 1. The active node, when set, always refers to a node currently in the
//!    registry. Removing the active node clears it, the way platforms null
//!    their active-element reference.
//! 2. [`step_forward`](FocusRegistry::step_forward) /
//!    [`step_backward`](FocusRegistry::step_backward) visit only focusable
//!    nodes, confined to the topmost live trap scope when one exists, and
//!    wrap around.
//! 3. Programmatic [`focus`](FocusSurface::focus) is not confined by traps;
//!    only stepping is. This mirrors real surfaces, where a trap intercepts
//!    Tab, not focus assignment.
//! 4. Scopes release in any order; stepping always consults the topmost
//!    scope still alive.
//! 5. Every change of the active node is reported exactly once, after the
//!    registry has settled. Focusing the node that already holds focus
//!    reports nothing; observers may read or drive the registry from inside
//!    a callback.
//!
//! # Failure Modes
//!
//! - Focusing or removing an unknown node: no-op (`focus` returns `false`).
//! - Stepping with no eligible candidates returns `None` and leaves focus
//!   untouched.
//! - A trap whose root owns no members falls back to focusing the root
//!   itself; if even that is gone, `focus_initial_when_ready` returns
//!   `false`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashSet;
use dais_core::Emitter;

use crate::node::{FocusNode, NodeId};
use crate::surface::{FocusSurface, FocusTrap, FocusTrapProvider};

/// One transition of the active node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    /// The node that held focus before, if any did.
    pub from: Option<NodeId>,
    /// The node holding focus now; `None` when focus was cleared.
    pub to: Option<NodeId>,
}

struct TrapScope {
    id: u64,
    root: NodeId,
}

struct RegistryInner {
    /// Nodes in insertion order; insertion order is Tab order.
    nodes: Vec<FocusNode>,
    /// Present-node index for O(1) membership checks.
    ids: AHashSet<NodeId>,
    active: Option<NodeId>,
    /// Live trap scopes, bottom to top.
    traps: Vec<TrapScope>,
    next_trap_id: u64,
    changes: Emitter<FocusChange>,
}

impl RegistryInner {
    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    fn in_scope(&self, node: &FocusNode, scope: &TrapScope) -> bool {
        node.owner == Some(scope.root) || node.id == scope.root
    }

    /// Ordered focusable candidates for stepping, honoring the topmost scope.
    fn candidates(&self) -> Vec<NodeId> {
        let scope = self.traps.last();
        self.nodes
            .iter()
            .filter(|node| node.focusable)
            .filter(|node| scope.is_none_or(|scope| self.in_scope(node, scope)))
            .map(|node| node.id)
            .collect()
    }

    fn release_scope(&mut self, scope_id: u64) {
        self.traps.retain(|scope| scope.id != scope_id);
    }

    /// Swap the active node, returning the report to emit once the borrow
    /// is released. `None` when nothing actually changed.
    fn set_active(&mut self, to: Option<NodeId>) -> Option<FocusChange> {
        let from = std::mem::replace(&mut self.active, to);
        (from != to).then_some(FocusChange { from, to })
    }
}

/// Shared handle to an in-memory focus registry.
///
/// Clones share state, so the same registry can serve as the surface for an
/// overlay host and as the embedder's node table.
pub struct FocusRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl Clone for FocusRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for FocusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FocusRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FocusRegistry")
            .field("nodes", &inner.nodes.len())
            .field("active", &inner.active)
            .field("traps", &inner.traps.len())
            .finish()
    }
}

impl FocusRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                nodes: Vec::new(),
                ids: AHashSet::new(),
                active: None,
                traps: Vec::new(),
                next_trap_id: 1,
                changes: Emitter::new(),
            })),
        }
    }

    /// Insert a node, or update it in place if the ID is already present.
    /// Updating preserves the node's position in Tab order.
    pub fn insert(&self, node: FocusNode) {
        let mut inner = self.inner.borrow_mut();
        if let Some(position) = inner.position(node.id) {
            inner.nodes[position] = node;
        } else {
            inner.ids.insert(node.id);
            inner.nodes.push(node);
        }
    }

    /// Remove a node. Clears the active reference if it pointed here.
    /// Removing an unknown node is a no-op.
    pub fn remove(&self, id: NodeId) {
        let (changes, report) = {
            let mut inner = self.inner.borrow_mut();
            inner.nodes.retain(|node| node.id != id);
            inner.ids.remove(&id);
            let report = if inner.active == Some(id) {
                inner.set_active(None)
            } else {
                None
            };
            (inner.changes.clone(), report)
        };
        if let Some(change) = report {
            changes.emit(&change);
        }
    }

    /// Number of nodes in the registry.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Number of live trap scopes.
    #[must_use]
    pub fn trap_depth(&self) -> usize {
        self.inner.borrow().traps.len()
    }

    /// The stream reporting transitions of the active node.
    ///
    /// Reports fire with no internal borrow held, so a callback may read the
    /// registry or move focus again.
    #[must_use]
    pub fn focus_changes(&self) -> Emitter<FocusChange> {
        self.inner.borrow().changes.clone()
    }

    /// Move focus to the next focusable node in Tab order, wrapping, confined
    /// to the topmost trap scope if one is live. Returns the node focused.
    pub fn step_forward(&self) -> Option<NodeId> {
        self.step(StepDirection::Forward)
    }

    /// Move focus to the previous focusable node in Tab order, wrapping,
    /// confined to the topmost trap scope if one is live.
    pub fn step_backward(&self) -> Option<NodeId> {
        self.step(StepDirection::Backward)
    }

    fn step(&self, direction: StepDirection) -> Option<NodeId> {
        let (changes, report, target) = {
            let mut inner = self.inner.borrow_mut();
            let candidates = inner.candidates();
            if candidates.is_empty() {
                return None;
            }
            let count = candidates.len();
            let position = inner
                .active
                .and_then(|active| candidates.iter().position(|id| *id == active));
            let target = match (position, direction) {
                (Some(index), StepDirection::Forward) => candidates[(index + 1) % count],
                (Some(index), StepDirection::Backward) => candidates[(index + count - 1) % count],
                // Focus is outside the candidate set; enter at the boundary.
                (None, StepDirection::Forward) => candidates[0],
                (None, StepDirection::Backward) => candidates[count - 1],
            };
            let report = inner.set_active(Some(target));
            (inner.changes.clone(), report, target)
        };
        if let Some(change) = report {
            changes.emit(&change);
        }
        Some(target)
    }
}

#[derive(Clone, Copy)]
enum StepDirection {
    Forward,
    Backward,
}

impl FocusSurface for FocusRegistry {
    fn active(&self) -> Option<NodeId> {
        self.inner.borrow().active
    }

    fn focus(&self, node: NodeId) -> bool {
        let (changes, report) = {
            let mut inner = self.inner.borrow_mut();
            let Some(position) = inner.position(node) else {
                return false;
            };
            if !inner.nodes[position].focusable {
                return false;
            }
            let report = inner.set_active(Some(node));
            (inner.changes.clone(), report)
        };
        if let Some(change) = report {
            changes.emit(&change);
        }
        true
    }

    fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().ids.contains(&node)
    }
}

impl FocusTrapProvider for FocusRegistry {
    fn create(&self, root: NodeId) -> Box<dyn FocusTrap> {
        let scope_id = {
            let mut inner = self.inner.borrow_mut();
            let scope_id = inner.next_trap_id;
            inner.next_trap_id += 1;
            inner.traps.push(TrapScope { id: scope_id, root });
            scope_id
        };
        Box::new(RegistryTrap {
            registry: Rc::downgrade(&self.inner),
            scope_id,
            root,
            released: false,
        })
    }
}

/// A trap scope held open on a [`FocusRegistry`].
///
/// Releases its scope on [`release`](FocusTrap::release) or on drop,
/// whichever comes first.
pub struct RegistryTrap {
    registry: Weak<RefCell<RegistryInner>>,
    scope_id: u64,
    root: NodeId,
    released: bool,
}

impl FocusTrap for RegistryTrap {
    fn focus_initial_when_ready(&mut self) -> bool {
        if self.released {
            return false;
        }
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let (changes, report) = {
            let mut inner = registry.borrow_mut();
            let initial = inner
                .nodes
                .iter()
                .find(|node| node.focusable && node.owner == Some(self.root))
                .map(|node| node.id)
                .or_else(|| {
                    inner
                        .nodes
                        .iter()
                        .find(|node| node.focusable && node.id == self.root)
                        .map(|node| node.id)
                });
            let Some(id) = initial else {
                return false;
            };
            let report = inner.set_active(Some(id));
            (inner.changes.clone(), report)
        };
        if let Some(change) = report {
            changes.emit(&change);
        }
        true
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().release_scope(self.scope_id);
        }
    }
}

impl Drop for RegistryTrap {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for RegistryTrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryTrap")
            .field("root", &self.root)
            .field("released", &self.released)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

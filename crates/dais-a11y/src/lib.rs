#![forbid(unsafe_code)]

//! Accessibility layer for dais.
//!
//! Focus-surface and focus-trap capability seams, the in-memory
//! [`FocusRegistry`] reference implementation, and ARIA attribute modeling
//! for overlay host elements.

pub mod aria;
pub mod node;
pub mod registry;
pub mod surface;

pub use aria::{AriaAttrs, Role};
pub use node::{FocusNode, NodeId};
pub use registry::{FocusChange, FocusRegistry, RegistryTrap};
pub use surface::{FocusSurface, FocusTrap, FocusTrapProvider};

#![forbid(unsafe_code)]

//! Overlay lifecycle host.
//!
//! This crate hosts one unit of overlay content at a time and runs its full
//! lifecycle: mount, interim and trapped focus, transition sequencing, and
//! tear-down with focus restoration. It renders nothing; content reports
//! its transitions as events and the host reacts.
//!
//! - [`OverlayContainer`]: the lifecycle controller and single mount slot
//! - [`ComponentPortal`] / [`ContentHandle`]: how content arrives and how
//!   it is shared once mounted
//! - [`OverlayConfig`]: per-lifecycle identity, role, and focus policy
//! - [`OverlayError`]: the caller-bug failures
//!
//! Enable the `tracing` feature for structured logs of attach, exit, and
//! skipped focus restores.

pub mod config;
pub mod container;
pub mod error;
pub mod portal;

pub use config::OverlayConfig;
pub use container::{FocusPhase, OverlayContainer};
pub use error::OverlayError;
pub use portal::{ComponentPortal, ContentHandle, ContentId, OverlayContent, TemplatePortal};

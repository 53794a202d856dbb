#![forbid(unsafe_code)]

//! Per-overlay configuration.
//!
//! One [`OverlayConfig`] is applied to a host per mounted content unit,
//! normally once, right around attach time. It carries the host's identity
//! (the `id` attribute and ARIA description linkage), its announced role,
//! the auto-focus policy, and optionally the pointer press that opened the
//! overlay. The pointer sample is consumed when the config is applied, to
//! seed the zoom origin of the enter transition, and is not retained
//! afterwards.

use std::sync::atomic::{AtomicU64, Ordering};

use dais_a11y::Role;
use dais_core::motion::PointerSample;

static NEXT_CONFIG_ID: AtomicU64 = AtomicU64::new(0);

/// Configuration for one overlay lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Value for the host's `id` attribute.
    pub id: String,
    /// Role announced to assistive technology. Defaults to
    /// [`Role::Dialog`]; clear it for chrome that should not announce.
    pub role: Option<Role>,
    /// Id of the element describing the overlay, if any.
    pub described_by: Option<String>,
    /// Whether the focus trap moves focus to its initial element once the
    /// enter transition completes.
    pub auto_focus: bool,
    /// Pointer press that triggered the overlay, if it was pointer-opened.
    pub pointer: Option<PointerSample>,
}

impl OverlayConfig {
    /// Creates a config with an explicit host id.
    ///
    /// Auto focus defaults to on and the role to `dialog`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Some(Role::Dialog),
            described_by: None,
            auto_focus: true,
            pointer: None,
        }
    }

    /// Creates a config with a generated, process-unique host id.
    #[must_use]
    pub fn generated() -> Self {
        Self::new(format!("dais-overlay-{}", NEXT_CONFIG_ID.fetch_add(1, Ordering::Relaxed)))
    }

    /// Sets the announced role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Links the element describing the overlay.
    #[must_use]
    pub fn described_by(mut self, id: impl Into<String>) -> Self {
        self.described_by = Some(id.into());
        self
    }

    /// Sets the auto-focus policy.
    #[must_use]
    pub fn auto_focus(mut self, enabled: bool) -> Self {
        self.auto_focus = enabled;
        self
    }

    /// Records the pointer press that opened the overlay.
    #[must_use]
    pub fn pointer(mut self, sample: PointerSample) -> Self {
        self.pointer = Some(sample);
        self
    }
}

#[cfg(test)]
mod tests {
    use dais_core::geometry::{Point, Size};

    use super::*;

    #[test]
    fn new_defaults() {
        let config = OverlayConfig::new("pane-1");
        assert_eq!(config.id, "pane-1");
        assert_eq!(config.role, Some(Role::Dialog));
        assert!(config.described_by.is_none());
        assert!(config.auto_focus, "auto focus is on by default");
        assert!(config.pointer.is_none());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = OverlayConfig::generated();
        let b = OverlayConfig::generated();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("dais-overlay-"));
    }

    #[test]
    fn builders_compose() {
        let sample = PointerSample::new(Point::new(10, 5), Size::new(80, 24));
        let config = OverlayConfig::new("picker")
            .role(Role::AlertDialog)
            .described_by("picker-hint")
            .auto_focus(false)
            .pointer(sample);
        assert_eq!(config.role, Some(Role::AlertDialog));
        assert_eq!(config.described_by.as_deref(), Some("picker-hint"));
        assert!(!config.auto_focus);
        assert_eq!(config.pointer, Some(sample));
    }
}

#![forbid(unsafe_code)]

//! Overlay host errors.
//!
//! All variants signal caller-logic bugs, not recoverable runtime states:
//! nothing here is retried, and nothing is transient. Expected runtime
//! inconsistencies (a vanished focus target, an absent trap) are silent
//! no-ops at the call sites that meet them, never errors.

/// Errors from overlay host operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayError {
    /// The single mount slot is occupied. Only one content unit can be
    /// attached at a time; the slot stays occupied until the leave
    /// transition completes.
    AlreadyAttached,
    /// Inline template fragments cannot be mounted into this host; only
    /// componentized content is supported.
    TemplateUnsupported,
    /// No content is mounted, so there is nothing to operate on.
    NothingAttached,
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyAttached => {
                write!(f, "content is already attached to this overlay host")
            }
            Self::TemplateUnsupported => {
                write!(
                    f,
                    "template portals are not supported here; attach a component portal"
                )
            }
            Self::NothingAttached => {
                write!(f, "no content is attached to this overlay host")
            }
        }
    }
}

impl std::error::Error for OverlayError {}

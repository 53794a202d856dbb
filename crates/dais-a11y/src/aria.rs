#![forbid(unsafe_code)]

//! ARIA semantics for overlay host elements.
//!
//! A host element announces itself through a small, fixed attribute set:
//! `id`, `role`, `aria-labelledby`, `aria-describedby`, and `tabindex`.
//! [`AriaAttrs`] models that set and renders it as attribute pairs with
//! absent values omitted; `tabindex` is always rendered because a host
//! anchors focus without being a Tab stop.

/// Dialog-family roles an overlay host may announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Dialog,
    AlertDialog,
    Menu,
    Listbox,
    /// Calendar-style two-dimensional widgets announce as a grid.
    Grid,
    Tooltip,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::AlertDialog => "alertdialog",
            Self::Menu => "menu",
            Self::Listbox => "listbox",
            Self::Grid => "grid",
            Self::Tooltip => "tooltip",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rendered attribute set of a host element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AriaAttrs {
    pub id: Option<String>,
    pub role: Option<Role>,
    pub labelled_by: Option<String>,
    pub described_by: Option<String>,
    /// `-1` makes an element focusable without entering Tab order, which is
    /// exactly what a focus-trap anchor needs.
    pub tab_index: i32,
}

impl AriaAttrs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An attribute set for a focus-trap anchor (`tabindex` fixed at `-1`).
    #[must_use]
    pub fn anchor() -> Self {
        Self {
            tab_index: -1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn labelled_by(mut self, reference: impl Into<String>) -> Self {
        self.labelled_by = Some(reference.into());
        self
    }

    #[must_use]
    pub fn described_by(mut self, reference: impl Into<String>) -> Self {
        self.described_by = Some(reference.into());
        self
    }

    #[must_use]
    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = index;
        self
    }

    /// Render the attribute list. Absent values are omitted; `tabindex` is
    /// always present.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(id) = &self.id {
            pairs.push(("id", id.clone()));
        }
        if let Some(role) = self.role {
            pairs.push(("role", role.as_str().to_string()));
        }
        if let Some(labelled_by) = &self.labelled_by {
            pairs.push(("aria-labelledby", labelled_by.clone()));
        }
        if let Some(described_by) = &self.described_by {
            pairs.push(("aria-describedby", described_by.clone()));
        }
        pairs.push(("tabindex", self.tab_index.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_are_aria_spellings() {
        assert_eq!(Role::Dialog.as_str(), "dialog");
        assert_eq!(Role::AlertDialog.as_str(), "alertdialog");
        assert_eq!(Role::Grid.to_string(), "grid");
    }

    #[test]
    fn full_attribute_set_renders_in_order() {
        let attrs = AriaAttrs::anchor()
            .id("dais-overlay-3")
            .role(Role::Dialog)
            .labelled_by("dais-overlay-title-3")
            .described_by("dais-overlay-desc-3");
        assert_eq!(
            attrs.pairs(),
            vec![
                ("id", "dais-overlay-3".to_string()),
                ("role", "dialog".to_string()),
                ("aria-labelledby", "dais-overlay-title-3".to_string()),
                ("aria-describedby", "dais-overlay-desc-3".to_string()),
                ("tabindex", "-1".to_string()),
            ]
        );
    }

    #[test]
    fn absent_values_are_omitted_but_tabindex_remains() {
        let attrs = AriaAttrs::new();
        assert_eq!(attrs.pairs(), vec![("tabindex", "0".to_string())]);

        let anchor = AriaAttrs::anchor();
        assert_eq!(anchor.pairs(), vec![("tabindex", "-1".to_string())]);
    }
}

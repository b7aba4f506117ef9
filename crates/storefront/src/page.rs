//! The rendered page: named regions plus visibility flags.
//!
//! Every render replaces a region's HTML wholesale; there is no diffing.

use std::collections::HashMap;

use crate::modal::ModalState;

/// Fallback shown when a template fails to render.
const RENDER_FAILED_HTML: &str = r#"<div class="text-red-600">Something went wrong.</div>"#;

/// A replaceable region of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    CategoryList,
    TreeList,
    CartList,
    CartTotal,
    ModalContent,
}

impl Region {
    pub const ALL: [Self; 5] = [
        Self::CategoryList,
        Self::TreeList,
        Self::CartList,
        Self::CartTotal,
        Self::ModalContent,
    ];

    /// Element ID of the region in the page document.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::CategoryList => "category-list",
            Self::TreeList => "tree-list",
            Self::CartList => "cart-list",
            Self::CartTotal => "cart-total",
            Self::ModalContent => "modal-content",
        }
    }
}

/// Current contents of the page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    regions: HashMap<Region, String>,
    modal: ModalState,
    spinner_visible: bool,
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a region's contents.
    pub fn replace(&mut self, region: Region, html: impl Into<String>) {
        self.regions.insert(region, html.into());
    }

    /// Replace a region with a template result, falling back to an inline
    /// error if rendering failed.
    pub fn replace_rendered(&mut self, region: Region, rendered: askama::Result<String>) {
        match rendered {
            Ok(html) => self.replace(region, html),
            Err(e) => {
                tracing::error!(region = region.element_id(), error = %e, "Template render failed");
                self.replace(region, RENDER_FAILED_HTML);
            }
        }
    }

    /// Current HTML of a region (empty if never rendered).
    #[must_use]
    pub fn html(&self, region: Region) -> &str {
        self.regions.get(&region).map_or("", String::as_str)
    }

    #[must_use]
    pub const fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn set_modal(&mut self, state: ModalState) {
        self.modal = state;
    }

    #[must_use]
    pub const fn is_modal_open(&self) -> bool {
        self.modal.is_visible()
    }

    #[must_use]
    pub const fn is_spinner_visible(&self) -> bool {
        self.spinner_visible
    }

    pub fn set_spinner(&mut self, visible: bool) {
        self.spinner_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_is_wholesale() {
        let mut page = Page::new();
        page.replace(Region::TreeList, "<div>a</div>");
        page.replace(Region::TreeList, "<div>b</div>");
        assert_eq!(page.html(Region::TreeList), "<div>b</div>");
        assert_eq!(page.html(Region::CartList), "");
    }

    #[test]
    fn test_region_ids_unique() {
        let mut ids: Vec<&str> = Region::ALL.iter().map(|r| r.element_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Region::ALL.len());
    }

    #[test]
    fn test_modal_and_spinner_flags() {
        let mut page = Page::new();
        assert!(!page.is_modal_open());
        page.set_modal(ModalState::Loading);
        assert!(page.is_modal_open());
        page.set_modal(ModalState::Closed);
        assert!(!page.is_modal_open());

        page.set_spinner(true);
        assert!(page.is_spinner_visible());
    }
}

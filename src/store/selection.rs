//! Ephemeral UI state: the active category filter and the marker display
//! mode. Lives only for the session — never written to storage.

use super::types::DisplayMode;
use super::Store;

#[derive(Debug, Default)]
pub(crate) struct Selection {
    selected_category: Option<String>,
    display_mode: DisplayMode,
}

impl Selection {
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Select a category as the filter; selecting the already-selected one
    /// clears it (the chips act as toggles).
    pub fn toggle(&mut self, category_id: &str) {
        if self.selected_category.as_deref() == Some(category_id) {
            self.selected_category = None;
        } else {
            self.selected_category = Some(category_id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.selected_category = None;
    }
}

impl Store {
    /// The category id the map is currently filtered by, if any.
    pub fn selected_category(&self) -> Option<&str> {
        self.selection.selected_category()
    }

    /// Toggle the category filter: select, or clear when already selected.
    pub fn toggle_category_filter(&mut self, category_id: &str) {
        self.selection.toggle(category_id);
    }

    /// Drop the category filter, showing every pin.
    pub fn clear_filter(&mut self) {
        self.selection.clear();
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.selection.display_mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.selection.display_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::empty_store;
    use crate::store::types::DisplayMode;

    #[test]
    fn toggle_selects_then_clears() {
        let mut store = empty_store();
        store.toggle_category_filter("c1");
        assert_eq!(store.selected_category(), Some("c1"));

        store.toggle_category_filter("c1");
        assert_eq!(store.selected_category(), None);
    }

    #[test]
    fn toggle_switches_between_categories() {
        let mut store = empty_store();
        store.toggle_category_filter("c1");
        store.toggle_category_filter("c2");
        assert_eq!(store.selected_category(), Some("c2"));

        store.clear_filter();
        assert_eq!(store.selected_category(), None);
    }

    #[test]
    fn display_mode_defaults_to_photo_first() {
        let mut store = empty_store();
        assert_eq!(store.display_mode(), DisplayMode::Photo);

        store.set_display_mode(DisplayMode::Glyph);
        assert_eq!(store.display_mode(), DisplayMode::Glyph);
    }
}

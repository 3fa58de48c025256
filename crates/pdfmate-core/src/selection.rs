//! Page selection state for the split workflow
//!
//! Keeps the editable range text and the clickable page grid in sync. The
//! text is the source of truth: grid state is always derived by parsing it,
//! and toggling a page rewrites the text in canonical form.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::range::{format_page_selection, parse_page_range};

/// Pages pre-selected when a document is first loaded
const DEFAULT_SUGGESTION_PAGES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSelection {
    total_pages: u32,
    range: String,
}

impl PageSelection {
    /// Start a selection for a freshly loaded document, suggesting the
    /// first few pages ("1-5", or "1-N" for shorter documents).
    pub fn new(total_pages: u32) -> Self {
        let range = if total_pages == 0 {
            String::new()
        } else {
            format!("1-{}", total_pages.min(DEFAULT_SUGGESTION_PAGES))
        };
        Self { total_pages, range }
    }

    pub fn with_range(total_pages: u32, range: impl Into<String>) -> Self {
        Self {
            total_pages,
            range: range.into(),
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// The range text exactly as the user last left it
    pub fn text(&self) -> &str {
        &self.range
    }

    /// Replace the range text verbatim (no normalization while typing)
    pub fn set_text(&mut self, range: impl Into<String>) {
        self.range = range.into();
    }

    /// Ordered, duplicate-preserving indices used to build the output
    pub fn indices(&self) -> Vec<u32> {
        parse_page_range(&self.range, self.total_pages)
    }

    /// Distinct selected indices, for rendering the grid
    pub fn selected(&self) -> BTreeSet<u32> {
        self.indices().into_iter().collect()
    }

    pub fn is_selected(&self, index: u32) -> bool {
        self.indices().contains(&index)
    }

    /// Flip one page in or out of the selection and rewrite the text in
    /// canonical form. Any custom order or repeats in the text are lost.
    /// Indices past the last page are ignored.
    pub fn toggle(&mut self, index: u32) {
        if index >= self.total_pages {
            return;
        }
        let mut selected = self.selected();
        if !selected.remove(&index) {
            selected.insert(index);
        }
        self.range = format_page_selection(selected);
    }

    pub fn is_empty(&self) -> bool {
        self.indices().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_suggestion() {
        assert_eq!(PageSelection::new(12).text(), "1-5");
        assert_eq!(PageSelection::new(3).text(), "1-3");
        assert_eq!(PageSelection::new(1).text(), "1-1");
        assert_eq!(PageSelection::new(0).text(), "");
    }

    #[test]
    fn test_toggle_adds_and_merges_runs() {
        let mut selection = PageSelection::with_range(10, "1-3, 5");
        selection.toggle(3);
        assert_eq!(selection.text(), "1-5");
    }

    #[test]
    fn test_toggle_removes_and_splits_runs() {
        let mut selection = PageSelection::with_range(10, "1-5");
        selection.toggle(2);
        assert_eq!(selection.text(), "1-2, 4-5");
        assert!(!selection.is_selected(2));
    }

    #[test]
    fn test_toggle_last_page_clears_text() {
        let mut selection = PageSelection::with_range(10, "4");
        selection.toggle(3);
        assert_eq!(selection.text(), "");
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_canonicalizes_custom_order() {
        let mut selection = PageSelection::with_range(10, "5-1, 3");
        selection.toggle(9);
        assert_eq!(selection.text(), "1-5, 10");
    }

    #[test]
    fn test_toggle_past_last_page_is_ignored() {
        let mut selection = PageSelection::with_range(5, "5-1");
        selection.toggle(5);
        selection.toggle(u32::MAX);
        assert_eq!(selection.text(), "5-1");
        assert_eq!(selection.total_pages(), 5);

        let mut empty = PageSelection::new(0);
        empty.toggle(0);
        assert_eq!(empty.text(), "");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_set_text_keeps_user_input() {
        let mut selection = PageSelection::new(10);
        selection.set_text("3, 3, abc");
        assert_eq!(selection.text(), "3, 3, abc");
        assert_eq!(selection.indices(), vec![2, 2]);
        assert_eq!(selection.selected().into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_grid_reflects_text() {
        let selection = PageSelection::with_range(6, "2, 4-5, 9");
        let grid: Vec<bool> = (0..6).map(|i| selection.is_selected(i)).collect();
        assert_eq!(grid, vec![false, true, false, true, true, false]);
    }
}

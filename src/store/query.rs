//! Read path — derived views over the four collections.
//!
//! Everything here is recomputed from the live collections on every call.
//! Nothing is cached or denormalized, so counts and details can never go
//! stale after a cascading delete.

use std::collections::HashSet;

use super::types::{Category, CategoryCount, ContextMeta, Pin, PinDetails};
use super::Store;

impl Store {
    /// All pins, in insertion order.
    pub fn pins(&self) -> &[Pin] {
        &self.collections.pins
    }

    /// All categories, in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.collections.categories
    }

    pub fn pin_count(&self) -> usize {
        self.collections.pins.len()
    }

    pub fn category_count(&self) -> usize {
        self.collections.categories.len()
    }

    /// A pin enriched with its linked categories (link-table order) and its
    /// context metadata. `None` when the pin does not exist.
    pub fn pin_with_details(&self, pin_id: &str) -> Option<PinDetails> {
        let pin = self.collections.pins.iter().find(|pin| pin.id == pin_id)?;
        Some(PinDetails {
            pin: pin.clone(),
            categories: self.categories_for_pin(pin_id),
            context_meta: self.context_meta(pin_id).cloned(),
        })
    }

    /// The categories currently linked to a pin, in link-table order.
    pub fn categories_for_pin(&self, pin_id: &str) -> Vec<Category> {
        self.collections
            .links
            .iter()
            .filter(|link| link.pin_id == pin_id)
            .filter_map(|link| {
                self.collections
                    .categories
                    .iter()
                    .find(|category| category.id == link.category_id)
            })
            .cloned()
            .collect()
    }

    pub fn context_meta(&self, pin_id: &str) -> Option<&ContextMeta> {
        self.collections
            .context
            .iter()
            .find(|meta| meta.pin_id == pin_id)
    }

    /// The canonical map filter: every pin when no category is given,
    /// otherwise only pins linked to it.
    pub fn pins_for_category(&self, category_id: Option<&str>) -> Vec<&Pin> {
        match category_id {
            None => self.collections.pins.iter().collect(),
            Some(category_id) => {
                let linked: HashSet<&str> = self
                    .collections
                    .links
                    .iter()
                    .filter(|link| link.category_id == category_id)
                    .map(|link| link.pin_id.as_str())
                    .collect();
                self.collections
                    .pins
                    .iter()
                    .filter(|pin| linked.contains(pin.id.as_str()))
                    .collect()
            }
        }
    }

    /// The pins the map currently shows, after applying the active category
    /// filter. Also drives the displayed pin counter.
    pub fn visible_pins(&self) -> Vec<&Pin> {
        self.pins_for_category(self.selection.selected_category())
    }

    /// Every category with its live pin count, sorted by count descending.
    /// Ties keep insertion order (the sort is stable), so the result is
    /// deterministic.
    pub fn categories_with_counts(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = self
            .collections
            .categories
            .iter()
            .map(|category| {
                let pin_count = self
                    .collections
                    .links
                    .iter()
                    .filter(|link| link.category_id == category.id)
                    .map(|link| link.pin_id.as_str())
                    .collect::<HashSet<_>>()
                    .len();
                CategoryCount {
                    category: category.clone(),
                    pin_count,
                }
            })
            .collect();

        counts.sort_by(|a, b| b.pin_count.cmp(&a.pin_count));
        counts
    }
}

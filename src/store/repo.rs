//! Write path — every mutation of the four collections goes through here.
//!
//! Ordering is always validate, then mutate, then schedule a snapshot write.
//! A failed validation leaves the collections untouched.

use tracing::{debug, warn};
use uuid::Uuid;

use super::types::{
    Category, ContextMeta, ContextSlots, Pin, PinCategory, PinDraft, PinPatch, PinType,
};
use super::{Store, StoreError};

impl Store {
    /// Register a new pin. The coordinate must satisfy the registration
    /// boundary and the draft must carry the display field its `pin_type`
    /// requires. Returns the generated pin id.
    pub fn add_pin(&mut self, draft: PinDraft) -> Result<String, StoreError> {
        if !self.geofence.is_within_registration(draft.lat, draft.lng) {
            return Err(StoreError::OutOfBounds {
                lat: draft.lat,
                lng: draft.lng,
            });
        }
        require_display_field(
            draft.pin_type,
            draft.photo_uri.as_deref(),
            draft.text_char.as_deref(),
        )?;

        let now = chrono::Utc::now();
        let id = Uuid::now_v7().to_string();
        self.collections.pins.push(Pin {
            id: id.clone(),
            lat: draft.lat,
            lng: draft.lng,
            pin_type: draft.pin_type,
            photo_uri: draft.photo_uri,
            background_uri: draft.background_uri,
            text_char: draft.text_char,
            rank: draft.rank,
            note: draft.note,
            visited_at: draft.visited_at.unwrap_or(now),
            created_at: now,
        });

        debug!(pin_id = %id, pin_type = %draft.pin_type, "pin added");
        self.schedule_persist();
        Ok(id)
    }

    /// Merge the patch into an existing pin. Relocations are re-validated
    /// against the registration boundary. Fields absent from the patch are
    /// left as they are — including a display field made redundant by a
    /// `pin_type` switch, which is kept, not cleared.
    pub fn update_pin(&mut self, pin_id: &str, patch: PinPatch) -> Result<(), StoreError> {
        let pin = self
            .collections
            .pins
            .iter_mut()
            .find(|pin| pin.id == pin_id)
            .ok_or_else(|| StoreError::PinNotFound(pin_id.to_string()))?;

        let lat = patch.lat.unwrap_or(pin.lat);
        let lng = patch.lng.unwrap_or(pin.lng);
        if (patch.lat.is_some() || patch.lng.is_some())
            && !self.geofence.is_within_registration(lat, lng)
        {
            return Err(StoreError::OutOfBounds { lat, lng });
        }

        // Validate the merged record before committing any of it
        let pin_type = patch.pin_type.unwrap_or(pin.pin_type);
        let photo_uri = patch.photo_uri.as_deref().or(pin.photo_uri.as_deref());
        let text_char = patch.text_char.as_deref().or(pin.text_char.as_deref());
        require_display_field(pin_type, photo_uri, text_char)?;

        pin.lat = lat;
        pin.lng = lng;
        pin.pin_type = pin_type;
        if patch.photo_uri.is_some() {
            pin.photo_uri = patch.photo_uri;
        }
        if patch.background_uri.is_some() {
            pin.background_uri = patch.background_uri;
        }
        if patch.text_char.is_some() {
            pin.text_char = patch.text_char;
        }
        if let Some(rank) = patch.rank {
            pin.rank = rank;
        }
        if patch.note.is_some() {
            pin.note = patch.note;
        }
        if let Some(visited_at) = patch.visited_at {
            pin.visited_at = visited_at;
        }

        debug!(%pin_id, "pin updated");
        self.schedule_persist();
        Ok(())
    }

    /// Remove a pin along with its category links and context metadata.
    /// Deleting a pin that does not exist is a no-op, not an error.
    pub fn delete_pin(&mut self, pin_id: &str) {
        let before = self.collections.pins.len();
        self.collections.pins.retain(|pin| pin.id != pin_id);
        if self.collections.pins.len() == before {
            debug!(%pin_id, "delete of unknown pin ignored");
            return;
        }

        self.collections.links.retain(|link| link.pin_id != pin_id);
        self.collections.context.retain(|meta| meta.pin_id != pin_id);

        debug!(%pin_id, "pin deleted with links and context");
        self.schedule_persist();
    }

    /// Create a category. Names are free-form and intentionally not
    /// deduplicated — two categories may share a name.
    pub fn add_category(&mut self, name: &str) -> Result<String, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyCategoryName);
        }

        let id = Uuid::now_v7().to_string();
        self.collections.categories.push(Category {
            id: id.clone(),
            name: name.to_string(),
        });

        debug!(category_id = %id, "category added");
        self.schedule_persist();
        Ok(id)
    }

    /// Remove a category and its links. Pins themselves are untouched; a
    /// filter pointing at the removed category is cleared.
    pub fn delete_category(&mut self, category_id: &str) -> Result<(), StoreError> {
        let before = self.collections.categories.len();
        self.collections
            .categories
            .retain(|category| category.id != category_id);
        if self.collections.categories.len() == before {
            return Err(StoreError::CategoryNotFound(category_id.to_string()));
        }

        self.collections
            .links
            .retain(|link| link.category_id != category_id);
        if self.selection.selected_category() == Some(category_id) {
            self.selection.clear();
        }

        debug!(%category_id, "category deleted with links");
        self.schedule_persist();
        Ok(())
    }

    /// Replace the full set of category links for a pin. Ids of categories
    /// that no longer exist are dropped rather than failing the write — the
    /// add/edit screen may hold stale chips. Duplicate ids collapse to one
    /// link.
    pub fn set_pin_categories(
        &mut self,
        pin_id: &str,
        category_ids: &[String],
    ) -> Result<(), StoreError> {
        if !self.collections.pins.iter().any(|pin| pin.id == pin_id) {
            return Err(StoreError::PinNotFound(pin_id.to_string()));
        }

        let mut new_links: Vec<PinCategory> = Vec::with_capacity(category_ids.len());
        for category_id in category_ids {
            if new_links.iter().any(|link| &link.category_id == category_id) {
                continue;
            }
            if !self
                .collections
                .categories
                .iter()
                .any(|category| &category.id == category_id)
            {
                warn!(%pin_id, %category_id, "dropping link to unknown category");
                continue;
            }
            new_links.push(PinCategory {
                pin_id: pin_id.to_string(),
                category_id: category_id.clone(),
            });
        }

        self.collections.links.retain(|link| link.pin_id != pin_id);
        self.collections.links.extend(new_links);

        debug!(%pin_id, "pin categories replaced");
        self.schedule_persist();
        Ok(())
    }

    /// Replace (or create) the context metadata record for a pin. Each slot
    /// is independent; last write wins for the whole record.
    pub fn set_context_meta(
        &mut self,
        pin_id: &str,
        slots: ContextSlots,
    ) -> Result<(), StoreError> {
        if !self.collections.pins.iter().any(|pin| pin.id == pin_id) {
            return Err(StoreError::PinNotFound(pin_id.to_string()));
        }

        self.collections.context.retain(|meta| meta.pin_id != pin_id);
        self.collections.context.push(ContextMeta {
            pin_id: pin_id.to_string(),
            slot1: slots.slot1,
            slot2: slots.slot2,
            slot3: slots.slot3,
            slot4: slots.slot4,
        });

        debug!(%pin_id, "context meta replaced");
        self.schedule_persist();
        Ok(())
    }
}

fn require_display_field(
    pin_type: PinType,
    photo_uri: Option<&str>,
    text_char: Option<&str>,
) -> Result<(), StoreError> {
    let missing = match pin_type {
        PinType::Photo => photo_uri.is_none_or(str::is_empty),
        PinType::Text => text_char.is_none_or(str::is_empty),
    };
    if missing {
        let field = match pin_type {
            PinType::Photo => "photo_uri",
            PinType::Text => "text_char",
        };
        return Err(StoreError::MissingField { pin_type, field });
    }
    Ok(())
}

//! Record types for the four store collections.
//!
//! Defines [`Pin`] (a geolocated memory marker), [`Category`] (a free-form
//! label), [`PinCategory`] (the many-to-many link between them), and
//! [`ContextMeta`] (four positional annotation slots owned by one pin), plus
//! the draft/patch inputs and derived views the store API works with.
//!
//! Persisted JSON uses camelCase field names, matching the records the
//! original app wrote to device storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which visual field is authoritative for a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    /// `photo_uri` drives the marker.
    Photo,
    /// `text_char` (a single glyph) drives the marker.
    Text,
}

impl PinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for PinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(Self::Photo),
            "text" => Ok(Self::Text),
            _ => Err(format!("unknown pin type: {s}")),
        }
    }
}

/// A single memory marker.
///
/// `photo_uri` and `text_char` may both be present at once: switching
/// `pin_type` never clears the now-unused field, only changes which one the
/// markers render. The coordinate satisfies the registration boundary at all
/// times the pin exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    /// UUID v7 (time-sortable), generated at creation, immutable.
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub pin_type: PinType,
    /// Reference to an externally stored image; required while `pin_type` is photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    /// Secondary image used only for the detail-view backdrop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_uri: Option<String>,
    /// Single glyph (may be two code units for some emoji); required while
    /// `pin_type` is text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_char: Option<String>,
    /// Importance tier, 1..=3. The add/edit screen's segmented control is the
    /// only producer.
    #[serde(default = "default_rank")]
    pub rank: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the memory occurred. Defaults to creation time.
    pub visited_at: DateTime<Utc>,
    /// Immutable creation timestamp.
    pub created_at: DateTime<Utc>,
}

pub(crate) fn default_rank() -> u8 {
    2
}

/// A user-defined label. Duplicate names are permitted and never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// UUID v7.
    pub id: String,
    /// Non-empty free-form text.
    pub name: String,
}

/// Join record: "pin P is tagged with category C".
///
/// Fully owned by its pin — deleted when either endpoint goes away, never
/// orphaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinCategory {
    pub pin_id: String,
    pub category_id: String,
}

/// Four optional positional annotation slots attached to one pin (at most
/// one record per pin, replace semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMeta {
    pub pin_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot4: Option<String>,
}

/// The slot values handed to `set_context_meta` (everything but the owner).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSlots {
    pub slot1: Option<String>,
    pub slot2: Option<String>,
    pub slot3: Option<String>,
    pub slot4: Option<String>,
}

/// Input to `add_pin`. `rank` defaults to 2 and `visited_at` to "now" when
/// left unset.
#[derive(Debug, Clone)]
pub struct PinDraft {
    pub lat: f64,
    pub lng: f64,
    pub pin_type: PinType,
    pub photo_uri: Option<String>,
    pub background_uri: Option<String>,
    pub text_char: Option<String>,
    pub rank: u8,
    pub note: Option<String>,
    pub visited_at: Option<DateTime<Utc>>,
}

impl PinDraft {
    /// A photo-pin draft at the given coordinate.
    pub fn photo(lat: f64, lng: f64, photo_uri: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            pin_type: PinType::Photo,
            photo_uri: Some(photo_uri.into()),
            background_uri: None,
            text_char: None,
            rank: default_rank(),
            note: None,
            visited_at: None,
        }
    }

    /// A glyph-pin draft at the given coordinate.
    pub fn text(lat: f64, lng: f64, text_char: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            pin_type: PinType::Text,
            photo_uri: None,
            background_uri: None,
            text_char: Some(text_char.into()),
            rank: default_rank(),
            note: None,
            visited_at: None,
        }
    }
}

/// Partial update for `update_pin`.
///
/// `None` means "leave the field unchanged". There is deliberately no way to
/// clear an optional field: the edit flow never does, which is also what
/// preserves the leftover display field across a `pin_type` switch.
#[derive(Debug, Clone, Default)]
pub struct PinPatch {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub pin_type: Option<PinType>,
    pub photo_uri: Option<String>,
    pub background_uri: Option<String>,
    pub text_char: Option<String>,
    pub rank: Option<u8>,
    pub note: Option<String>,
    pub visited_at: Option<DateTime<Utc>>,
}

/// A pin enriched with its resolved categories and context metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinDetails {
    #[serde(flatten)]
    pub pin: Pin,
    /// Linked categories, in link-table order.
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_meta: Option<ContextMeta>,
}

/// A category annotated with its live pin count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: Category,
    /// Number of distinct pins linked to this category, computed from the
    /// link table on every call.
    pub pin_count: usize,
}

/// Which marker style the map leads with. Ephemeral UI state, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Photo thumbnails first.
    #[default]
    Photo,
    /// Glyphs first.
    Glyph,
}

//! Geofence validation and viewport clamping.
//!
//! Each deployed city ships two axis-aligned lat/lng rectangles: a strict
//! *registration* boundary that gates where pins may be created or moved, and
//! a wider *display* boundary that only limits how far the map can pan and
//! zoom out. The split is deliberate — a user can look at an outlying scenic
//! area without being able to register memories there.

use serde::{Deserialize, Serialize};

/// A closed axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// True iff the coordinate lies inside the box, edges included.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }
}

/// A map viewport: center coordinate plus visible lat/lng span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// The two boundaries plus the maximum zoom-out span for one city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    /// Strict rectangle a pin's coordinates must satisfy.
    pub registration: BoundingBox,
    /// Wider rectangle the map viewport is kept inside.
    pub display: BoundingBox,
    /// Maximum visible lat span (caps zoom-out).
    pub max_lat_delta: f64,
    /// Maximum visible lng span.
    pub max_lng_delta: f64,
}

impl Geofence {
    /// Gate for pin creation and relocation.
    pub fn is_within_registration(&self, lat: f64, lng: f64) -> bool {
        self.registration.contains(lat, lng)
    }

    /// Cap the region's span at the configured maximum, then shift its center
    /// so the whole visible area stays inside the display boundary.
    ///
    /// Pure transform; used by map-rendering code only, never by the store.
    pub fn clamp_region(&self, region: Region) -> Region {
        let latitude_delta = region.latitude_delta.min(self.max_lat_delta);
        let longitude_delta = region.longitude_delta.min(self.max_lng_delta);

        let half_lat = latitude_delta / 2.0;
        let half_lng = longitude_delta / 2.0;

        let min_lat = self.display.south + half_lat;
        let max_lat = self.display.north - half_lat;
        let min_lng = self.display.west + half_lng;
        let max_lng = self.display.east - half_lng;

        // Min-then-max, not `f64::clamp`: when the capped span is wider than
        // the display box the range inverts (min > max) and the center pins
        // to the low edge instead of panicking.
        Region {
            latitude: region.latitude.min(max_lat).max(min_lat),
            longitude: region.longitude.min(max_lng).max(min_lng),
            latitude_delta,
            longitude_delta,
        }
    }
}

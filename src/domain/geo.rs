// Planar and spherical helpers shared by the motion engine and zone tooling.

use super::entities::LngLat;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle (haversine) distance between two points, in kilometers.
pub fn great_circle_distance_km(a: LngLat, b: LngLat) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Linear interpolation of longitude and latitude independently (not geodesic).
pub fn lerp(from: LngLat, to: LngLat, t: f64) -> LngLat {
    LngLat {
        lng: from.lng + (to.lng - from.lng) * t,
        lat: from.lat + (to.lat - from.lat) * t,
    }
}

/// Axis-aligned lng/lat bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl Bounds {
    /// Bounds from a geocoder bbox `(min_lng, min_lat, max_lng, max_lat)`.
    pub fn from_bbox([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Self {
        Self {
            south_west: LngLat::new(min_lng, min_lat),
            north_east: LngLat::new(max_lng, max_lat),
        }
    }

    /// Smallest bounds enclosing every point; `None` for an empty input.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LngLat>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: LngLat) {
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
    }

    /// Closed five-point ring: SW, SE, NE, NW, SW.
    pub fn to_closed_ring(&self) -> Vec<LngLat> {
        let (sw, ne) = (self.south_west, self.north_east);
        vec![
            sw,
            LngLat::new(ne.lng, sw.lat),
            ne,
            LngLat::new(sw.lng, ne.lat),
            sw,
        ]
    }
}

/// Closes a drawn ring by repeating its first point when needed.
///
/// Returns `None` when fewer than three distinct vertices remain, since no
/// polygon can be formed. No other topology checks are made.
pub fn close_ring(mut points: Vec<LngLat>) -> Option<Vec<LngLat>> {
    let first = *points.first()?;
    if points.last() != Some(&first) {
        points.push(first);
    }
    if points.len() < 4 {
        return None;
    }
    Some(points)
}

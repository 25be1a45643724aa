// Display helpers for coordinates and timestamps.

use super::entities::LngLat;
use chrono::NaiveDateTime;

/// `"lat, lng"` with six decimals each.
pub fn format_coordinates(point: LngLat) -> String {
    format!("{:.6}, {:.6}", point.lat, point.lng)
}

/// `dd.mm.yyyy hh:mm`
pub fn format_date(at: NaiveDateTime) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}

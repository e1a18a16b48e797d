//! Map and annotation layers.
//!
//! One viewport, three independent overlay layers: static markers (buildings
//! and green zones, populated once at load), the user's drawn shape (0 or 1),
//! and the analysis grid (0..N points). All mutation happens on the UI
//! thread.

use crate::model::{DrawnShape, GridPoint, LatLon};

/// Default viewport center (campus).
pub const DEFAULT_CENTER: LatLon = LatLon {
    lat: 23.078,
    lon: 72.501,
};
/// Default viewport zoom, web-mercator style (span halves per level).
pub const DEFAULT_ZOOM: u8 = 18;

const MIN_ZOOM: u8 = 3;
const MAX_ZOOM: u8 = 19;

/// What a static marker represents, for glyph/color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Building,
    GreenZone,
}

/// A static annotation on the map.
#[derive(Debug, Clone)]
pub struct Marker {
    pub position: LatLon,
    pub label: String,
    pub kind: MarkerKind,
}

/// Viewport plus the three overlay layers.
#[derive(Debug)]
pub struct MapState {
    pub center: LatLon,
    pub zoom: u8,
    /// Keyboard cursor, in geographic coordinates.
    pub cursor: LatLon,
    markers: Vec<Marker>,
    drawn: Option<DrawnShape>,
    grid: Vec<GridPoint>,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl MapState {
    #[must_use]
    pub fn new(center: LatLon, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            cursor: center,
            markers: Vec::new(),
            drawn: None,
            grid: Vec::new(),
        }
    }

    /// Append a marker. Repeated calls with the same position are allowed;
    /// no dedup is attempted.
    pub fn add_marker(&mut self, lat: f64, lon: f64, label: &str, kind: MarkerKind) {
        self.markers.push(Marker {
            position: LatLon::new(lat, lon),
            label: label.to_string(),
            kind,
        });
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Replace the drawn-shape layer with a new shape. At most one shape is
    /// ever present: drawing clears the old shape before adding the new one.
    pub fn set_shape(&mut self, shape: DrawnShape) {
        self.drawn = Some(shape);
    }

    /// Delete the drawn shape: clears both the shape layer and the grid
    /// layer. The caller resets the workflow (which hides the summary).
    pub fn clear_shape(&mut self) {
        self.drawn = None;
        self.grid.clear();
    }

    #[must_use]
    pub fn drawn_shape(&self) -> Option<&DrawnShape> {
        self.drawn.as_ref()
    }

    /// Replace the grid layer wholesale with a new analysis result.
    pub fn set_grid(&mut self, points: Vec<GridPoint>) {
        self.grid = points;
    }

    #[must_use]
    pub fn grid(&self) -> &[GridPoint] {
        &self.grid
    }

    /// Latitude span of the viewport at the current zoom.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        360.0 / f64::from(1u32 << u32::from(self.zoom.min(MAX_ZOOM)))
    }

    /// Viewport bounds as `([lon_min, lon_max], [lat_min, lat_max])`.
    ///
    /// `aspect` is the width/height ratio of the drawing surface in square
    /// pixels; longitude span is widened accordingly so the view is not
    /// distorted.
    #[must_use]
    pub fn bounds(&self, aspect: f64) -> ([f64; 2], [f64; 2]) {
        let lat_half = self.lat_span() / 2.0;
        let lon_half = lat_half * aspect.max(0.1);
        (
            [self.center.lon - lon_half, self.center.lon + lon_half],
            [self.center.lat - lat_half, self.center.lat + lat_half],
        )
    }

    /// Move the cursor by `steps` of 1/24 of the viewport span per axis,
    /// panning the center along with it when it would leave the view.
    pub fn move_cursor(&mut self, lat_steps: i32, lon_steps: i32) {
        let step = self.lat_span() / 24.0;
        self.cursor.lat = (self.cursor.lat + step * f64::from(lat_steps)).clamp(-85.0, 85.0);
        self.cursor.lon = (self.cursor.lon + step * f64::from(lon_steps)).clamp(-180.0, 180.0);

        let half = self.lat_span() / 2.0;
        if (self.cursor.lat - self.center.lat).abs() > half * 0.9 {
            self.center.lat = self.cursor.lat;
        }
        if (self.cursor.lon - self.center.lon).abs() > half * 0.9 {
            self.center.lon = self.cursor.lon;
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recommendation;
    use pretty_assertions::assert_eq;

    fn point(lat: f64, lon: f64) -> GridPoint {
        GridPoint {
            lat,
            lon,
            recommendation: Recommendation::Solar,
        }
    }

    #[test]
    fn drawing_always_leaves_exactly_one_shape() {
        let mut map = MapState::default();
        assert!(map.drawn_shape().is_none());

        for i in 0..3 {
            let offset = f64::from(i) * 0.01;
            map.set_shape(DrawnShape::rectangle(
                LatLon::new(23.0 + offset, 72.0),
                LatLon::new(23.1 + offset, 72.1),
            ));
            assert!(map.drawn_shape().is_some());
        }
        // Last shape won
        let bbox = map.drawn_shape().unwrap().bounding_box();
        assert_eq!(bbox.lat_min, 23.02);
    }

    #[test]
    fn clearing_shape_also_clears_grid() {
        let mut map = MapState::default();
        map.set_shape(DrawnShape::rectangle(
            LatLon::new(23.0, 72.0),
            LatLon::new(23.1, 72.1),
        ));
        map.set_grid(vec![point(23.05, 72.05), point(23.06, 72.06)]);

        map.clear_shape();
        assert!(map.drawn_shape().is_none());
        assert!(map.grid().is_empty());
    }

    #[test]
    fn grid_replacement_is_wholesale() {
        let mut map = MapState::default();
        map.set_grid(vec![point(1.0, 1.0), point(2.0, 2.0), point(3.0, 3.0)]);
        assert_eq!(map.grid().len(), 3);

        map.set_grid(vec![point(9.0, 9.0)]);
        assert_eq!(map.grid().len(), 1);
        assert_eq!(map.grid()[0].lat, 9.0);
    }

    #[test]
    fn markers_append_without_dedup() {
        let mut map = MapState::default();
        map.add_marker(23.0, 72.0, "Main Block", MarkerKind::Building);
        map.add_marker(23.0, 72.0, "Main Block", MarkerKind::Building);
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut map = MapState::new(DEFAULT_CENTER, 19);
        map.zoom_in();
        assert_eq!(map.zoom, 19);

        let mut map = MapState::new(DEFAULT_CENTER, 3);
        map.zoom_out();
        assert_eq!(map.zoom, 3);
    }

    #[test]
    fn cursor_pans_center_at_viewport_edge() {
        let mut map = MapState::default();
        let start_lon = map.center.lon;
        for _ in 0..40 {
            map.move_cursor(0, 1);
        }
        assert!(map.center.lon > start_lon);
        // Center follows, so the cursor stays in view
        let half = map.lat_span() / 2.0;
        assert!((map.cursor.lon - map.center.lon).abs() <= half);
    }
}

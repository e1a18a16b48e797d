//! Geometry for the user-drawn selection and the analysis wire types.

use serde::{Deserialize, Serialize};

use super::Recommendation;

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The user's single active selection on the map.
///
/// At most one shape exists at a time; the map layer enforces the
/// replace-on-draw invariant, this type only carries the geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawnShape {
    Rectangle { sw: LatLon, ne: LatLon },
    Polygon(Vec<LatLon>),
}

impl DrawnShape {
    /// Build a rectangle from two opposite corners in any order.
    #[must_use]
    pub fn rectangle(a: LatLon, b: LatLon) -> Self {
        Self::Rectangle {
            sw: LatLon::new(a.lat.min(b.lat), a.lon.min(b.lon)),
            ne: LatLon::new(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }

    /// Build a polygon from its vertices. Returns `None` for fewer than
    /// three vertices, which keeps `bounding_box` total.
    #[must_use]
    pub fn polygon(vertices: Vec<LatLon>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        Some(Self::Polygon(vertices))
    }

    /// Geometric bounds of the shape: lat_min/lon_min is the southwest
    /// corner, lat_max/lon_max the northeast corner.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Rectangle { sw, ne } => BoundingBox {
                lat_min: sw.lat,
                lat_max: ne.lat,
                lon_min: sw.lon,
                lon_max: ne.lon,
            },
            Self::Polygon(vertices) => {
                let mut bbox = BoundingBox {
                    lat_min: f64::INFINITY,
                    lat_max: f64::NEG_INFINITY,
                    lon_min: f64::INFINITY,
                    lon_max: f64::NEG_INFINITY,
                };
                for v in vertices {
                    bbox.lat_min = bbox.lat_min.min(v.lat);
                    bbox.lat_max = bbox.lat_max.max(v.lat);
                    bbox.lon_min = bbox.lon_min.min(v.lon);
                    bbox.lon_max = bbox.lon_max.max(v.lon);
                }
                bbox
            }
        }
    }
}

/// Request body for `POST /analyze_region`. Derived from the drawn shape at
/// the moment of creation and immutable once sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

/// A single scored sample inside the analyzed region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
    pub recommendation: Recommendation,
}

/// Aggregate figures for one analysis response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub main_rec: String,
    pub avg_solar: f64,
    pub tree_count: u32,
    pub build_score: f64,
}

/// Full `/analyze_region` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub grid_points: Vec<GridPoint>,
    pub summary: RegionSummary,
}

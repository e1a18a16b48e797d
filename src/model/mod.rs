pub mod metrics;
pub mod region;

pub use metrics::{BuildingMetric, GreenZone, Recommendation};
pub use region::{
    AnalysisResponse, BoundingBox, DrawnShape, GridPoint, LatLon, RegionSummary,
};

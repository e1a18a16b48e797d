//! One-shot export of fetched building metrics (no TUI).

pub mod csv;
pub mod json;

pub use crate::error::ExportError;
pub use csv::export_csv;
pub use json::export_json;

use serde::Serialize;

use crate::model::BuildingMetric;

/// One row of the joined solar/carbon report.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRow {
    pub building: String,
    pub predicted_energy_kwh: Option<f64>,
    pub carbon_saved_kg: Option<f64>,
}

/// Solar and carbon records joined by building name, in first-seen order.
#[derive(Debug, Serialize)]
pub struct MetricsReport {
    pub rows: Vec<MetricRow>,
}

impl MetricsReport {
    /// Join the two endpoint responses. Buildings present in only one
    /// response keep a `None` in the other column.
    #[must_use]
    pub fn from_metrics(solar: &[BuildingMetric], carbon: &[BuildingMetric]) -> Self {
        let mut rows: Vec<MetricRow> = Vec::new();

        for record in solar {
            rows.push(MetricRow {
                building: record.building.clone(),
                predicted_energy_kwh: record.predicted_energy_kwh,
                carbon_saved_kg: None,
            });
        }

        for record in carbon {
            if let Some(row) = rows.iter_mut().find(|r| r.building == record.building) {
                row.carbon_saved_kg = record.carbon_saved_kg;
            } else {
                rows.push(MetricRow {
                    building: record.building.clone(),
                    predicted_energy_kwh: None,
                    carbon_saved_kg: record.carbon_saved_kg,
                });
            }
        }

        Self { rows }
    }
}

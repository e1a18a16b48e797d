//! Chart rendering adapter.
//!
//! Owns the two chart series as plain state so the renderer stays a pure
//! function of it. Updating a series replaces the previous one wholesale;
//! updating with an empty record set is a no-op (no empty chart is ever
//! created).

use crate::model::BuildingMetric;

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

/// Label/value series extracted from per-building records.
///
/// A `None` value is a gap: the record is kept (label shown) but no bar or
/// line point is drawn for it.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    /// Extract a series from records. Returns `None` when `records` is empty:
    /// rendering is skipped entirely rather than drawing an empty chart.
    #[must_use]
    pub fn build<F>(kind: ChartKind, title: &str, records: &[BuildingMetric], extract: F) -> Option<Self>
    where
        F: Fn(&BuildingMetric) -> Option<f64>,
    {
        if records.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            title: title.to_string(),
            labels: records.iter().map(|r| r.building.clone()).collect(),
            values: records.iter().map(extract).collect(),
        })
    }

    /// Largest present value, for axis scaling. 0.0 when every value is a gap.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(0.0_f64, f64::max)
    }
}

/// State for the dashboard's two charts. Each update drops the prior series
/// before the new one is stored, so no stale chart handle can outlive a
/// redraw.
#[derive(Debug, Default)]
pub struct Charts {
    pub energy: Option<ChartSeries>,
    pub carbon: Option<ChartSeries>,
}

impl Charts {
    /// Replace the energy series from `/solar` records.
    pub fn update_energy(&mut self, records: &[BuildingMetric]) {
        if let Some(series) = ChartSeries::build(
            ChartKind::Bar,
            "Solar Potential (kWh)",
            records,
            |r| r.predicted_energy_kwh,
        ) {
            self.energy = Some(series);
        }
    }

    /// Replace the carbon series from `/carbon` records.
    pub fn update_carbon(&mut self, records: &[BuildingMetric]) {
        if let Some(series) = ChartSeries::build(
            ChartKind::Line,
            "Carbon Saved (kg)",
            records,
            |r| r.carbon_saved_kg,
        ) {
            self.carbon = Some(series);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(building: &str, energy: Option<f64>, carbon: Option<f64>) -> BuildingMetric {
        BuildingMetric {
            building: building.to_string(),
            predicted_energy_kwh: energy,
            carbon_saved_kg: carbon,
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn empty_records_build_no_series() {
        assert!(ChartSeries::build(ChartKind::Bar, "Energy", &[], |r| r.predicted_energy_kwh)
            .is_none());
    }

    #[test]
    fn empty_update_is_a_noop() {
        let mut charts = Charts::default();
        charts.update_energy(&[record("A", Some(10.0), None)]);
        assert!(charts.energy.is_some());

        charts.update_energy(&[]);
        let energy = charts.energy.as_ref().unwrap();
        assert_eq!(energy.labels, vec!["A"]);
    }

    #[test]
    fn update_replaces_prior_series() {
        let mut charts = Charts::default();
        charts.update_energy(&[record("A", Some(10.0), None)]);
        charts.update_energy(&[record("B", Some(20.0), None), record("C", Some(5.0), None)]);
        let energy = charts.energy.as_ref().unwrap();
        assert_eq!(energy.labels, vec!["B", "C"]);
        assert_eq!(energy.values, vec![Some(20.0), Some(5.0)]);
    }

    #[test]
    fn missing_values_render_as_gaps() {
        let series = ChartSeries::build(
            ChartKind::Line,
            "Carbon",
            &[
                record("A", None, Some(40.0)),
                record("B", None, None),
                record("C", None, Some(60.0)),
            ],
            |r| r.carbon_saved_kg,
        )
        .unwrap();
        assert_eq!(series.values, vec![Some(40.0), None, Some(60.0)]);
        assert_eq!(series.max_value(), 60.0);
    }

    #[test]
    fn all_gap_series_scales_to_zero() {
        let series = ChartSeries::build(
            ChartKind::Bar,
            "Energy",
            &[record("A", None, None)],
            |r| r.predicted_energy_kwh,
        )
        .unwrap();
        assert_eq!(series.max_value(), 0.0);
    }
}

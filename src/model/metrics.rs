//! Per-building metrics and marker data as the backend reports them.
//!
//! All types here are transient view-models: one fetch-render cycle, no
//! caching across reloads.

use serde::{Deserialize, Deserializer, Serialize};

/// One building's sustainability record from `/solar` or `/carbon`.
///
/// The two endpoints each fill their own numeric field; the other stays
/// `None`. Coordinates are optional - buildings without them are charted but
/// not placed on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingMetric {
    pub building: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub predicted_energy_kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbon_saved_kg: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// A server-identified location suggested for vegetation/ecological value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GreenZone {
    pub latitude: f64,
    pub longitude: f64,
}

/// Per-grid-point classification returned by region analysis.
///
/// The server is known to emit more strings than the two named variants
/// ("BUILD", "NEUTRAL" have been observed); everything unrecognized lands in
/// `Other` so a future server value can never break deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Solar,
    Tree,
    #[serde(other)]
    Other,
}

/// Accepts JSON numbers and numeric strings; anything else becomes `None`.
///
/// Charts render a `None` as a gap instead of failing the whole fetch over
/// one malformed value.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn solar_record_deserializes() {
        let json = r#"{"building": "Main Block", "predicted_energy_kwh": 120.5}"#;
        let m: BuildingMetric = serde_json::from_str(json).unwrap();
        assert_eq!(m.building, "Main Block");
        assert_eq!(m.predicted_energy_kwh, Some(120.5));
        assert_eq!(m.carbon_saved_kg, None);
        assert!(m.lat.is_none());
    }

    #[test]
    fn numeric_string_is_coerced() {
        let json = r#"{"building": "Hostel B", "carbon_saved_kg": " 88.4 "}"#;
        let m: BuildingMetric = serde_json::from_str(json).unwrap();
        assert_eq!(m.carbon_saved_kg, Some(88.4));
    }

    #[test]
    fn non_numeric_value_becomes_gap() {
        let json = r#"{"building": "Library", "predicted_energy_kwh": "n/a"}"#;
        let m: BuildingMetric = serde_json::from_str(json).unwrap();
        assert_eq!(m.predicted_energy_kwh, None);

        let json = r#"{"building": "Library", "predicted_energy_kwh": [1, 2]}"#;
        let m: BuildingMetric = serde_json::from_str(json).unwrap();
        assert_eq!(m.predicted_energy_kwh, None);
    }

    #[test]
    fn known_recommendations_parse() {
        assert_eq!(
            serde_json::from_str::<Recommendation>(r#""SOLAR""#).unwrap(),
            Recommendation::Solar
        );
        assert_eq!(
            serde_json::from_str::<Recommendation>(r#""TREE""#).unwrap(),
            Recommendation::Tree
        );
    }

    #[test]
    fn unknown_recommendation_is_other_not_error() {
        for raw in [r#""BUILD""#, r#""NEUTRAL""#, r#""WIND_FARM""#, r#""""#] {
            assert_eq!(
                serde_json::from_str::<Recommendation>(raw).unwrap(),
                Recommendation::Other,
                "failed for {raw}"
            );
        }
    }
}

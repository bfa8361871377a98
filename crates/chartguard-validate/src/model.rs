use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One data point: column name to cell value.
pub type DataRow = BTreeMap<String, DataValue>;

/// Normalized chart payload produced by a successful validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ChartPayload {
    /// Ordered data points.
    pub data: Vec<DataRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChartMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChartConfig>,
}

/// Cell value. ISO-8601 dates travel as text.
///
/// Numbers keep their JSON representation, so integers stay integers and
/// are never rounded through `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl DataValue {
    /// Numeric cell from a float; `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(DataValue::Number)
    }
}

/// Descriptive metadata shown next to a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absolute URI of the upstream dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// ISO-8601 date or RFC 3339 date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Presentation hints forwarded to the chart component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintain_aspect_ratio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnimationConfig {
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

/// Supported easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    pub const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|easing| easing.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_names_round_trip_through_serde() {
        for easing in Easing::ALL {
            let json = serde_json::to_value(easing).unwrap();
            assert_eq!(json, easing.as_str());
            assert_eq!(Easing::from_name(easing.as_str()), Some(easing));
        }
        assert_eq!(Easing::from_name("EaseInQuad"), None);
    }

    #[test]
    fn non_finite_floats_are_not_cells() {
        assert_eq!(DataValue::from_f64(f64::NAN), None);
        assert_eq!(DataValue::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn data_values_deserialize_untagged() {
        let row: DataRow = serde_json::from_value(serde_json::json!({
            "label": "Beograd",
            "value": 12.5,
            "count": 7,
            "active": true,
            "note": null
        }))
        .unwrap();
        assert_eq!(row["label"], DataValue::Text("Beograd".to_string()));
        assert_eq!(row["value"], DataValue::from_f64(12.5).unwrap());
        assert_eq!(row["count"], DataValue::Number(7.into()));
        assert_eq!(row["active"], DataValue::Bool(true));
        assert_eq!(row["note"], DataValue::Null);
    }
}

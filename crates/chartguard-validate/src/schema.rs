use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::model::ChartPayload;

/// Limits applied when validating chart payloads.
///
/// Lengths count Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSchema {
    pub max_rows: usize,
    pub max_text_len: usize,
    pub max_id_len: usize,
    pub max_title_len: usize,
    pub max_description_len: usize,
    pub max_source_len: usize,
    pub max_colors: usize,
    pub max_animation_ms: f64,
    /// Run text cells and the description through the tooltip sanitizer.
    pub sanitize_text: bool,
}

impl Default for ChartSchema {
    fn default() -> Self {
        Self {
            max_rows: 10_000,
            max_text_len: 1_000,
            max_id_len: 50,
            max_title_len: 200,
            max_description_len: 1_000,
            max_source_len: 500,
            max_colors: 20,
            max_animation_ms: 10_000.0,
            sanitize_text: false,
        }
    }
}

/// Emit the JSON Schema for a normalized chart payload.
pub fn chart_payload_json_schema() -> RootSchema {
    schema_for!(ChartPayload)
}

//! Chart payload validation and input sanitization.
//!
//! `validate_chart_data` checks untrusted chart payloads against a bounded
//! schema and reports every field error at once. The sanitizers strip markup
//! from labels and tooltips, enforce a URL allow-list and neutralize file
//! names before they reach rendering or storage code.

pub mod model;
pub mod sanitize;
pub mod schema;
pub mod url_policy;
pub mod validate;

pub use model::{
    AnimationConfig, ChartConfig, ChartMetadata, ChartPayload, DataRow, DataValue, Easing,
};
pub use sanitize::{
    sanitize_chart_label, sanitize_chart_label_value, sanitize_file_name,
    sanitize_tooltip_content, sanitize_tooltip_content_value, MAX_FILE_NAME_LEN,
};
pub use schema::{chart_payload_json_schema, ChartSchema};
pub use url_policy::{sanitize_url, UrlPolicy};
pub use validate::{validate_chart_data, ChartValidator, ValidationOutcome};

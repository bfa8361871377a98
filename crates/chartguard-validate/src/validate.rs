use std::fmt::Display;
use std::sync::OnceLock;

use chartguard_core::{Error, FieldError, Result, ValidationReport};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{
    AnimationConfig, ChartConfig, ChartMetadata, ChartPayload, DataRow, DataValue, Easing,
};
use crate::sanitize::sanitize_tooltip_content;
use crate::schema::ChartSchema;

/// Result of validating one payload.
///
/// `data` is present exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    is_valid: bool,
    data: Option<ChartPayload>,
    errors: Vec<FieldError>,
}

impl ValidationOutcome {
    fn valid(payload: ChartPayload) -> Self {
        Self {
            is_valid: true,
            data: Some(payload),
            errors: Vec::new(),
        }
    }

    fn invalid(report: ValidationReport) -> Self {
        Self {
            is_valid: false,
            data: None,
            errors: report.into_errors(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn data(&self) -> Option<&ChartPayload> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Errors reported for exactly `field`.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |error| error.field == field)
    }

    /// Convert into the normalized payload or `Error::SchemaViolation`.
    pub fn into_result(self) -> Result<ChartPayload> {
        match self.data {
            Some(payload) => Ok(payload),
            None => Err(Error::SchemaViolation(self.errors)),
        }
    }
}

/// Stateless validator for chart payloads bound to one `ChartSchema`.
#[derive(Debug, Clone, Default)]
pub struct ChartValidator {
    schema: ChartSchema,
}

/// Validate a payload with the default schema limits.
pub fn validate_chart_data(payload: &Value) -> ValidationOutcome {
    static DEFAULT: OnceLock<ChartValidator> = OnceLock::new();
    DEFAULT.get_or_init(ChartValidator::default).validate(payload)
}

impl ChartValidator {
    pub fn new(schema: ChartSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ChartSchema {
        &self.schema
    }

    /// Validate an untrusted payload, collecting every field error.
    ///
    /// Unknown keys are dropped from the normalized output.
    pub fn validate(&self, payload: &Value) -> ValidationOutcome {
        let mut report = ValidationReport::default();

        let Some(root) = payload.as_object() else {
            report.error(
                "",
                "invalid_type",
                format!("expected object, received {}", type_name(payload)),
            );
            return self.finish(ValidationOutcome::invalid(report), 0);
        };

        let data = match root.get("data") {
            None => {
                report.error("data", "required", "data is required");
                Vec::new()
            }
            Some(value) => self.validate_data(value, &mut report),
        };
        let metadata = optional(root, "metadata")
            .and_then(|value| self.validate_metadata(value, "metadata", &mut report));
        let config = optional(root, "config")
            .and_then(|value| self.validate_config(value, "config", &mut report));

        let rows = data.len();
        if !report.is_ok() {
            return self.finish(ValidationOutcome::invalid(report), rows);
        }

        let mut payload = ChartPayload {
            data,
            metadata,
            config,
        };
        if self.schema.sanitize_text {
            sanitize_payload_text(&mut payload);
        }
        self.finish(ValidationOutcome::valid(payload), rows)
    }

    fn finish(&self, outcome: ValidationOutcome, rows: usize) -> ValidationOutcome {
        tracing::debug!(
            event = "chart_validated",
            valid = outcome.is_valid(),
            rows = rows,
            errors = outcome.errors().len()
        );
        outcome
    }

    fn validate_data(&self, value: &Value, report: &mut ValidationReport) -> Vec<DataRow> {
        let Some(items) = value.as_array() else {
            report.error(
                "data",
                "invalid_type",
                format!("expected array, received {}", type_name(value)),
            );
            return Vec::new();
        };

        if items.len() > self.schema.max_rows {
            // rows past the bound are not inspected
            report.error(
                "data",
                "too_big",
                format!(
                    "data must contain at most {} rows, received {}",
                    self.schema.max_rows,
                    items.len()
                ),
            );
            return Vec::new();
        }

        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let path = child("data", idx);
            let Some(object) = item.as_object() else {
                report.error(
                    path,
                    "invalid_type",
                    format!("expected object, received {}", type_name(item)),
                );
                continue;
            };

            let mut row = DataRow::new();
            for (key, cell) in object {
                if let Some(value) = self.validate_cell(cell, &child(&path, key), report) {
                    row.insert(key.clone(), value);
                }
            }
            rows.push(row);
        }
        rows
    }

    fn validate_cell(
        &self,
        value: &Value,
        path: &str,
        report: &mut ValidationReport,
    ) -> Option<DataValue> {
        match value {
            Value::Null => Some(DataValue::Null),
            Value::Bool(flag) => Some(DataValue::Bool(*flag)),
            // serde_json numbers are always finite
            Value::Number(number) => Some(DataValue::Number(number.clone())),
            Value::String(text) => {
                check_max_len(text, self.schema.max_text_len, path, report)
                    .then(|| DataValue::Text(text.clone()))
            }
            Value::Array(_) | Value::Object(_) => {
                report.error(
                    path,
                    "invalid_type",
                    format!(
                        "expected string, number, boolean, date or null, received {}",
                        type_name(value)
                    ),
                );
                None
            }
        }
    }

    fn validate_metadata(
        &self,
        value: &Value,
        path: &str,
        report: &mut ValidationReport,
    ) -> Option<ChartMetadata> {
        let object = expect_object(value, path, report)?;

        let id = required_string(object, "id", path, report).and_then(|(id, id_path)| {
            let ok = check_len(id, 1, self.schema.max_id_len, &id_path, report)
                && check_pattern(
                    id,
                    id_pattern(),
                    "id may only contain ASCII letters and digits",
                    &id_path,
                    report,
                );
            ok.then(|| id.to_string())
        });

        let title =
            required_string(object, "title", path, report).and_then(|(title, title_path)| {
                let ok = check_len(title, 1, self.schema.max_title_len, &title_path, report)
                    && check_pattern(
                        title,
                        title_pattern(),
                        "title may only use Latin or Cyrillic letters, digits and punctuation",
                        &title_path,
                        report,
                    );
                ok.then(|| title.to_string())
            });

        let description = optional_string(object, "description", path, report).and_then(
            |(text, text_path)| {
                check_max_len(text, self.schema.max_description_len, &text_path, report)
                    .then(|| text.to_string())
            },
        );

        let source =
            optional_string(object, "source", path, report).and_then(|(text, text_path)| {
                let ok = check_max_len(text, self.schema.max_source_len, &text_path, report)
                    && check_url(text, &text_path, report);
                ok.then(|| text.to_string())
            });

        let last_updated = optional_string(object, "lastUpdated", path, report).and_then(
            |(text, text_path)| check_date(text, &text_path, report).then(|| text.to_string()),
        );

        Some(ChartMetadata {
            id: id?,
            title: title?,
            description,
            source,
            last_updated,
        })
    }

    fn validate_config(
        &self,
        value: &Value,
        path: &str,
        report: &mut ValidationReport,
    ) -> Option<ChartConfig> {
        let object = expect_object(value, path, report)?;

        let responsive = optional_bool(object, "responsive", path, report);
        let maintain_aspect_ratio = optional_bool(object, "maintainAspectRatio", path, report);
        let animation = optional(object, "animation")
            .and_then(|value| self.validate_animation(value, &child(path, "animation"), report));
        let colors = optional(object, "colors")
            .and_then(|value| self.validate_colors(value, &child(path, "colors"), report));

        Some(ChartConfig {
            responsive,
            maintain_aspect_ratio,
            animation,
            colors,
        })
    }

    fn validate_animation(
        &self,
        value: &Value,
        path: &str,
        report: &mut ValidationReport,
    ) -> Option<AnimationConfig> {
        let object = expect_object(value, path, report)?;

        let duration = optional(object, "duration").and_then(|value| {
            let duration_path = child(path, "duration");
            let Some(ms) = value.as_f64() else {
                report.error(
                    duration_path,
                    "invalid_type",
                    format!("expected number, received {}", type_name(value)),
                );
                return None;
            };
            if ms < 0.0 {
                report.error(duration_path, "too_small", "duration must be at least 0");
                return None;
            }
            if ms > self.schema.max_animation_ms {
                report.error(
                    duration_path,
                    "too_big",
                    format!("duration must be at most {}", self.schema.max_animation_ms),
                );
                return None;
            }
            Some(ms)
        });

        let easing =
            optional_string(object, "easing", path, report).and_then(|(name, easing_path)| {
                let easing = Easing::from_name(name);
                if easing.is_none() {
                    let expected: Vec<_> =
                        Easing::ALL.iter().map(|easing| easing.as_str()).collect();
                    report.error(
                        easing_path,
                        "invalid_enum_value",
                        format!("expected one of {}, received '{name}'", expected.join(", ")),
                    );
                }
                easing
            });

        Some(AnimationConfig { duration, easing })
    }

    fn validate_colors(
        &self,
        value: &Value,
        path: &str,
        report: &mut ValidationReport,
    ) -> Option<Vec<String>> {
        let Some(items) = value.as_array() else {
            report.error(
                path,
                "invalid_type",
                format!("expected array, received {}", type_name(value)),
            );
            return None;
        };
        if items.len() > self.schema.max_colors {
            report.error(
                path,
                "too_big",
                format!("at most {} colors are allowed", self.schema.max_colors),
            );
            return None;
        }

        let mut colors = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let color_path = child(path, idx);
            match item.as_str() {
                Some(color) if color_pattern().is_match(color) => colors.push(color.to_string()),
                Some(color) => report.error(
                    color_path,
                    "invalid_string",
                    format!("'{color}' is not a 3- or 6-digit hex color"),
                ),
                None => report.error(
                    color_path,
                    "invalid_type",
                    format!("expected string, received {}", type_name(item)),
                ),
            }
        }
        Some(colors)
    }
}

fn sanitize_payload_text(payload: &mut ChartPayload) {
    for row in &mut payload.data {
        for value in row.values_mut() {
            if let DataValue::Text(text) = value {
                *text = sanitize_tooltip_content(text);
            }
        }
    }
    if let Some(description) = payload
        .metadata
        .as_mut()
        .and_then(|metadata| metadata.description.as_mut())
    {
        *description = sanitize_tooltip_content(description);
    }
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").expect("id regex"))
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^[\p{Latin}\p{Cyrillic}0-9\s\-_.,:;!?()'"/%&]+$"#).expect("title regex")
    })
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#?(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("color regex")
    })
}

/// Optional keys treat an explicit `null` like an absent key.
fn optional<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    report: &mut ValidationReport,
) -> Option<&'a Map<String, Value>> {
    let object = value.as_object();
    if object.is_none() {
        report.error(
            path,
            "invalid_type",
            format!("expected object, received {}", type_name(value)),
        );
    }
    object
}

fn required_string<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
) -> Option<(&'a str, String)> {
    let field = child(path, key);
    match object.get(key) {
        None | Some(Value::Null) => {
            report.error(field, "required", format!("{key} is required"));
            None
        }
        Some(Value::String(text)) => Some((text.as_str(), field)),
        Some(other) => {
            report.error(
                field,
                "invalid_type",
                format!("expected string, received {}", type_name(other)),
            );
            None
        }
    }
}

fn optional_string<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
) -> Option<(&'a str, String)> {
    let field = child(path, key);
    match optional(object, key)? {
        Value::String(text) => Some((text.as_str(), field)),
        other => {
            report.error(
                field,
                "invalid_type",
                format!("expected string, received {}", type_name(other)),
            );
            None
        }
    }
}

fn optional_bool(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
) -> Option<bool> {
    let value = optional(object, key)?;
    let flag = value.as_bool();
    if flag.is_none() {
        report.error(
            child(path, key),
            "invalid_type",
            format!("expected boolean, received {}", type_name(value)),
        );
    }
    flag
}

fn check_len(
    text: &str,
    min: usize,
    max: usize,
    path: &str,
    report: &mut ValidationReport,
) -> bool {
    if text.chars().count() < min {
        report.error(
            path,
            "too_small",
            format!("must contain at least {min} character(s)"),
        );
        return false;
    }
    check_max_len(text, max, path, report)
}

fn check_max_len(text: &str, max: usize, path: &str, report: &mut ValidationReport) -> bool {
    let len = text.chars().count();
    if len > max {
        report.error(
            path,
            "too_big",
            format!("must contain at most {max} character(s), received {len}"),
        );
        return false;
    }
    true
}

fn check_pattern(
    text: &str,
    pattern: &Regex,
    message: &str,
    path: &str,
    report: &mut ValidationReport,
) -> bool {
    if pattern.is_match(text) {
        true
    } else {
        report.error(path, "invalid_string", message);
        false
    }
}

/// Absolute `http`/`https` URLs only.
fn check_url(text: &str, path: &str, report: &mut ValidationReport) -> bool {
    let message = match url::Url::parse(text) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => return true,
        Ok(url) => format!("url scheme '{}' is not allowed, expected http or https", url.scheme()),
        Err(err) => format!("invalid url: {err}"),
    };
    report.error(path, "invalid_url", message);
    false
}

fn check_date(text: &str, path: &str, report: &mut ValidationReport) -> bool {
    let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok();
    if !parsed {
        report.error(
            path,
            "invalid_date",
            format!("'{text}' is not an ISO-8601 date"),
        );
    }
    parsed
}

fn child(base: &str, key: impl Display) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

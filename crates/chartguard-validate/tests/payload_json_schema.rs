use chartguard_validate::{chart_payload_json_schema, validate_chart_data};
use jsonschema::JSONSchema;
use serde_json::json;

#[test]
fn json_schema_describes_payload_sections() {
    let schema = serde_json::to_value(chart_payload_json_schema()).expect("serialize schema");
    let properties = &schema["properties"];
    assert!(properties.get("data").is_some());
    assert!(properties.get("metadata").is_some());
    assert!(properties.get("config").is_some());
    assert_eq!(schema["required"], json!(["data"]));
}

#[test]
fn normalized_payload_conforms_to_emitted_schema() {
    let schema = serde_json::to_value(chart_payload_json_schema()).expect("serialize schema");
    let compiled = JSONSchema::compile(&schema).expect("compile emitted schema");

    let outcome = validate_chart_data(&json!({
        "data": [
            { "opstina": "Zemun", "pm10": 41.2, "prekoracenje": true, "datum": "2024-11-02" },
            { "opstina": "Čukarica", "pm10": null }
        ],
        "metadata": {
            "id": "aqbg",
            "title": "Kvalitet vazduha - Beograd",
            "source": "https://data.gov.rs/sr/datasets/kvalitet-vazduha/",
            "lastUpdated": "2024-11-03"
        },
        "config": {
            "responsive": true,
            "animation": { "duration": 750, "easing": "easeOutQuad" },
            "colors": ["#1d4ed8", "#f97316"]
        }
    }));

    let payload = outcome.into_result().expect("payload is valid");
    let normalized = serde_json::to_value(&payload).expect("serialize payload");
    assert!(compiled.is_valid(&normalized));
}

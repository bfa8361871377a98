use chartguard_core::Error;
use chartguard_validate::{
    sanitize_chart_label, sanitize_file_name, sanitize_tooltip_content, sanitize_url, UrlPolicy,
};

fn gov_policy() -> UrlPolicy {
    UrlPolicy::new(["data.gov.rs"], true)
}

#[test]
fn label_strips_script_and_keeps_text() {
    assert_eq!(sanitize_chart_label("<script>alert(1)</script>Hello"), "Hello");
}

#[test]
fn label_keeps_span_with_style() {
    let cleaned = sanitize_chart_label(r#"<span style="color:red" id="x">Rast</span><br>"#);
    assert_eq!(cleaned, r#"<span style="color:red">Rast</span><br>"#);
}

#[test]
fn tooltip_removes_all_markup() {
    let cleaned = sanitize_tooltip_content(
        r#"<span class="v"><em>12%</em></span> <img src=x onerror=alert(1)>"#,
    );
    assert_eq!(cleaned, "12%");
}

#[test]
fn tooltip_sanitizing_is_idempotent() {
    let samples = [
        "plain text",
        "  padded  ",
        "<b>bold</b> & <i>italic</i>",
        "a < b > c",
        "&lt;script&gt;alert(1)&lt;/script&gt;",
        "<script>alert(1)</script>Hello",
        "Ниш &amp; Нови Сад",
        "<div><p>nested <span>tags</span></p></div>",
        "<!-- comment -->visible",
        "\u{a0}non-breaking\u{a0}",
        "broken <b",
        "",
    ];
    for sample in samples {
        let once = sanitize_tooltip_content(sample);
        let twice = sanitize_tooltip_content(&once);
        assert_eq!(once, twice, "not idempotent for {sample:?}");
    }
}

#[test]
fn file_name_traversal_is_neutralized() {
    let cleaned = sanitize_file_name("../../etc/passwd").expect("usable name remains");
    assert!(!cleaned.contains(".."));
    assert!(!cleaned.contains('/'));
    assert!(!cleaned.contains('\\'));
    assert_eq!(cleaned, "etcpasswd");

    let cleaned = sanitize_file_name("..\\..\\windows\\system32").expect("usable name remains");
    assert!(!cleaned.contains(".."));
    assert!(!cleaned.contains('\\'));
}

#[test]
fn file_name_without_usable_chars_fails() {
    assert!(matches!(sanitize_file_name("../"), Err(Error::InvalidFileName(_))));
}

#[test]
fn blank_file_names_fail() {
    for input in ["   ", ". .. .", "\u{3000}"] {
        assert!(
            matches!(sanitize_file_name(input), Err(Error::InvalidFileName(_))),
            "expected rejection for {input:?}"
        );
    }
}

#[test]
fn allowed_url_is_returned_unchanged() {
    assert_eq!(
        sanitize_url("https://data.gov.rs/path", &gov_policy()).expect("allowed url"),
        "https://data.gov.rs/path"
    );
}

#[test]
fn subdomain_url_is_allowed() {
    assert_eq!(
        sanitize_url("https://api.data.gov.rs/v1?q=budzet", &gov_policy()).expect("allowed url"),
        "https://api.data.gov.rs/v1?q=budzet"
    );
}

#[test]
fn javascript_url_is_rejected() {
    let err = sanitize_url("javascript:alert(1)", &gov_policy()).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidUrl(_) | Error::SchemeNotAllowed(_)
    ));
}

#[test]
fn relative_url_is_invalid() {
    assert!(matches!(
        sanitize_url("/relative/path", &gov_policy()),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn foreign_domain_is_rejected() {
    assert!(matches!(
        sanitize_url("https://example.com/data.csv", &gov_policy()),
        Err(Error::DomainNotAllowed(host)) if host == "example.com"
    ));
}

#[test]
fn urls_are_canonicalized() {
    assert_eq!(
        sanitize_url("HTTPS://Data.Gov.RS", &gov_policy()).expect("allowed url"),
        "https://data.gov.rs/"
    );
}

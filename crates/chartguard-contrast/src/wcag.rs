use std::fmt;
use std::str::FromStr;

use chartguard_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

pub const AA_NORMAL: f64 = 4.5;
pub const AA_LARGE: f64 = 3.0;
pub const AAA_NORMAL: f64 = 7.0;
pub const AAA_LARGE: f64 = 4.5;

/// Perceived brightness above which a background counts as light.
const LIGHT_BRIGHTNESS: f64 = 155.0;

/// WCAG conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WcagLevel {
    #[default]
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

/// Text size category; large is >= 18pt, or >= 14pt bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    Large,
}

impl FromStr for WcagLevel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "AA" => Ok(WcagLevel::Aa),
            "AAA" => Ok(WcagLevel::Aaa),
            _ => Err(Error::InvalidInput(format!(
                "unknown WCAG level '{value}' (expected AA or AAA)"
            ))),
        }
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WcagLevel::Aa => f.write_str("AA"),
            WcagLevel::Aaa => f.write_str("AAA"),
        }
    }
}

impl FromStr for TextSize {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "normal" => Ok(TextSize::Normal),
            "large" => Ok(TextSize::Large),
            _ => Err(Error::InvalidInput(format!(
                "unknown text size '{value}' (expected normal or large)"
            ))),
        }
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSize::Normal => f.write_str("normal"),
            TextSize::Large => f.write_str("large"),
        }
    }
}

/// Outcome of a compliance check for one foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastResult {
    pub ratio: f64,
    #[serde(rename = "passesAA")]
    pub passes_aa: bool,
    #[serde(rename = "passesAAA")]
    pub passes_aaa: bool,
    /// Result for the requested level.
    pub passes: bool,
    pub level: WcagLevel,
    pub size: TextSize,
}

/// Minimum contrast ratio required for a level and text size.
pub fn threshold(level: WcagLevel, size: TextSize) -> f64 {
    match (level, size) {
        (WcagLevel::Aa, TextSize::Normal) => AA_NORMAL,
        (WcagLevel::Aa, TextSize::Large) => AA_LARGE,
        (WcagLevel::Aaa, TextSize::Normal) => AAA_NORMAL,
        (WcagLevel::Aaa, TextSize::Large) => AAA_LARGE,
    }
}

/// WCAG relative luminance of a hex color, in [0, 1].
pub fn relative_luminance(color: &str) -> Result<f64> {
    Ok(luminance(HexColor::parse(color)?))
}

/// Contrast ratio between two hex colors, in [1, 21]. Order does not matter.
pub fn contrast_ratio(foreground: &str, background: &str) -> Result<f64> {
    let fg = HexColor::parse(foreground)?;
    let bg = HexColor::parse(background)?;
    Ok(ratio(fg, bg))
}

/// Check a color pair against the threshold for `level` and `size`.
pub fn check_compliance(
    foreground: &str,
    background: &str,
    level: WcagLevel,
    size: TextSize,
) -> Result<ContrastResult> {
    let ratio = contrast_ratio(foreground, background)?;
    Ok(evaluate(ratio, level, size))
}

/// Quick brightness heuristic for picking a foreground; not a WCAG check.
pub fn is_light_color(color: &str) -> Result<bool> {
    let color = HexColor::parse(color)?;
    Ok(brightness(color) > LIGHT_BRIGHTNESS)
}

/// Black text on light backgrounds, white text otherwise.
pub fn suggest_text_color(background: &str) -> Result<&'static str> {
    if is_light_color(background)? {
        Ok("#000000")
    } else {
        Ok("#FFFFFF")
    }
}

pub(crate) fn evaluate(ratio: f64, level: WcagLevel, size: TextSize) -> ContrastResult {
    ContrastResult {
        ratio,
        passes_aa: ratio >= threshold(WcagLevel::Aa, size),
        passes_aaa: ratio >= threshold(WcagLevel::Aaa, size),
        passes: ratio >= threshold(level, size),
        level,
        size,
    }
}

pub(crate) fn ratio(a: HexColor, b: HexColor) -> f64 {
    let la = luminance(a);
    let lb = luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

fn luminance(color: HexColor) -> f64 {
    let [r, g, b] = color.channels().map(linearize);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn brightness(color: HexColor) -> f64 {
    (299.0 * f64::from(color.r) + 587.0 * f64::from(color.g) + 114.0 * f64::from(color.b))
        / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn luminance_of_extremes() {
        assert_eq!(relative_luminance("#000000").unwrap(), 0.0);
        assert!(approx(relative_luminance("#ffffff").unwrap(), 1.0, 1e-12));
    }

    #[test]
    fn luminance_uses_linear_segment_for_dark_channels() {
        // 10/255 is below the 0.03928 knee
        let expected = 0.2126 * (10.0 / 255.0 / 12.92);
        assert!(approx(relative_luminance("#0a0000").unwrap(), expected, 1e-12));
    }

    #[test]
    fn known_pair_ratio() {
        // #767676 on white is the classic 4.54:1 AA boundary gray
        let ratio = contrast_ratio("#767676", "#ffffff").unwrap();
        assert!(approx(ratio, 4.54, 0.01), "ratio was {ratio}");
    }

    #[test]
    fn thresholds_match_wcag_table() {
        assert_eq!(threshold(WcagLevel::Aa, TextSize::Normal), 4.5);
        assert_eq!(threshold(WcagLevel::Aa, TextSize::Large), 3.0);
        assert_eq!(threshold(WcagLevel::Aaa, TextSize::Normal), 7.0);
        assert_eq!(threshold(WcagLevel::Aaa, TextSize::Large), 4.5);
    }

    #[test]
    fn large_text_relaxes_thresholds() {
        // ~4.54:1 fails AAA normal but passes AAA large
        let normal = check_compliance("#767676", "#fff", WcagLevel::Aaa, TextSize::Normal).unwrap();
        let large = check_compliance("#767676", "#fff", WcagLevel::Aaa, TextSize::Large).unwrap();
        assert!(!normal.passes);
        assert!(normal.passes_aa);
        assert!(large.passes);
        assert!(large.passes_aaa);
    }

    #[test]
    fn light_color_heuristic() {
        assert!(is_light_color("#ffffff").unwrap());
        assert!(is_light_color("#ffff00").unwrap());
        assert!(!is_light_color("#000000").unwrap());
        assert!(!is_light_color("#0000ff").unwrap());
        // brightness of #9b9b9b is exactly 155, which is not light
        assert!(!is_light_color("#9b9b9b").unwrap());
        assert!(is_light_color("#9c9c9c").unwrap());
    }

    #[test]
    fn suggests_readable_text_color() {
        assert_eq!(suggest_text_color("#f5f5f5").unwrap(), "#000000");
        assert_eq!(suggest_text_color("#1e3a8a").unwrap(), "#FFFFFF");
    }

    #[test]
    fn malformed_color_is_invalid_input() {
        let err = relative_luminance("#zzzzzz").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(contrast_ratio("#fff", "nope").is_err());
        assert!(is_light_color("").is_err());
    }

    #[test]
    fn level_and_size_parse_case_insensitively() {
        assert_eq!("aaa".parse::<WcagLevel>().unwrap(), WcagLevel::Aaa);
        assert_eq!("Large".parse::<TextSize>().unwrap(), TextSize::Large);
        assert!("A".parse::<WcagLevel>().is_err());
    }

    #[test]
    fn result_serializes_with_wcag_field_names() {
        let result = evaluate(21.0, WcagLevel::Aaa, TextSize::Normal);
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["passesAA"], true);
        assert_eq!(json["passesAAA"], true);
        assert_eq!(json["level"], "AAA");
        assert_eq!(json["size"], "normal");
    }
}

//! WCAG 2.x color accessibility evaluation.
//!
//! Computes relative luminance and contrast ratios for hex colors and checks
//! them against the AA/AAA thresholds for normal and large text. Malformed
//! colors are rejected with `Error::InvalidInput` instead of propagating NaN.

pub mod color;
pub mod palette;
pub mod wcag;

pub use color::HexColor;
pub use palette::{audit_palette, PaletteAudit, PaletteEntry};
pub use wcag::{
    check_compliance, contrast_ratio, is_light_color, relative_luminance, suggest_text_color,
    threshold, ContrastResult, TextSize, WcagLevel,
};

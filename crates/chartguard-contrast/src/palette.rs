use serde::{Deserialize, Serialize};

use chartguard_core::Result;

use crate::color::HexColor;
use crate::wcag::{evaluate, ratio, ContrastResult, TextSize, WcagLevel};

/// Contrast of one palette color against the chart background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub index: usize,
    /// Normalized `#rrggbb` form of the input color.
    pub color: String,
    pub result: ContrastResult,
}

/// Per-color compliance report for a chart palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteAudit {
    pub background: String,
    pub entries: Vec<PaletteEntry>,
    /// Indices of entries that miss the requested threshold.
    pub failing: Vec<usize>,
}

impl PaletteAudit {
    pub fn all_pass(&self) -> bool {
        self.failing.is_empty()
    }

    /// Lowest ratio in the palette, `None` for an empty palette.
    pub fn min_ratio(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|entry| entry.result.ratio)
            .reduce(f64::min)
    }
}

/// Evaluate every palette color against `background`.
///
/// The first malformed color aborts the audit with `Error::InvalidInput`.
pub fn audit_palette<S: AsRef<str>>(
    colors: &[S],
    background: &str,
    level: WcagLevel,
    size: TextSize,
) -> Result<PaletteAudit> {
    let bg = HexColor::parse(background)?;
    let mut entries = Vec::with_capacity(colors.len());
    let mut failing = Vec::new();

    for (index, color) in colors.iter().enumerate() {
        let fg = HexColor::parse(color.as_ref())?;
        let result = evaluate(ratio(fg, bg), level, size);
        if !result.passes {
            failing.push(index);
        }
        entries.push(PaletteEntry {
            index,
            color: fg.to_hex(),
            result,
        });
    }

    tracing::debug!(
        event = "palette_audited",
        colors = entries.len(),
        failing = failing.len(),
        level = %level,
        size = %size
    );

    Ok(PaletteAudit {
        background: bg.to_hex(),
        entries,
        failing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_failing_indices() {
        let audit = audit_palette(
            &["#000000", "#eeeeee", "#1d4ed8"],
            "#ffffff",
            WcagLevel::Aa,
            TextSize::Normal,
        )
        .unwrap();

        assert_eq!(audit.entries.len(), 3);
        assert_eq!(audit.failing, vec![1]);
        assert!(!audit.all_pass());
        assert_eq!(audit.background, "#ffffff");
        assert!(audit.min_ratio().unwrap() < 1.5);
    }

    #[test]
    fn empty_palette_passes() {
        let colors: [&str; 0] = [];
        let audit = audit_palette(&colors, "#fff", WcagLevel::Aaa, TextSize::Large).unwrap();
        assert!(audit.all_pass());
        assert_eq!(audit.min_ratio(), None);
    }

    #[test]
    fn malformed_palette_color_aborts() {
        let colors = vec!["#000".to_string(), "blue".to_string()];
        assert!(audit_palette(colors.as_slice(), "#fff", WcagLevel::Aa, TextSize::Normal).is_err());
    }
}

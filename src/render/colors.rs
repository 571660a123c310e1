//! Color handling for grid rendering.
//!
//! Colors are CSS strings, directly usable by Canvas 2D. Row background
//! policies are resolved from the configuration once, not per row per frame.

use std::collections::HashMap;

use crate::types::{Row, RowColorsConfig};

/// A CSS color string (e.g., "#FF0000", "lightgreen")
pub type CssColor = String;

/// RGB color with u8 components for color math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Darken the color by blending with black.
    /// Factor of 0.0 = no change, 1.0 = pure black.
    pub fn darken(self, factor: f64) -> Self {
        Self {
            r: Self::blend_component(self.r, 0, factor),
            g: Self::blend_component(self.g, 0, factor),
            b: Self::blend_component(self.b, 0, factor),
        }
    }

    /// The cast is safe because we clamp to [0, 255] before converting.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        let blended = from + (to - from) * factor.clamp(0.0, 1.0);
        blended.clamp(0.0, 255.0).round() as u8
    }
}

/// Darken a `#RRGGBB` color; other CSS forms are returned unchanged.
pub fn darken_css(color: &str, factor: f64) -> CssColor {
    Rgb::from_hex(color).map_or_else(|| color.to_string(), |rgb| rgb.darken(factor).to_hex())
}

/// Colors used by the paint pipeline (CSS format)
pub mod palette {
    /// Background for rows without a configured color
    pub const DEFAULT_BACKGROUND: &str = "white";

    /// Grid line color
    pub const GRID_LINE: &str = "lightgray";

    /// Cell and header text
    pub const TEXT: &str = "black";

    /// Opaque header band background
    pub const HEADER_BACKGROUND: &str = "#f3f3f3";

    /// Scrollbar track color
    pub const SCROLLBAR_TRACK: &str = "#F5F5F5";

    /// Scrollbar thumb color
    pub const SCROLLBAR_THUMB: &str = "#B4B4B4";

    /// How much the thumb darkens while hovered or dragged
    pub const SCROLLBAR_THUMB_ACTIVE_DARKEN: f64 = 0.25;
}

/// Row background policy, resolved from [`RowColorsConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RowColors {
    /// Every row uses the default background
    #[default]
    None,
    /// Rows cycle through the colors by index
    ByIndex(Vec<CssColor>),
    /// Rows are colored by their display value in one column
    ByColumnValue {
        column: String,
        colors: HashMap<String, CssColor>,
    },
}

impl RowColors {
    /// Resolve a configuration shape into a policy.
    ///
    /// Shapes that cannot be used (an empty list, an empty table, anything
    /// that is neither) resolve to [`RowColors::None`].
    pub fn from_config(config: Option<&RowColorsConfig>) -> Self {
        match config {
            None => Self::None,
            Some(RowColorsConfig::Sequence(colors)) if colors.is_empty() => {
                tracing::warn!("rowColors is an empty list; using the default background");
                Self::None
            }
            Some(RowColorsConfig::Sequence(colors)) => Self::ByIndex(colors.clone()),
            Some(RowColorsConfig::ByColumn(table)) => {
                let mut entries = table.iter();
                let Some((column, colors)) = entries.next() else {
                    tracing::warn!("rowColors names no column; using the default background");
                    return Self::None;
                };
                if table.len() > 1 {
                    tracing::warn!(
                        column = %column,
                        ignored = table.len() - 1,
                        "rowColors names several columns; only the first is used"
                    );
                }
                Self::ByColumnValue {
                    column: column.clone(),
                    colors: colors
                        .iter()
                        .map(|(value, color)| (value.clone(), color.clone()))
                        .collect(),
                }
            }
            Some(RowColorsConfig::Unrecognized(value)) => {
                tracing::warn!(%value, "unrecognized rowColors shape; using the default background");
                Self::None
            }
        }
    }

    /// Background color for data row `row_index`
    pub fn resolve<'a>(&'a self, row_index: usize, row: &Row) -> &'a str {
        match self {
            Self::None => palette::DEFAULT_BACKGROUND,
            Self::ByIndex(colors) => colors
                .get(row_index % colors.len().max(1))
                .map_or(palette::DEFAULT_BACKGROUND, String::as_str),
            Self::ByColumnValue { column, colors } => row
                .get(column)
                .and_then(|value| colors.get(value.display_text().as_ref()))
                .map_or(palette::DEFAULT_BACKGROUND, String::as_str),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{CellValue, GridConfig};
    use test_case::test_case;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn survived_policy() -> RowColors {
        let config: GridConfig = serde_json::from_str(
            r#"{"rowColors": {"Survived": {"0": "pink", "1": "lightgreen"}}}"#,
        )
        .unwrap();
        RowColors::from_config(config.row_colors.as_ref())
    }

    #[test_case(CellValue::Number(1.0), "lightgreen" ; "configured value")]
    #[test_case(CellValue::Number(0.0), "pink" ; "other configured value")]
    #[test_case(CellValue::Number(2.0), "white" ; "unconfigured value")]
    #[test_case(CellValue::Absent, "white" ; "absent value")]
    fn test_by_column_value(value: CellValue, expected: &str) {
        let policy = survived_policy();
        assert_eq!(policy.resolve(0, &row(&[("Survived", value)])), expected);
    }

    #[test]
    fn test_missing_column_key() {
        let policy = survived_policy();
        assert_eq!(policy.resolve(0, &row(&[("Name", "x".into())])), "white");
    }

    #[test]
    fn test_no_config_is_default() {
        let policy = RowColors::from_config(None);
        assert_eq!(policy, RowColors::None);
        assert_eq!(policy.resolve(3, &Row::new()), palette::DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_by_index_cycles() {
        let policy = RowColors::from_config(Some(&RowColorsConfig::Sequence(vec![
            "white".into(),
            "#eee".into(),
        ])));
        assert_eq!(policy.resolve(0, &Row::new()), "white");
        assert_eq!(policy.resolve(1, &Row::new()), "#eee");
        assert_eq!(policy.resolve(4, &Row::new()), "white");
    }

    #[test]
    fn test_unusable_shapes_resolve_to_none() {
        let odd = RowColorsConfig::Unrecognized(serde_json::json!(42));
        assert_eq!(RowColors::from_config(Some(&odd)), RowColors::None);
        let empty = RowColorsConfig::Sequence(Vec::new());
        assert_eq!(RowColors::from_config(Some(&empty)), RowColors::None);
    }

    #[test]
    fn test_darken_css() {
        assert_eq!(darken_css("#FFFFFF", 0.5), "#808080");
        assert_eq!(darken_css("lightgray", 0.5), "lightgray");
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{GridError, Result};

/// Default header band height in content pixels
pub const DEFAULT_HEADER_HEIGHT: f64 = 40.0;
/// Default data row height in content pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 30.0;
/// Default cell font size in pixels
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Default upper bound for a resized column
pub const DEFAULT_MAX_COL_WIDTH: f64 = 1000.0;
/// Default lower bound for a resized column
pub const DEFAULT_MIN_COL_WIDTH: f64 = 20.0;
/// Default scrollbar thickness in content pixels
pub const DEFAULT_SCROLLBAR_THICKNESS: f64 = 20.0;

/// Row color configuration as written by the host.
///
/// Any shape that is neither a list nor a `{column: {value: color}}` table is
/// kept as `Unrecognized` and later resolves to the default background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowColorsConfig {
    /// Colors cycled by row index
    Sequence(Vec<String>),
    /// Colors looked up by the row's value in one column
    ByColumn(BTreeMap<String, BTreeMap<String, String>>),
    /// Anything else
    Unrecognized(serde_json::Value),
}

/// Grid configuration, passed at construction and replaced via `reconfigure`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Width per header name; every displayed header needs an entry
    pub widths: HashMap<String, f64>,
    /// Height of the pinned header band
    pub header_height: f64,
    /// Height of every data row
    pub row_height: f64,
    /// Cell font size in pixels
    pub font_size: f64,
    /// Upper bound for interactive column resizing
    pub max_col_width: f64,
    /// Lower bound for interactive column resizing
    pub min_col_width: f64,
    /// Scrollbar track thickness
    pub scrollbar_thickness: f64,
    /// Optional row background policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_colors: Option<RowColorsConfig>,
    /// Do not scale the drawing transform for pixel density
    pub ignore_dpr: bool,
    /// Baseline pixel ratio override for reproducible output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dpr: Option<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            widths: HashMap::new(),
            header_height: DEFAULT_HEADER_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            max_col_width: DEFAULT_MAX_COL_WIDTH,
            min_col_width: DEFAULT_MIN_COL_WIDTH,
            scrollbar_thickness: DEFAULT_SCROLLBAR_THICKNESS,
            row_colors: None,
            ignore_dpr: false,
            default_dpr: None,
        }
    }
}

impl GridConfig {
    /// Decode a camelCase JSON configuration; unknown keys are ignored.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style helper to set one column width
    #[must_use]
    pub fn with_width(mut self, header: impl Into<String>, width: f64) -> Self {
        self.widths.insert(header.into(), width);
        self
    }

    /// Check numeric ranges.
    ///
    /// Missing widths are not checked here; they surface when the geometry is
    /// computed against a concrete header list.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("headerHeight", self.header_height),
            ("rowHeight", self.row_height),
            ("fontSize", self.font_size),
            ("maxColWidth", self.max_col_width),
            ("minColWidth", self.min_col_width),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !self.scrollbar_thickness.is_finite() || self.scrollbar_thickness < 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "scrollbarThickness must be non-negative, got {}",
                self.scrollbar_thickness
            )));
        }
        if self.min_col_width > self.max_col_width {
            return Err(GridError::InvalidConfig(format!(
                "minColWidth {} exceeds maxColWidth {}",
                self.min_col_width, self.max_col_width
            )));
        }
        if let Some((header, width)) = self
            .widths
            .iter()
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            return Err(GridError::InvalidConfig(format!(
                "width of {header:?} must be a positive number, got {width}"
            )));
        }
        if let Some(dpr) = self.default_dpr {
            if !dpr.is_finite() || dpr <= 0.0 {
                return Err(GridError::InvalidConfig(format!(
                    "defaultDpr must be a positive number, got {dpr}"
                )));
            }
        }
        Ok(())
    }

    /// Clamp a width into `[min_col_width, max_col_width]`
    pub fn clamp_width(&self, width: f64) -> f64 {
        width.max(self.min_col_width).min(self.max_col_width)
    }

    /// Cell font (CSS shorthand)
    pub fn cell_font(&self) -> String {
        format!("{}px Arial", self.font_size)
    }

    /// Header font (CSS shorthand)
    pub fn header_font(&self) -> String {
        format!("bold {}px Arial", self.font_size)
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

    #[test]
    fn test_from_json_camel_case() {
        let config = GridConfig::from_json(
            r#"{
                "widths": {"PassengerId": 100, "Name": 200},
                "headerHeight": 40,
                "rowHeight": 30,
                "fontSize": 16,
                "maxColWidth": 1000,
                "rowColors": {"Survived": {"0": "pink", "1": "lightgreen"}},
                "scrollbarThickness": 20,
                "someFutureOption": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.widths["Name"], 200.0);
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.min_col_width, DEFAULT_MIN_COL_WIDTH);
        assert!(matches!(config.row_colors, Some(RowColorsConfig::ByColumn(_))));
    }

    #[test]
    fn test_row_colors_shapes() {
        let seq: GridConfig = serde_json::from_str(r##"{"rowColors": ["white", "#eee"]}"##).unwrap();
        assert_eq!(
            seq.row_colors,
            Some(RowColorsConfig::Sequence(vec!["white".into(), "#eee".into()]))
        );
        let odd: GridConfig = serde_json::from_str(r#"{"rowColors": 42}"#).unwrap();
        assert!(matches!(
            odd.row_colors,
            Some(RowColorsConfig::Unrecognized(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let config = GridConfig {
            row_height: 0.0,
            ..GridConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidConfig(_))
        ));

        let config = GridConfig {
            min_col_width: 500.0,
            max_col_width: 100.0,
            ..GridConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GridConfig::default().with_width("A", -3.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_width() {
        let config = GridConfig::default();
        assert_eq!(config.clamp_width(130.0), 130.0);
        assert_eq!(config.clamp_width(-50.0), DEFAULT_MIN_COL_WIDTH);
        assert_eq!(config.clamp_width(5000.0), DEFAULT_MAX_COL_WIDTH);
    }
}

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::error::{GridError, Result};

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Missing key or JSON `null`
    #[default]
    Absent,
}

static ABSENT: CellValue = CellValue::Absent;

impl CellValue {
    /// Text drawn for this value. Also the key used for row-color lookups.
    ///
    /// Integral numbers print without a fractional part (`1`, not `1.0`).
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(n) => Cow::Owned(format!("{n}")),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Absent => Cow::Borrowed(""),
        }
    }

    /// True for a missing value
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One data record, keyed by header name
pub type Row = HashMap<String, CellValue>;

/// Headers plus rows, as supplied by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = GridError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Self::new(raw.headers, raw.rows)
    }
}

impl Dataset {
    /// Build a dataset, rejecting duplicate header names.
    ///
    /// # Errors
    /// Returns [`GridError::DuplicateHeader`] for the first repeated name.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(GridError::DuplicateHeader(header.clone()));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Decode `{"headers": [...], "rows": [{...}]}`.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or duplicate headers.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Column names in display order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in display order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no columns or no rows to draw
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    /// Value of `header` in data row `row`; absent when either is missing
    pub fn value(&self, row: usize, header: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(header))
            .unwrap_or(&ABSENT)
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
    fn test_from_json_scalars() {
        let dataset = Dataset::from_json(
            r#"{"headers":["Name","Age","Survived","Cabin"],
                "rows":[{"Name":"Braund","Age":22,"Survived":false,"Cabin":null}]}"#,
        )
        .unwrap();
        assert_eq!(dataset.column_count(), 4);
        assert_eq!(dataset.value(0, "Name"), &CellValue::Text("Braund".into()));
        assert_eq!(dataset.value(0, "Age"), &CellValue::Number(22.0));
        assert_eq!(dataset.value(0, "Survived"), &CellValue::Bool(false));
        assert!(dataset.value(0, "Cabin").is_absent());
        assert!(dataset.value(0, "Ticket").is_absent());
        assert!(dataset.value(7, "Name").is_absent());
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let err = Dataset::new(vec!["A".into(), "A".into()], Vec::new()).unwrap_err();
        assert!(matches!(err, GridError::DuplicateHeader(ref h) if h == "A"));
        assert!(Dataset::from_json(r#"{"headers":["A","A"],"rows":[]}"#).is_err());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Number(1.0).display_text(), "1");
        assert_eq!(CellValue::Number(7.25).display_text(), "7.25");
        assert_eq!(CellValue::Bool(true).display_text(), "true");
        assert_eq!(CellValue::Absent.display_text(), "");
    }

    #[test]
    fn test_empty() {
        assert!(Dataset::default().is_empty());
        let headers_only = Dataset::new(vec!["A".into()], Vec::new()).unwrap();
        assert!(headers_only.is_empty());
    }
}

//! Structured error types for datagrid.
//!
//! Every fallible operation in the engine returns [`Result`]; the browser host
//! converts errors into `JsValue` strings at the wasm boundary.

/// All errors that can occur while configuring, laying out or painting a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A header has no entry in the configured `widths` table.
    #[error("No width configured for column {0:?}")]
    MissingWidth(String),

    /// The dataset lists the same header name twice.
    #[error("Duplicate header name {0:?}")]
    DuplicateHeader(String),

    /// A configuration value is outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset or configuration JSON could not be decoded.
    #[error("JSON decoding: {0}")]
    Json(#[from] serde_json::Error),

    /// The drawing surface rejected an operation.
    #[error("Render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_width_names_the_column() {
        let err = GridError::MissingWidth("Fare".to_string());
        assert_eq!(err.to_string(), "No width configured for column \"Fare\"");
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GridError = parse_err.into();
        assert!(matches!(err, GridError::Json(_)));
    }
}

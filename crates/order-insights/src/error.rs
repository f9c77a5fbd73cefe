//! Error types for the order insights library.
//!
//! Loading failures are grouped under [`ParseError`] so the dashboard can show
//! them inline next to the upload control. Everything else goes through
//! [`InsightsError`], which serializes to a `{code, message}` pair for the
//! JSON API.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// Why an uploaded file could not be turned into a dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Upload contained no bytes (or only whitespace).
    #[error("The uploaded file is empty")]
    Empty,

    /// Upload exceeded the configured size limit.
    #[error("Upload is {size} bytes, which exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// The CSV reader rejected the bytes.
    #[error("Malformed CSV: {0}")]
    Malformed(String),

    /// One or more required columns are absent from the header.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A timestamp cell could not be parsed.
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a timestamp")]
    InvalidTimestamp {
        column: String,
        row: usize,
        value: String,
    },

    /// A numeric cell could not be parsed.
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
}

impl ParseError {
    /// Short machine-readable code for the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_UPLOAD",
            Self::TooLarge { .. } => "UPLOAD_TOO_LARGE",
            Self::Malformed(_) => "MALFORMED_CSV",
            Self::MissingColumns(_) => "MISSING_COLUMNS",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::InvalidNumber { .. } => "INVALID_NUMBER",
        }
    }
}

/// The main error type for the library.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Upload could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A page that needs data was requested without a dataset.
    #[error("No data loaded")]
    NoDataLoaded,

    /// Page name or slug did not match any known page.
    #[error("Unknown page '{0}'")]
    UnknownPage(String),

    /// Chart or document rendering failed.
    #[error("Failed to render: {0}")]
    Render(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightsError>,
    },
}

impl InsightsError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for API clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::UnknownPage(_) => "UNKNOWN_PAGE",
            Self::Render(_) => "RENDER_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error came from user input rather than a fault in the
    /// application.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Parse(_) | Self::NoDataLoaded | Self::UnknownPage(_) => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

impl Serialize for InsightsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, InsightsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightsError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(InsightsError::NoDataLoaded.error_code(), "NO_DATA_LOADED");
        assert_eq!(
            InsightsError::ColumnNotFound("seller_id".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            InsightsError::from(ParseError::Empty).error_code(),
            "EMPTY_UPLOAD"
        );
    }

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = ParseError::MissingColumns(vec!["review_score".into(), "product_id".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required column(s): review_score, product_id"
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err = InsightsError::from(ParseError::InvalidTimestamp {
            column: "order_approved_at".into(),
            row: 3,
            value: "yesterday".into(),
        });
        assert!(err.to_string().starts_with("Row 3:"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = InsightsError::UnknownPage("settings".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNKNOWN_PAGE"));
        assert!(json.contains("settings"));
    }

    #[test]
    fn test_with_context() {
        let error = InsightsError::ColumnNotFound("freight_value".to_string())
            .with_context("While aggregating sellers");
        assert!(error.to_string().contains("While aggregating sellers"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(!error.is_user_error());
    }
}

//! Error types for the gallery feed pipeline.
//!
//! - [`CsvError`] - reading and parsing the product CSV
//! - [`TransformError`] - turning a row into a product
//! - [`WriteError`] - writing the JSON document
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading the product CSV.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The input file does not exist or cannot be opened.
    #[error("Cannot open input '{}': {source}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failure after the source was opened.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// No header row.
    #[error("CSV input is empty (no header row)")]
    EmptySource,

    /// The same column name appears twice in the header.
    #[error("Duplicate column '{name}' in header")]
    DuplicateHeader { name: String },

    /// A data row whose field count differs from the header.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Input bytes are not valid in the selected encoding.
    #[error("Line {line}: encoding error: {message}")]
    Encoding { line: u64, message: String },

    /// Any other CSV syntax error.
    #[error("Invalid CSV: {0}")]
    Parse(String),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => CsvError::Io(e),
            csv::ErrorKind::Utf8 { err, .. } => CsvError::Encoding {
                line,
                message: err.to_string(),
            },
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => CsvError::MalformedRow {
                line,
                expected: expected_len as usize,
                found: len as usize,
            },
            other => CsvError::Parse(format!("{:?}", other)),
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while mapping a row to a product.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required field is absent from the row.
    #[error("Line {line}: missing required field '{field}'")]
    MissingField { line: u64, field: String },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the JSON document.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The output file cannot be created or written.
    #[error("Cannot write output '{}': {source}", path.display())]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Write or flush failure on a caller-provided writer.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure.
    #[error("JSON error: {0}")]
    Json(serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Row transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Output error.
    #[error("Output error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for output operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptySource;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let transform_err = TransformError::MissingField {
            line: 3,
            field: "title".into(),
        };
        let pipeline_err: PipelineError = transform_err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains("Line 3"));
    }

    #[test]
    fn test_malformed_row_format() {
        let err = CsvError::MalformedRow {
            line: 4,
            expected: 4,
            found: 3,
        };
        assert_eq!(err.to_string(), "Line 4: expected 4 fields, found 3");
    }

    #[test]
    fn test_source_not_found_names_path() {
        let err = CsvError::SourceNotFound {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("missing.csv"));
    }
}

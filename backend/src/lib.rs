//! # Gallery - product CSV to gallery JSON
//!
//! Gallery turns a product spreadsheet export (one row per product, any
//! number of `image*` columns) into the `products.json` feed read by the
//! product gallery front end.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │ products.csv │────▶│   Parser    │────▶│  Transform  │────▶│ products.json │
//! │  (header +   │     │ (Row stream)│     │ (Row→Product│     │ (2-space JSON │
//! │   records)   │     │             │     │   by Schema)│     │    array)     │
//! └──────────────┘     └─────────────┘     └─────────────┘     └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gallery::{convert_file, ConvertOptions};
//!
//! fn main() {
//!     let report = convert_file(&ConvertOptions::default()).unwrap();
//!     println!("Converted {} products", report.products);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Row, Product, Document)
//! - [`parser`] - CSV reading with optional encoding/delimiter detection
//! - [`transform`] - Schema, row mapping and pipeline
//! - [`writer`] - JSON document output
//! - [`logs`] - Run log

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod writer;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError,
    TransformError,
    WriteError,
    PipelineError,
    PipelineResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Row, Product, Document};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    open_source,
    read_rows,
    parse_str,
    detect_encoding,
    detect_delimiter,
    decode_content,
    decode_detected,
    InputEncoding,
    RaggedRows,
    ReaderOptions,
    Rows,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    Schema,
    row_to_product,
    convert_file,
    convert_reader,
    read_products,
    read_all_rows,
    ConvertOptions,
    ConvertReport,
    DEFAULT_INPUT,
    DEFAULT_OUTPUT,
};

// =============================================================================
// Re-exports - Writer
// =============================================================================

pub use writer::{write_document, write_document_file, document_to_string};

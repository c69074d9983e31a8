//! High-level conversion API: CSV in, gallery JSON out.
//!
//! Every row is transformed before the output is opened, so a failing run
//! never creates or truncates the output file.
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery::{convert_file, ConvertOptions};
//!
//! let report = convert_file(&ConvertOptions::default())?;
//! println!("Wrote {} products", report.products);
//! ```

use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{Document, Row};
use crate::parser::{open_source, read_rows, ReaderOptions, Rows};
use crate::writer::{write_document, write_document_file};

use super::schema::Schema;

/// Input read when none is given
pub const DEFAULT_INPUT: &str = "products.csv";

/// Output written when none is given
pub const DEFAULT_OUTPUT: &str = "products.json";

/// Options for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// CSV file, or `-` for stdin
    pub input: PathBuf,
    /// JSON file, or `-` for stdout
    pub output: PathBuf,
    pub reader: ReaderOptions,
    pub schema: Schema,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            reader: ReaderOptions::default(),
            schema: Schema::default(),
        }
    }
}

/// Summary of a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    /// Products written, one per data row
    pub products: usize,
    /// Image references across all products
    pub images: usize,
    /// Header columns matching the image prefix
    pub image_columns: Vec<String>,
    /// Rows accepted despite a field count mismatch
    pub ragged_rows: usize,
}

impl ConvertReport {
    pub fn summary(&self) -> String {
        format!(
            "{} products, {} images from {} image column(s)",
            self.products,
            self.images,
            self.image_columns.len()
        )
    }
}

/// Transform every row of `rows`, stopping at the first failure.
pub fn read_products<R: Read>(rows: &mut Rows<R>, schema: &Schema) -> PipelineResult<Document> {
    let mut products = Document::new();
    for row in rows {
        let row = row?;
        products.push(schema.to_product(&row)?);
    }
    Ok(products)
}

/// Read and transform all rows, logging header information on the way.
fn collect_document<R: Read>(
    mut rows: Rows<R>,
    schema: &Schema,
) -> PipelineResult<(Document, ConvertReport)> {
    let headers = rows.headers().to_vec();
    log_info(format!("📋 CSV has {} columns:", headers.len()));
    for (i, col) in headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    for field in schema.missing_columns(&headers) {
        log_warning(format!("Header has no '{}' column", field));
    }

    let image_columns: Vec<String> = schema
        .image_columns(&headers)
        .into_iter()
        .map(str::to_string)
        .collect();
    if image_columns.is_empty() {
        log_warning(format!("No columns start with '{}'", schema.image_prefix));
    }

    log_info("⚙️  Transforming rows...");
    let products = read_products(&mut rows, schema)?;

    let report = ConvertReport {
        products: products.len(),
        images: products.iter().map(|p| p.images.len()).sum(),
        image_columns,
        ragged_rows: rows.ragged_count(),
    };
    Ok((products, report))
}

fn open_input(path: &Path, options: &ReaderOptions) -> PipelineResult<Rows<Box<dyn Read>>> {
    if path == Path::new("-") {
        return Ok(read_rows(io::stdin().lock(), options)?);
    }
    Ok(open_source(path, options)?)
}

/// Convert CSV from `source` into a JSON document written to `sink`.
pub fn convert_reader<R: Read, W: Write>(
    source: R,
    sink: W,
    reader: &ReaderOptions,
    schema: &Schema,
) -> PipelineResult<ConvertReport> {
    let rows = read_rows(source, reader)?;
    let (products, report) = collect_document(rows, schema)?;
    write_document(sink, &products)?;
    Ok(report)
}

/// Convert the CSV file named in `options` into its JSON document.
///
/// 1. Open the input and read the header
/// 2. Transform every row into a product
/// 3. Write the document in one pass
pub fn convert_file(options: &ConvertOptions) -> PipelineResult<ConvertReport> {
    log_info(format!("📖 Reading {}", options.input.display()));
    let rows = open_input(&options.input, &options.reader)?;
    let (products, report) = collect_document(rows, &options.schema)?;
    if report.ragged_rows > 0 {
        log_warning(format!("{} ragged rows accepted", report.ragged_rows));
    }
    log_success(format!("Transformed {} products", report.products));

    write_document_file(&options.output, &products)?;
    log_success(format!("💾 Wrote {}", options.output.display()));
    log_info(report.summary());

    Ok(report)
}

/// Read every row of a CSV file without transforming it.
pub fn read_all_rows(path: &Path, options: &ReaderOptions) -> PipelineResult<(Vec<String>, Vec<Row>)> {
    let mut rows = open_input(path, options)?;
    let headers = rows.headers().to_vec();
    let records = rows.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((headers, records))
}

//! JSON document writer.
//!
//! Documents are pretty-printed by serde_json: two spaces per nesting
//! level, one value per line, keys in struct declaration order. Files get
//! no trailing newline; stdout (`-`) gets one.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{WriteError, WriteResult};
use crate::models::Product;

/// Split a serde_json error into its I/O cause or a serialization failure.
fn json_error(err: serde_json::Error, on_io: impl FnOnce(io::Error) -> WriteError) -> WriteError {
    if err.is_io() {
        on_io(io::Error::from(err))
    } else {
        WriteError::Json(err)
    }
}

/// Write the products as a pretty-printed JSON array, then flush `writer`.
pub fn write_document<W: Write>(mut writer: W, products: &[Product]) -> WriteResult<()> {
    serde_json::to_writer_pretty(&mut writer, products).map_err(|e| json_error(e, WriteError::Io))?;
    writer.flush()?;
    Ok(())
}

/// Render the products as a pretty-printed JSON array.
pub fn document_to_string(products: &[Product]) -> WriteResult<String> {
    serde_json::to_string_pretty(products).map_err(WriteError::Json)
}

/// Write the products to `path`, or to stdout when `path` is `-`.
pub fn write_document_file(path: &Path, products: &[Product]) -> WriteResult<()> {
    write_json_file(path, products)
}

/// Pretty-print any serializable value to `path`, or to stdout when `path` is `-`.
///
/// The file is created or truncated, written in one pass and flushed before
/// returning, so a failed flush is reported rather than lost on drop.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> WriteResult<()> {
    if path == Path::new("-") {
        let stdout = io::stdout();
        return write_pretty(stdout.lock(), value, path, true);
    }

    let file = File::create(path).map_err(|source| WriteError::SinkWrite {
        path: path.to_path_buf(),
        source,
    })?;
    write_pretty(BufWriter::new(file), value, path, false)
}

/// Serialize into `out` and flush it; I/O failures are reported against `path`.
fn write_pretty<W: Write, T: Serialize + ?Sized>(
    mut out: W,
    value: &T,
    path: &Path,
    trailing_newline: bool,
) -> WriteResult<()> {
    let sink_error = |source: io::Error| WriteError::SinkWrite {
        path: path.to_path_buf(),
        source,
    };

    serde_json::to_writer_pretty(&mut out, value).map_err(|e| json_error(e, sink_error))?;
    if trailing_newline {
        writeln!(out).map_err(sink_error)?;
    }
    out.flush().map_err(sink_error)
}

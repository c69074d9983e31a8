//! CSV reader producing header-keyed rows.
//!
//! The common case (UTF-8, known delimiter) streams records straight from
//! the source. Encoding or delimiter detection needs the whole input, so
//! those modes read it into memory first and iterate the decoded text.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use crate::error::{CsvError, CsvResult};
use crate::logs::{log_success, log_warning};
use crate::models::Row;

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Character encoding of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputEncoding {
    #[default]
    Utf8,
    /// Detect with chardet
    Auto,
    Latin1,
    Windows1252,
}

impl InputEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Auto => "auto",
            Self::Latin1 => "iso-8859-1",
            Self::Windows1252 => "windows-1252",
        }
    }
}

impl FromStr for InputEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "auto" => Ok(Self::Auto),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(Self::Latin1),
            "windows-1252" | "cp1252" => Ok(Self::Windows1252),
            other => Err(format!("unsupported encoding '{}'", other)),
        }
    }
}

/// What to do with rows whose field count differs from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaggedRows {
    /// Fail with [`CsvError::MalformedRow`].
    #[default]
    Reject,
    /// Drop extra fields; leave missing trailing fields absent from the row.
    Lenient,
}

/// Reader settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Field delimiter; `None` detects it from the header line.
    pub delimiter: Option<char>,
    pub encoding: InputEncoding,
    pub ragged: RaggedRows,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: Some(','),
            encoding: InputEncoding::Utf8,
            ragged: RaggedRows::Reject,
        }
    }
}

impl ReaderOptions {
    /// Whether the input can be read without buffering it whole.
    pub fn is_streaming(&self) -> bool {
        self.encoding == InputEncoding::Utf8 && self.delimiter.is_some()
    }
}

/// Detect the encoding of raw bytes using chardet.
///
/// Unknown charsets fall back to UTF-8, decoded lossily.
pub fn detect_encoding(bytes: &[u8]) -> InputEncoding {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => InputEncoding::Latin1,
        "windows-1252" | "cp1252" => InputEncoding::Windows1252,
        _ => InputEncoding::Utf8,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Explicit UTF-8 is strict; invalid bytes are reported with their line.
pub fn decode_content(bytes: &[u8], encoding: InputEncoding) -> CsvResult<String> {
    let content = match encoding {
        InputEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
            let valid = e.utf8_error().valid_up_to();
            CsvError::Encoding {
                line: line_at(bytes, valid),
                message: e.to_string(),
            }
        })?,
        InputEncoding::Latin1 => encoding_rs::mem::decode_latin1(bytes).into_owned(),
        InputEncoding::Windows1252 => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        InputEncoding::Auto => return decode_detected(bytes, detect_encoding(bytes)),
    };

    Ok(strip_bom(content))
}

/// Decode bytes with an encoding chardet already picked.
///
/// A detected UTF-8 is decoded lossily; replaced bytes are logged.
pub fn decode_detected(bytes: &[u8], detected: InputEncoding) -> CsvResult<String> {
    match detected {
        InputEncoding::Utf8 | InputEncoding::Auto => {
            let content = String::from_utf8_lossy(bytes);
            if let Cow::Owned(_) = content {
                log_warning("Input is not valid UTF-8, invalid bytes replaced with U+FFFD");
            }
            Ok(strip_bom(content.into_owned()))
        }
        explicit => decode_content(bytes, explicit),
    }
}

fn strip_bom(mut content: String) -> String {
    if content.starts_with('\u{feff}') {
        content.drain(..'\u{feff}'.len_utf8());
    }
    content
}

fn line_at(bytes: &[u8], offset: usize) -> u64 {
    bytes[..offset].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Comma wins when no candidate occurs.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Lazy iterator over the data rows of a CSV source.
///
/// The source is owned by the iterator and released when it is dropped.
/// The iterator yields nothing after its first error.
pub struct Rows<R> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    ragged: RaggedRows,
    record: csv::StringRecord,
    ragged_count: usize,
    finished: bool,
}

impl<R: Read> Rows<R> {
    /// Read the header row of `source` and prepare for data rows.
    pub fn new(source: R, delimiter: char, ragged: RaggedRows) -> CsvResult<Self> {
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                CsvError::Parse(format!("delimiter {:?} is not a single ASCII character", delimiter))
            })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(CsvError::EmptySource);
        }
        if let Some(first) = headers.first_mut() {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }

        let mut seen = HashSet::new();
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(CsvError::DuplicateHeader { name: name.clone() });
            }
        }

        Ok(Self {
            reader,
            headers,
            ragged,
            record: csv::StringRecord::new(),
            ragged_count: 0,
            finished: false,
        })
    }

    /// Column names of the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of ragged rows accepted so far under [`RaggedRows::Lenient`].
    pub fn ragged_count(&self) -> usize {
        self.ragged_count
    }

    fn build_row(&mut self) -> CsvResult<Row> {
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        let expected = self.headers.len();
        let found = self.record.len();

        if found != expected {
            match self.ragged {
                RaggedRows::Reject => {
                    return Err(CsvError::MalformedRow { line, expected, found });
                }
                RaggedRows::Lenient => {
                    self.ragged_count += 1;
                    log_warning(format!(
                        "Line {}: {} fields, header has {}",
                        line, found, expected
                    ));
                }
            }
        }

        let fields = self
            .headers
            .iter()
            .zip(self.record.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();

        Ok(Row::new(line, fields))
    }
}

impl<R: Read> Iterator for Rows<R> {
    type Item = CsvResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = match self.reader.read_record(&mut self.record) {
            Ok(true) => self.build_row(),
            Ok(false) => {
                self.finished = true;
                return None;
            }
            Err(e) => Err(e.into()),
        };

        if item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}

/// Build a row iterator over any reader.
///
/// Streams when [`ReaderOptions::is_streaming`] holds, otherwise buffers
/// the input to decode it and detect the delimiter.
pub fn read_rows<'a, R: Read + 'a>(
    mut source: R,
    options: &ReaderOptions,
) -> CsvResult<Rows<Box<dyn Read + 'a>>> {
    if let (true, Some(delimiter)) = (options.is_streaming(), options.delimiter) {
        let source: Box<dyn Read + 'a> = Box::new(source);
        return Rows::new(source, delimiter, options.ragged);
    }

    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;

    let content = match options.encoding {
        InputEncoding::Auto => {
            let detected = detect_encoding(&bytes);
            log_success(format!("Detected encoding: {}", detected.label()));
            decode_detected(&bytes, detected)?
        }
        explicit => decode_content(&bytes, explicit)?,
    };

    let delimiter = match options.delimiter {
        Some(d) => d,
        None => {
            let d = detect_delimiter(&content);
            log_success(format!("Detected delimiter: {}", format_delimiter(d)));
            d
        }
    };

    let source: Box<dyn Read + 'a> = Box::new(Cursor::new(content.into_bytes()));
    Rows::new(source, delimiter, options.ragged)
}

/// Open a CSV file and build a row iterator over it.
pub fn open_source(path: &Path, options: &ReaderOptions) -> CsvResult<Rows<Box<dyn Read>>> {
    let file = File::open(path).map_err(|source| CsvError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(file, options)
}

/// Parse CSV text fully into rows.
pub fn parse_str(content: &str, options: &ReaderOptions) -> CsvResult<Vec<Row>> {
    read_rows(content.as_bytes(), options)?.collect()
}

/// Printable form of a delimiter
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => format!("'{}'", c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> ReaderOptions {
        ReaderOptions {
            ragged: RaggedRows::Lenient,
            ..ReaderOptions::default()
        }
    }

    #[test]
    fn test_simple_csv() {
        let csv = "sku,title\nA1,Widget\nA2,Gadget";
        let rows = parse_str(csv, &ReaderOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("sku"), Some("A1"));
        assert_eq!(rows[0].get("title"), Some("Widget"));
        assert_eq!(rows[1].get("sku"), Some("A2"));
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn test_keys_follow_header_order() {
        let csv = "title,image2,sku,image1\nWidget,b,A1,a";
        let rows = parse_str(csv, &ReaderOptions::default()).unwrap();
        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, vec!["title", "image2", "sku", "image1"]);
    }

    #[test]
    fn test_quoted_values() {
        let csv = "sku,title\n\"A1\",\"Widget, large\"";
        let rows = parse_str(csv, &ReaderOptions::default()).unwrap();
        assert_eq!(rows[0].get("title"), Some("Widget, large"));
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let csv = "sku,title\nA1, Widget ";
        let rows = parse_str(csv, &ReaderOptions::default()).unwrap();
        assert_eq!(rows[0].get("title"), Some(" Widget "));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = "sku,title\nA1,Widget\n\nA2,Gadget\n";
        let rows = parse_str(csv, &ReaderOptions::default()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let rows = parse_str("sku,title,image1\n", &ReaderOptions::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_input_error() {
        let err = parse_str("", &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, CsvError::EmptySource));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = parse_str("sku,image,image\nA1,a,b", &ReaderOptions::default()).unwrap_err();
        match err {
            CsvError::DuplicateHeader { name } => assert_eq!(name, "image"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_row_rejected_by_default() {
        let csv = "sku,title,image1,image2\nA1,Widget,a,b\nA2,Gadget,c";
        let err = parse_str(csv, &ReaderOptions::default()).unwrap_err();
        match err {
            CsvError::MalformedRow { line, expected, found } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_long_row_rejected_by_default() {
        let csv = "sku,title\nA1,Widget,extra";
        let err = parse_str(csv, &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, CsvError::MalformedRow { expected: 2, found: 3, .. }));
    }

    #[test]
    fn test_lenient_truncates_and_leaves_absent() {
        let csv = "sku,title,image1\nA1,Widget,a,extra\nA2";
        let rows = parse_str(csv, &lenient()).unwrap();

        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0].get("image1"), Some("a"));
        assert_eq!(rows[1].get("sku"), Some("A2"));
        assert_eq!(rows[1].get("title"), None);
        assert_eq!(rows[1].get("image1"), None);
    }

    #[test]
    fn test_ragged_count() {
        let csv = "sku,title\nA1\nA2,Gadget\nA3,Thing,x";
        let mut rows = read_rows(csv.as_bytes(), &lenient()).unwrap();
        let collected: Vec<Row> = rows.by_ref().collect::<CsvResult<_>>().unwrap();
        assert_eq!(collected.len(), 3);
        assert_eq!(rows.ragged_count(), 2);
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let csv = "sku,title\nA1\nA2,Gadget";
        let mut rows = read_rows(csv.as_bytes(), &ReaderOptions::default()).unwrap();
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let bytes: &[u8] = b"sku,title\nA1,Soci\xe9t\xe9";
        let err = read_rows(bytes, &ReaderOptions::default())
            .unwrap()
            .collect::<CsvResult<Vec<Row>>>()
            .unwrap_err();
        assert!(matches!(err, CsvError::Encoding { .. }));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, InputEncoding::Latin1).unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_upper_half_is_not_latin9() {
        let decoded = decode_content(&[0xA4, 0xBD, 0xA6, 0xBE], InputEncoding::Latin1).unwrap();
        assert_eq!(decoded, "¤½¦¾");
    }

    #[test]
    fn test_windows1252_euro() {
        let decoded = decode_content(&[0x80, 0x20, 0x31], InputEncoding::Windows1252).unwrap();
        assert_eq!(decoded, "€ 1");
    }

    #[test]
    fn test_detected_utf8_replaces_invalid_bytes() {
        let decoded = decode_detected(b"sku\n\xffA1", InputEncoding::Utf8).unwrap();
        assert_eq!(decoded, "sku\n\u{fffd}A1");
    }

    #[test]
    fn test_detected_utf8_strips_bom() {
        let decoded = decode_detected("\u{feff}sku".as_bytes(), InputEncoding::Utf8).unwrap();
        assert_eq!(decoded, "sku");
    }

    #[test]
    fn test_auto_reads_plain_ascii() {
        let options = ReaderOptions {
            encoding: InputEncoding::Auto,
            ..ReaderOptions::default()
        };
        let rows = parse_str("sku,title\nA1,Widget", &options).unwrap();
        assert_eq!(rows[0].get("title"), Some("Widget"));
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let csv = "\u{feff}sku,title\nA1,Widget";
        let rows = parse_str(csv, &ReaderOptions::default()).unwrap();
        assert_eq!(rows[0].get("sku"), Some("A1"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("sku"), ',');
    }

    #[test]
    fn test_detected_delimiter_used() {
        let options = ReaderOptions {
            delimiter: None,
            ..ReaderOptions::default()
        };
        let rows = parse_str("sku;title\nA1;Widget", &options).unwrap();
        assert_eq!(rows[0].get("title"), Some("Widget"));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let options = ReaderOptions {
            delimiter: Some('§'),
            ..ReaderOptions::default()
        };
        assert!(matches!(parse_str("a", &options), Err(CsvError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = open_source(Path::new("does/not/exist.csv"), &ReaderOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, CsvError::SourceNotFound { .. }));
    }

    #[test]
    fn test_parse_encoding_names() {
        assert_eq!("UTF8".parse::<InputEncoding>(), Ok(InputEncoding::Utf8));
        assert_eq!("cp1252".parse::<InputEncoding>(), Ok(InputEncoding::Windows1252));
        assert!("ebcdic".parse::<InputEncoding>().is_err());
    }
}

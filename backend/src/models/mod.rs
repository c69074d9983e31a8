//! Domain models for the gallery feed.
//!
//! - [`Row`] - one parsed CSV record, keyed by header names
//! - [`Product`] - the gallery record emitted per row
//! - [`Document`] - all products of a run, in source order

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// Row
// =============================================================================

/// One data record of the CSV, keyed by the header's field names.
///
/// Fields keep header order. A field is absent only when a short row was
/// read under the lenient ragged policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: u64,
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new(line: u64, fields: Vec<(String, String)>) -> Self {
        Self { line, fields }
    }

    /// 1-based line number of the record in the source.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Value of `name`, if the row has that field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Field names in header order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// `(name, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as consumed by the gallery front end.
///
/// Field declaration order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub title: String,
    /// Non-empty image references, in header column order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    pub fn new(sku: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            title: title.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }
}

/// The full output artifact.
pub type Document = Vec<Product>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row::new(
            2,
            vec![
                ("sku".into(), "A1".into()),
                ("title".into(), "Widget".into()),
                ("image1".into(), "".into()),
            ],
        )
    }

    #[test]
    fn test_row_lookup() {
        let row = sample_row();
        assert_eq!(row.get("sku"), Some("A1"));
        assert_eq!(row.get("image1"), Some(""));
        assert_eq!(row.get("image2"), None);
        assert_eq!(row.line(), 2);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_row_serializes_in_header_order() {
        let json = serde_json::to_string(&sample_row()).unwrap();
        assert_eq!(json, r#"{"sku":"A1","title":"Widget","image1":""}"#);
    }

    #[test]
    fn test_product_key_order() {
        let product = Product::new("A1", "Widget").with_images(["http://x/1.jpg"]);
        let json = serde_json::to_string(&product).unwrap();
        assert_eq!(
            json,
            r#"{"sku":"A1","title":"Widget","images":["http://x/1.jpg"]}"#
        );
    }

    #[test]
    fn test_product_reads_back_without_images() {
        let product: Product = serde_json::from_str(r#"{"sku":"A3","title":"Thing"}"#).unwrap();
        assert!(product.images.is_empty());
    }
}

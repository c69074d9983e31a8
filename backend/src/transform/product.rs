//! Row to product mapping.

use crate::error::{TransformError, TransformResult};
use crate::models::{Product, Row};

use super::schema::Schema;

impl Schema {
    /// Map a row to a product.
    ///
    /// The required fields are copied verbatim, empty values included.
    /// Image columns contribute their value only when it is non-empty.
    pub fn to_product(&self, row: &Row) -> TransformResult<Product> {
        let sku = required(row, &self.sku_field)?;
        let title = required(row, &self.title_field)?;
        let images = self.images(row);

        Ok(Product::new(sku, title).with_images(images))
    }

    /// Non-empty image values of `row`, in header order.
    pub fn images(&self, row: &Row) -> Vec<String> {
        row.iter()
            .filter(|(name, value)| self.is_image_column(name) && !value.is_empty())
            .map(|(_, value)| value.to_string())
            .collect()
    }
}

fn required<'a>(row: &'a Row, field: &str) -> TransformResult<&'a str> {
    row.get(field).ok_or_else(|| TransformError::MissingField {
        line: row.line(),
        field: field.to_string(),
    })
}

/// Map a row with the default schema.
pub fn row_to_product(row: &Row) -> TransformResult<Product> {
    Schema::default().to_product(row)
}

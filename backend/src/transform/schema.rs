//! Column naming convention of the product CSV.

use serde::{Deserialize, Serialize};

/// Which columns feed a [`crate::models::Product`].
///
/// The output keys are always `sku`, `title` and `images`; only the source
/// column names vary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Required column copied into `sku`.
    pub sku_field: String,
    /// Required column copied into `title`.
    pub title_field: String,
    /// Case-sensitive prefix of the image columns.
    pub image_prefix: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            sku_field: "sku".to_string(),
            title_field: "title".to_string(),
            image_prefix: "image".to_string(),
        }
    }
}

impl Schema {
    /// Required column names, in output order.
    pub fn required_fields(&self) -> [&str; 2] {
        [self.sku_field.as_str(), self.title_field.as_str()]
    }

    pub fn is_image_column(&self, name: &str) -> bool {
        name.starts_with(self.image_prefix.as_str())
    }

    /// Header names that are image columns, in header order.
    pub fn image_columns<'a>(&self, headers: &'a [String]) -> Vec<&'a str> {
        headers
            .iter()
            .map(String::as_str)
            .filter(|name| self.is_image_column(name))
            .collect()
    }

    /// Required columns missing from the header.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        self.required_fields()
            .into_iter()
            .filter(|field| !headers.iter().any(|h| h.as_str() == *field))
            .map(str::to_string)
            .collect()
    }
}

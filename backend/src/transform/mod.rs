//! Transformation module.
//!
//! This module handles CSV row to gallery product transformation:
//! - Schema: which columns feed a product
//! - Product: row to product mapping
//! - Pipeline: reading, transforming and writing a whole file

pub mod pipeline;
pub mod product;
pub mod schema;

pub use pipeline::*;
pub use product::row_to_product;
pub use schema::Schema;

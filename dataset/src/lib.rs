//! FILENAME: dataset/src/lib.rs
//! PURPOSE: Main library entry point for the categorical dataset model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod attribute;
pub mod dataset;
pub mod error;
pub mod schema;

// Re-export commonly used types at the crate root
pub use crate::attribute::{Attribute, AttributeKind, ValueId, Vocabulary};
pub use crate::dataset::{DataValue, Dataset, Record};
pub use crate::error::DatasetError;
pub use crate::schema::Schema;

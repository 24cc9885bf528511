//! FILENAME: crosstab-engine/src/error.rs

use dataset::DatasetError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrosstabError {
    /// Attribute lookup or value validation failed against the schema.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("expected a contingency table over exactly {expected} attributes, got {actual}")]
    AxisCount { expected: usize, actual: usize },

    #[error("attribute list must name between {min} and {max} attributes, got {actual}")]
    AttributeArity { min: usize, max: usize, actual: usize },
}

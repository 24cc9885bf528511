//! FILENAME: dataset/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("unknown attribute: {name}")]
    UnknownAttribute { name: String },

    #[error("attribute {name} is continuous where a categorical attribute is required")]
    NotCategorical { name: String },

    #[error("value {value:?} is not in the vocabulary of attribute {attribute}")]
    UnknownValue { attribute: String, value: String },

    #[error("duplicate attribute name: {name}")]
    DuplicateAttribute { name: String },

    #[error("record has {actual} values but the schema has {expected} attributes")]
    RecordWidth { expected: usize, actual: usize },

    #[error("value {value:?} is not a number for continuous attribute {attribute}")]
    InvalidNumber { attribute: String, value: String },
}

//! FILENAME: dataset/src/schema.rs
//! PURPOSE: Ordered attribute schema with validated by-name lookup.
//! CONTEXT: The schema is established once per dataset and immutable
//! thereafter. One attribute may be designated as the class attribute,
//! which layout consumers use for per-cell value distributions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::DatasetError;

/// An ordered mapping from attribute name to attribute descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,

    /// Map from attribute name to its position (for O(1) lookup).
    index_by_name: HashMap<String, usize>,

    /// Position of the class attribute, if one is designated.
    class_index: Option<usize>,
}

impl Schema {
    /// Creates a schema from an ordered attribute list.
    /// Fails if two attributes share a name.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, DatasetError> {
        let mut index_by_name = HashMap::with_capacity(attributes.len());
        for (index, attribute) in attributes.iter().enumerate() {
            if index_by_name.insert(attribute.name.clone(), index).is_some() {
                return Err(DatasetError::DuplicateAttribute {
                    name: attribute.name.clone(),
                });
            }
        }
        Ok(Schema {
            attributes,
            index_by_name,
            class_index: None,
        })
    }

    /// Creates a schema and designates `class_name` as the class attribute.
    pub fn with_class(
        attributes: Vec<Attribute>,
        class_name: &str,
    ) -> Result<Self, DatasetError> {
        let mut schema = Schema::new(attributes)?;
        let index = schema
            .index_of(class_name)
            .ok_or_else(|| DatasetError::UnknownAttribute {
                name: class_name.to_string(),
            })?;
        schema.class_index = Some(index);
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in schema order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.index_of(name).map(|index| &self.attributes[index])
    }

    pub fn attribute_at(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Resolves an attribute name to its position, requiring it to be
    /// categorical. This is the validated lookup behind every engine entry
    /// point: an absent name or a continuous attribute is a typed error,
    /// never an implicit failure.
    pub fn categorical_index(&self, name: &str) -> Result<usize, DatasetError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| DatasetError::UnknownAttribute {
                name: name.to_string(),
            })?;
        if !self.attributes[index].is_categorical() {
            return Err(DatasetError::NotCategorical {
                name: name.to_string(),
            });
        }
        Ok(index)
    }

    pub fn class_index(&self) -> Option<usize> {
        self.class_index
    }

    pub fn class_attribute(&self) -> Option<&Attribute> {
        self.class_index.map(|index| &self.attributes[index])
    }

    /// Builds a sub-schema containing `names` in the requested order.
    /// The class designation is carried along when the class attribute is
    /// among the selected names.
    pub fn select(&self, names: &[&str]) -> Result<Schema, DatasetError> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let index = self
                .index_of(name)
                .ok_or_else(|| DatasetError::UnknownAttribute {
                    name: name.to_string(),
                })?;
            selected.push(self.attributes[index].clone());
        }
        let mut schema = Schema::new(selected)?;
        if let Some(class) = self.class_attribute() {
            schema.class_index = schema.index_of(&class.name);
        }
        Ok(schema)
    }
}

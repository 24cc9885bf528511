//! FILENAME: dataset/src/attribute.rs
//! PURPOSE: Attribute descriptors and categorical value vocabularies.
//! CONTEXT: A vocabulary is the fixed, ordered domain of a categorical
//! attribute. It is sealed at construction; records refer to its entries
//! by `ValueId` so repeated values are stored once.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Index of a value within its attribute's vocabulary (0-based).
/// Using u32 to save memory in record storage.
pub type ValueId = u32;

// ============================================================================
// VOCABULARY
// ============================================================================

/// The ordered set of values a categorical attribute can take.
///
/// Declaration order is significant: it is the enumeration order used by
/// marginal tables and layout subdivision. Duplicate declarations collapse
/// onto the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Map from value to its ID (for O(1) lookup during record insertion).
    value_to_id: HashMap<String, ValueId>,

    /// Ordered list of values (indexed by ValueId).
    id_to_value: Vec<String>,
}

impl Vocabulary {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Vocabulary {
            value_to_id: HashMap::new(),
            id_to_value: Vec::new(),
        };
        for value in values {
            let value = value.into();
            if vocabulary.value_to_id.contains_key(&value) {
                continue;
            }
            let id = vocabulary.id_to_value.len() as ValueId;
            vocabulary.id_to_value.push(value.clone());
            vocabulary.value_to_id.insert(value, id);
        }
        vocabulary
    }

    /// Looks up the ID of a value, or None if it is not in the vocabulary.
    pub fn id_of(&self, value: &str) -> Option<ValueId> {
        self.value_to_id.get(value).copied()
    }

    /// Looks up the value for a given ID.
    pub fn value_of(&self, id: ValueId) -> Option<&str> {
        self.id_to_value.get(id as usize).map(String::as_str)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.id_to_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_value.is_empty()
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[String] {
        &self.id_to_value
    }
}

// ============================================================================
// ATTRIBUTE
// ============================================================================

/// What kind of variable an attribute is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// A variable over a fixed, finite vocabulary of values.
    Categorical(Vocabulary),
    /// A numeric variable. Present in schemas so that requesting one where
    /// a categorical attribute is required fails with a typed error.
    Continuous,
}

/// A named column of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    kind: AttributeKind,
}

impl Attribute {
    /// Creates a categorical attribute with the given value vocabulary.
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Categorical(Vocabulary::new(values)),
        }
    }

    /// Creates a continuous attribute.
    pub fn continuous(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Continuous,
        }
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, AttributeKind::Categorical(_))
    }

    /// The vocabulary of a categorical attribute, None for continuous.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        match &self.kind {
            AttributeKind::Categorical(vocabulary) => Some(vocabulary),
            AttributeKind::Continuous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_preserves_declaration_order() {
        let vocabulary = Vocabulary::new(["medium", "small", "large"]);
        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.id_of("medium"), Some(0));
        assert_eq!(vocabulary.id_of("small"), Some(1));
        assert_eq!(vocabulary.id_of("large"), Some(2));
        assert_eq!(vocabulary.value_of(2), Some("large"));
    }

    #[test]
    fn test_vocabulary_collapses_duplicates() {
        let vocabulary = Vocabulary::new(["a", "b", "a"]);
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.id_of("a"), Some(0));
    }

    #[test]
    fn test_vocabulary_unknown_value() {
        let vocabulary = Vocabulary::new(["a", "b"]);
        assert_eq!(vocabulary.id_of("c"), None);
        assert_eq!(vocabulary.value_of(7), None);
    }

    #[test]
    fn test_attribute_kinds() {
        let color = Attribute::categorical("color", ["red", "green"]);
        let weight = Attribute::continuous("weight");

        assert!(color.is_categorical());
        assert!(!weight.is_categorical());
        assert_eq!(color.vocabulary().map(Vocabulary::len), Some(2));
        assert!(weight.vocabulary().is_none());
    }
}

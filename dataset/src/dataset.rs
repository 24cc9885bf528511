//! FILENAME: dataset/src/dataset.rs
//! PURPOSE: Record storage for categorical datasets.
//! CONTEXT: Records store one `DataValue` per schema attribute. Categorical
//! cells hold interned vocabulary IDs so repeated values are stored once;
//! missing cells are an explicit variant, not a sentinel or an exception
//! path. Validation happens at insertion: a record that leaves `push_record`
//! successfully satisfies every schema invariant.

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeKind, ValueId};
use crate::error::DatasetError;
use crate::schema::Schema;

// ============================================================================
// VALUES AND RECORDS
// ============================================================================

/// A single cell of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Missing,
    /// Interned value of a categorical attribute.
    Category(ValueId),
    /// Value of a continuous attribute. Carried for completeness; the
    /// cross-tabulation engine never reads these.
    Number(f64),
}

impl DataValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, DataValue::Missing)
    }

    /// The vocabulary ID if this is a categorical cell.
    pub fn category(&self) -> Option<ValueId> {
        match self {
            DataValue::Category(id) => Some(*id),
            _ => None,
        }
    }
}

/// A single record, stored as one value per schema attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<DataValue>,
}

impl Record {
    /// The value at an attribute position. Out-of-range reads as missing.
    pub fn value(&self, index: usize) -> DataValue {
        self.values.get(index).copied().unwrap_or(DataValue::Missing)
    }

    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    /// Whether any attribute value is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(DataValue::is_missing)
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// An ordered sequence of records conforming to a fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: Schema) -> Self {
        Dataset {
            schema,
            records: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Reserves capacity for expected record count.
    pub fn reserve(&mut self, record_count: usize) {
        self.records.reserve(record_count);
    }

    /// Appends a record given as one raw value per attribute, in schema
    /// order. `None` marks a missing value. Categorical values must belong
    /// to their attribute's vocabulary; continuous values must parse as
    /// numbers.
    pub fn push_record(&mut self, values: &[Option<&str>]) -> Result<(), DatasetError> {
        if values.len() != self.schema.len() {
            return Err(DatasetError::RecordWidth {
                expected: self.schema.len(),
                actual: values.len(),
            });
        }

        let mut interned = Vec::with_capacity(values.len());
        for (attribute, raw) in self.schema.attributes().iter().zip(values) {
            let value = match raw {
                None => DataValue::Missing,
                Some(raw) => match attribute.kind() {
                    AttributeKind::Categorical(vocabulary) => {
                        let id = vocabulary.id_of(raw).ok_or_else(|| {
                            DatasetError::UnknownValue {
                                attribute: attribute.name.clone(),
                                value: raw.to_string(),
                            }
                        })?;
                        DataValue::Category(id)
                    }
                    AttributeKind::Continuous => {
                        let number: f64 = raw.parse().map_err(|_| {
                            DatasetError::InvalidNumber {
                                attribute: attribute.name.clone(),
                                value: raw.to_string(),
                            }
                        })?;
                        DataValue::Number(number)
                    }
                },
            };
            interned.push(value);
        }

        self.records.push(Record { values: interned });
        Ok(())
    }

    /// Returns a copy with every record containing a missing value removed.
    pub fn drop_missing(&self) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            records: self
                .records
                .iter()
                .filter(|record| !record.has_missing())
                .cloned()
                .collect(),
        }
    }

    /// Returns a copy restricted to `names`, in the requested order.
    /// Record values are carried over; the class designation follows when
    /// the class attribute is among the selected names.
    pub fn project(&self, names: &[&str]) -> Result<Dataset, DatasetError> {
        let schema = self.schema.select(names)?;
        let indices: Vec<usize> = names
            .iter()
            .map(|name| {
                self.schema
                    .index_of(name)
                    .ok_or_else(|| DatasetError::UnknownAttribute {
                        name: name.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        let records = self
            .records
            .iter()
            .map(|record| Record {
                values: indices.iter().map(|&index| record.value(index)).collect(),
            })
            .collect();

        Ok(Dataset { schema, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;

    fn create_test_dataset() -> Dataset {
        let schema = Schema::new(vec![
            Attribute::categorical("shape", ["circle", "square"]),
            Attribute::continuous("area"),
            Attribute::categorical("filled", ["no", "yes"]),
        ])
        .unwrap();
        let mut data = Dataset::new(schema);
        data.push_record(&[Some("circle"), Some("3.14"), Some("yes")])
            .unwrap();
        data.push_record(&[Some("square"), None, Some("no")]).unwrap();
        data.push_record(&[None, Some("1.0"), Some("yes")]).unwrap();
        data
    }

    #[test]
    fn test_push_record_interns_values() {
        let data = create_test_dataset();
        assert_eq!(data.len(), 3);
        assert_eq!(data.records()[0].value(0), DataValue::Category(0));
        assert_eq!(data.records()[0].value(1), DataValue::Number(3.14));
        assert_eq!(data.records()[1].value(1), DataValue::Missing);
        assert_eq!(data.records()[2].value(0), DataValue::Missing);
    }

    #[test]
    fn test_push_record_rejects_unknown_value() {
        let mut data = create_test_dataset();
        let result = data.push_record(&[Some("triangle"), Some("2.0"), Some("no")]);
        assert_eq!(
            result,
            Err(DatasetError::UnknownValue {
                attribute: "shape".to_string(),
                value: "triangle".to_string(),
            })
        );
        // Failed pushes leave the dataset unchanged
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_push_record_rejects_bad_number() {
        let mut data = create_test_dataset();
        let result = data.push_record(&[Some("circle"), Some("big"), Some("no")]);
        assert!(matches!(
            result,
            Err(DatasetError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_push_record_rejects_wrong_width() {
        let mut data = create_test_dataset();
        let result = data.push_record(&[Some("circle"), Some("1.0")]);
        assert_eq!(
            result,
            Err(DatasetError::RecordWidth {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_drop_missing() {
        let data = create_test_dataset();
        let complete = data.drop_missing();
        assert_eq!(complete.len(), 1);
        assert_eq!(complete.records()[0].value(0), DataValue::Category(0));
    }

    #[test]
    fn test_project_carries_values() {
        let data = create_test_dataset();
        let projected = data.project(&["filled", "shape"]).unwrap();
        assert_eq!(projected.schema().len(), 2);
        assert_eq!(projected.records()[0].value(0), DataValue::Category(1)); // yes
        assert_eq!(projected.records()[0].value(1), DataValue::Category(0)); // circle
        assert_eq!(projected.records()[2].value(1), DataValue::Missing);
    }

    #[test]
    fn test_dataset_serde_round_trip() {
        let data = create_test_dataset();
        let json = serde_json::to_string(&data).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}

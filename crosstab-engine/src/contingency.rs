//! FILENAME: crosstab-engine/src/contingency.rs
//! Contingency builder - joint and marginal count tables.
//!
//! One pass over the records produces both the joint counts (keyed by the
//! value-id tuple of the selected attributes) and the per-attribute
//! marginals over the same filtered subset, so downstream consumers never
//! recount.
//!
//! Filtering rules, in order:
//! 1. If a condition filter is given, keep only records holding its value.
//! 2. Exclude every record missing a value for any selected attribute.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use dataset::{DataValue, Dataset, DatasetError, Schema, ValueId};

use crate::definition::ConditionFilter;
use crate::error::CrosstabError;

/// Fewest attributes a table can be built over.
pub const MIN_ATTRIBUTES: usize = 1;
/// Most attributes a table can be built over.
pub const MAX_ATTRIBUTES: usize = 4;

// ============================================================================
// GROUP KEY
// ============================================================================

/// A key representing one combination of values of the selected attributes,
/// in attribute-list order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub values: SmallVec<[ValueId; 4]>,
}

impl GroupKey {
    pub fn new(values: impl Into<SmallVec<[ValueId; 4]>>) -> Self {
        GroupKey {
            values: values.into(),
        }
    }

    pub fn from_slice(values: &[ValueId]) -> Self {
        GroupKey {
            values: SmallVec::from_slice(values),
        }
    }
}

// ============================================================================
// MARGINAL COUNTS
// ============================================================================

/// Value frequencies of a single attribute, ignoring all others, over the
/// filtered subset. Dense: indexed by `ValueId`, one slot per vocabulary
/// entry, zero for values that never occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalCounts {
    pub attribute: String,
    counts: Vec<u64>,
}

impl MarginalCounts {
    fn zeroed(attribute: String, cardinality: usize) -> Self {
        MarginalCounts {
            attribute,
            counts: vec![0; cardinality],
        }
    }

    /// Count of records holding `id`. Out-of-vocabulary IDs read as zero.
    pub fn count(&self, id: ValueId) -> u64 {
        self.counts.get(id as usize).copied().unwrap_or(0)
    }

    /// Counts in vocabulary order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

// ============================================================================
// CONTINGENCY TABLE
// ============================================================================

/// Joint frequency counts of value combinations across the selected
/// attributes. Derived and read-only: rebuilt whenever the attribute list
/// or the underlying subset changes, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    attributes: Vec<String>,
    cardinalities: Vec<usize>,

    /// Joint counts. Combinations that never occur are absent and read as
    /// zero.
    #[serde(with = "group_entries")]
    cells: FxHashMap<GroupKey, u64>,

    /// Per-attribute marginals over the same filtered subset, one per
    /// selected attribute in attribute-list order.
    marginals: Vec<MarginalCounts>,

    total: u64,
}

impl ContingencyTable {
    /// Names of the selected attributes, in list order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn axis_count(&self) -> usize {
        self.attributes.len()
    }

    /// Vocabulary size of the attribute on `axis`.
    pub fn cardinality(&self, axis: usize) -> usize {
        self.cardinalities.get(axis).copied().unwrap_or(0)
    }

    /// Joint count for a value combination. Absent combinations read as
    /// zero.
    pub fn count(&self, key: &[ValueId]) -> u64 {
        self.cells
            .get(&GroupKey::from_slice(key))
            .copied()
            .unwrap_or(0)
    }

    pub fn marginal(&self, axis: usize) -> &MarginalCounts {
        &self.marginals[axis]
    }

    pub fn marginals(&self) -> &[MarginalCounts] {
        &self.marginals
    }

    /// Number of records surviving both filters. Equals the sum of all
    /// joint counts and the sum of any axis's marginals.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Occupied cells (count > 0), in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = (&GroupKey, u64)> {
        self.cells.iter().map(|(key, &count)| (key, count))
    }
}

/// Serializes the cell map as a sorted entry list so the output is
/// deterministic and survives formats without structured map keys.
mod group_entries {
    use rustc_hash::FxHashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::GroupKey;

    pub fn serialize<S>(cells: &FxHashMap<GroupKey, u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries: Vec<(&GroupKey, &u64)> = cells.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<FxHashMap<GroupKey, u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<(GroupKey, u64)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Resolves a condition filter to (attribute index, value id), validating
/// both against the schema.
pub(crate) fn resolve_condition(
    schema: &Schema,
    condition: Option<&ConditionFilter>,
) -> Result<Option<(usize, ValueId)>, CrosstabError> {
    let Some(filter) = condition else {
        return Ok(None);
    };
    let index = schema.categorical_index(&filter.attribute)?;
    let vocabulary = schema.attributes()[index]
        .vocabulary()
        .ok_or_else(|| DatasetError::NotCategorical {
            name: filter.attribute.clone(),
        })?;
    let id = vocabulary
        .id_of(&filter.value)
        .ok_or_else(|| DatasetError::UnknownValue {
            attribute: filter.attribute.clone(),
            value: filter.value.clone(),
        })?;
    Ok(Some((index, id)))
}

/// Resolves 1-4 attribute names to schema positions, requiring each to be
/// categorical.
pub(crate) fn resolve_attributes(
    schema: &Schema,
    attributes: &[&str],
) -> Result<Vec<usize>, CrosstabError> {
    if attributes.len() < MIN_ATTRIBUTES || attributes.len() > MAX_ATTRIBUTES {
        return Err(CrosstabError::AttributeArity {
            min: MIN_ATTRIBUTES,
            max: MAX_ATTRIBUTES,
            actual: attributes.len(),
        });
    }
    attributes
        .iter()
        .map(|name| schema.categorical_index(name).map_err(CrosstabError::from))
        .collect()
}

/// Builds the joint and marginal count tables for `attributes` over
/// `dataset`, optionally restricted by a condition filter.
///
/// An empty filtered subset is legal and yields an all-zero table. The
/// output depends only on the inputs; calling twice with identical
/// arguments yields identical tables.
pub fn build_contingency(
    dataset: &Dataset,
    attributes: &[&str],
    condition: Option<&ConditionFilter>,
) -> Result<ContingencyTable, CrosstabError> {
    let schema = dataset.schema();
    let indices = resolve_attributes(schema, attributes)?;
    let condition = resolve_condition(schema, condition)?;

    let cardinalities: Vec<usize> = indices
        .iter()
        .map(|&index| {
            schema.attributes()[index]
                .vocabulary()
                .map(|vocabulary| vocabulary.len())
                .unwrap_or(0)
        })
        .collect();

    let mut marginals: Vec<MarginalCounts> = indices
        .iter()
        .zip(&cardinalities)
        .map(|(&index, &cardinality)| {
            MarginalCounts::zeroed(schema.attributes()[index].name.clone(), cardinality)
        })
        .collect();

    let mut cells: FxHashMap<GroupKey, u64> = FxHashMap::default();
    let mut total = 0u64;

    'records: for record in dataset.records() {
        if let Some((index, id)) = condition {
            if record.value(index) != DataValue::Category(id) {
                continue;
            }
        }

        let mut key: SmallVec<[ValueId; 4]> = SmallVec::with_capacity(indices.len());
        for &index in &indices {
            match record.value(index) {
                DataValue::Category(id) => key.push(id),
                // A missing value among the selected attributes excludes
                // the whole record
                _ => continue 'records,
            }
        }

        for (marginal, &id) in marginals.iter_mut().zip(&key) {
            marginal.counts[id as usize] += 1;
        }
        *cells.entry(GroupKey::new(key)).or_insert(0) += 1;
        total += 1;
    }

    Ok(ContingencyTable {
        attributes: attributes.iter().map(|name| name.to_string()).collect(),
        cardinalities,
        cells,
        marginals,
        total,
    })
}

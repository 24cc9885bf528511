//! FILENAME: crosstab-engine/src/association.rs
//! Association scorer - chi-square and standardized Pearson residuals.
//!
//! Departure from independence for a two-way table. Per cell:
//!
//! ```text
//! expected = marginal_x * marginal_y / total
//! residual = (observed - expected) / sqrt(expected)    when expected > 0
//! ```
//!
//! Chi-square is the sum of `(observed - expected)^2 / expected` over all
//! cells with a positive expected count. Cells with `expected == 0` (a zero
//! marginal, or an empty subset) are excluded from the sum and their
//! residual is `None`: undefined is a legal per-cell outcome, never an
//! error.

use serde::{Deserialize, Serialize};

use dataset::{Dataset, ValueId};

use crate::contingency::{build_contingency, ContingencyTable};
use crate::definition::ConditionFilter;
use crate::error::CrosstabError;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Scores for one (x, y) value combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationCell {
    pub x: ValueId,
    pub y: ValueId,
    pub observed: u64,
    pub expected: f64,
    /// Standardized Pearson residual; `None` when `expected == 0`.
    pub residual: Option<f64>,
}

/// Association strength for a two-attribute contingency table.
///
/// Created fresh per query and never mutated. Cells cover the full
/// vocabulary cross product in x-major vocabulary order: exactly one entry
/// per (x, y) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationResult {
    pub x_attribute: String,
    pub y_attribute: String,
    pub total: u64,
    /// Always >= 0; zero for an empty subset.
    pub chi_square: f64,
    pub cells: Vec<AssociationCell>,
}

impl AssociationResult {
    /// The cell for a specific value combination.
    pub fn cell(&self, x: ValueId, y: ValueId) -> Option<&AssociationCell> {
        self.cells.iter().find(|cell| cell.x == x && cell.y == y)
    }
}

// ============================================================================
// SCORER
// ============================================================================

/// Computes expected counts, per-cell residuals, and the chi-square
/// statistic for a table over exactly two attributes.
pub fn score_association(table: &ContingencyTable) -> Result<AssociationResult, CrosstabError> {
    if table.axis_count() != 2 {
        return Err(CrosstabError::AxisCount {
            expected: 2,
            actual: table.axis_count(),
        });
    }

    let marginal_x = table.marginal(0);
    let marginal_y = table.marginal(1);
    let total = table.total();

    let mut chi_square = 0.0;
    let mut cells = Vec::with_capacity(table.cardinality(0) * table.cardinality(1));

    for x in 0..table.cardinality(0) as ValueId {
        for y in 0..table.cardinality(1) as ValueId {
            let observed = table.count(&[x, y]);
            let expected = if total > 0 {
                marginal_x.count(x) as f64 * marginal_y.count(y) as f64 / total as f64
            } else {
                0.0
            };

            let residual = if expected > 0.0 {
                let deviation = observed as f64 - expected;
                chi_square += deviation * deviation / expected;
                Some(deviation / expected.sqrt())
            } else {
                None
            };

            cells.push(AssociationCell {
                x,
                y,
                observed,
                expected,
                residual,
            });
        }
    }

    Ok(AssociationResult {
        x_attribute: table.attributes()[0].clone(),
        y_attribute: table.attributes()[1].clone(),
        total,
        chi_square,
        cells,
    })
}

// ============================================================================
// PAIR RANKING
// ============================================================================

/// Chi-square score of one attribute pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub x_attribute: String,
    pub y_attribute: String,
    pub chi_square: f64,
}

/// Scores every unordered pair of categorical attributes and returns the
/// pairs sorted by descending chi-square, so the most interesting pairs
/// come first. Continuous attributes are skipped. Ties break on the
/// attribute-name pair so the order is deterministic.
pub fn rank_pairs(
    dataset: &Dataset,
    condition: Option<&ConditionFilter>,
) -> Result<Vec<PairScore>, CrosstabError> {
    let categorical: Vec<&str> = dataset
        .schema()
        .attributes()
        .iter()
        .filter(|attribute| attribute.is_categorical())
        .map(|attribute| attribute.name.as_str())
        .collect();

    let mut scores = Vec::new();
    for (i, &x_name) in categorical.iter().enumerate() {
        for &y_name in &categorical[i + 1..] {
            let table = build_contingency(dataset, &[x_name, y_name], condition)?;
            let result = score_association(&table)?;
            scores.push(PairScore {
                x_attribute: x_name.to_string(),
                y_attribute: y_name.to_string(),
                chi_square: result.chi_square,
            });
        }
    }

    scores.sort_by(|a, b| {
        b.chi_square
            .partial_cmp(&a.chi_square)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                (&a.x_attribute, &a.y_attribute).cmp(&(&b.x_attribute, &b.y_attribute))
            })
    });
    Ok(scores)
}

//! FILENAME: crosstab-engine/src/sieve.rs
//! Sieve layout - marginal-proportional grid with residual annotations.
//!
//! A sieve diagram tiles the bounds with one cell per (x, y) value
//! combination: column widths proportional to the X marginals, row heights
//! proportional to the Y marginals, so each cell's area is proportional to
//! its expected-under-independence count. Every cell carries its
//! association scores together with the shading density a front-end spaces
//! its hatching lines by. Drawing is not our concern.

use serde::{Deserialize, Serialize};

use dataset::{Dataset, ValueId};

use crate::association::score_association;
use crate::contingency::build_contingency;
use crate::definition::ConditionFilter;
use crate::error::CrosstabError;
use crate::mosaic::Rect;

// ============================================================================
// GRID TYPES
// ============================================================================

/// One cell of the sieve grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveCell {
    pub x: ValueId,
    pub y: ValueId,
    pub rect: Rect,
    pub observed: u64,
    pub expected: f64,
    /// Standardized Pearson residual; `None` when `expected == 0`.
    pub residual: Option<f64>,
    /// Multiplier for the front-end's base hatching distance. Below 1
    /// means denser lines than independence, above 1 sparser.
    pub shading_density: f64,
}

/// The complete sieve grid for one attribute pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveGrid {
    pub x_attribute: String,
    pub y_attribute: String,
    pub bounds: Rect,
    pub total: u64,
    pub chi_square: f64,
    /// Cells in x-major vocabulary order, one per (x, y) combination.
    pub cells: Vec<SieveCell>,
}

impl SieveGrid {
    pub fn cell(&self, x: ValueId, y: ValueId) -> Option<&SieveCell> {
        self.cells.iter().find(|cell| cell.x == x && cell.y == y)
    }
}

/// Spacing multiplier derived from a cell's residual. A residual of zero
/// (or an undefined one) leaves the base spacing unchanged; positive
/// residuals tighten it down to 0.2 at +10, negative residuals widen it up
/// to 5 at -10.
fn shading_density(residual: Option<f64>) -> f64 {
    match residual {
        Some(r) if r > 0.0 => 1.0 - 0.08 * r.min(10.0),
        Some(r) if r < 0.0 => 1.0 - 0.4 * r.max(-10.0),
        _ => 1.0,
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Builds the sieve grid for an attribute pair inside `bounds`.
///
/// Zero marginals produce zero-extent columns or rows, kept in place so
/// the grid always covers the full vocabulary cross product. Placement
/// accumulates positions additively from unrounded extents, exactly as the
/// mosaic layout does.
pub fn layout_sieve(
    dataset: &Dataset,
    x_attribute: &str,
    y_attribute: &str,
    bounds: Rect,
    condition: Option<&ConditionFilter>,
) -> Result<SieveGrid, CrosstabError> {
    let table = build_contingency(dataset, &[x_attribute, y_attribute], condition)?;
    let scored = score_association(&table)?;

    let columns = spans(
        bounds.x0,
        bounds.width(),
        table.marginal(0).counts(),
        table.total(),
    );
    let rows = spans(
        bounds.y0,
        bounds.height(),
        table.marginal(1).counts(),
        table.total(),
    );

    let cells = scored
        .cells
        .iter()
        .map(|cell| {
            let (x0, x1) = columns[cell.x as usize];
            let (y0, y1) = rows[cell.y as usize];
            SieveCell {
                x: cell.x,
                y: cell.y,
                rect: Rect::new(x0, y0, x1, y1),
                observed: cell.observed,
                expected: cell.expected,
                residual: cell.residual,
                shading_density: shading_density(cell.residual),
            }
        })
        .collect();

    Ok(SieveGrid {
        x_attribute: scored.x_attribute,
        y_attribute: scored.y_attribute,
        bounds,
        total: scored.total,
        chi_square: scored.chi_square,
        cells,
    })
}

/// Splits [start, start + extent] into one span per marginal count,
/// proportional to count / total, placed by running total.
fn spans(start: f64, extent: f64, counts: &[u64], total: u64) -> Vec<(f64, f64)> {
    let mut result = Vec::with_capacity(counts.len());
    let mut cursor = start;
    for &count in counts {
        let share = if total > 0 {
            extent * count as f64 / total as f64
        } else {
            0.0
        };
        result.push((cursor, cursor + share));
        cursor += share;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::{Attribute, Schema};

    const TOLERANCE: f64 = 1e-9;

    /// 10 records: A in {x: 6, y: 4}, joint B counts
    /// {(x,p): 3, (x,q): 3, (y,p): 1, (y,q): 3}.
    fn create_test_dataset() -> Dataset {
        let schema = Schema::new(vec![
            Attribute::categorical("a", ["x", "y"]),
            Attribute::categorical("b", ["p", "q"]),
        ])
        .unwrap();
        let mut data = Dataset::new(schema);
        let rows: [(&str, &str); 10] = [
            ("x", "p"),
            ("x", "p"),
            ("x", "p"),
            ("x", "q"),
            ("x", "q"),
            ("x", "q"),
            ("y", "p"),
            ("y", "q"),
            ("y", "q"),
            ("y", "q"),
        ];
        for (a, b) in rows {
            data.push_record(&[Some(a), Some(b)]).unwrap();
        }
        data
    }

    fn layout_test_grid() -> SieveGrid {
        layout_sieve(
            &create_test_dataset(),
            "a",
            "b",
            Rect::new(0.0, 0.0, 100.0, 200.0),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_cells_tile_the_bounds() {
        let grid = layout_test_grid();

        assert_eq!(grid.cells.len(), 4);

        // Column widths: 60/40 of 100; row heights: 80/120 of 200
        let xp = grid.cell(0, 0).unwrap();
        assert!((xp.rect.width() - 60.0).abs() < TOLERANCE);
        assert!((xp.rect.height() - 80.0).abs() < TOLERANCE);
        let yq = grid.cell(1, 1).unwrap();
        assert!((yq.rect.width() - 40.0).abs() < TOLERANCE);
        assert!((yq.rect.height() - 120.0).abs() < TOLERANCE);

        // Running-total placement: the far corner cell ends exactly on the
        // bounds
        assert!((yq.rect.x1 - 100.0).abs() < TOLERANCE);
        assert!((yq.rect.y1 - 200.0).abs() < TOLERANCE);

        // Per-axis extents sum to the bounds extent
        let width_sum: f64 = (0..2)
            .map(|x| grid.cell(x, 0).map(|cell| cell.rect.width()).unwrap_or(0.0))
            .sum();
        assert!((width_sum - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_cells_carry_association_scores() {
        let grid = layout_test_grid();

        let xp = grid.cell(0, 0).unwrap();
        assert_eq!(xp.observed, 3);
        assert!((xp.expected - 2.4).abs() < TOLERANCE);
        assert!((xp.residual.unwrap() - 0.6 / 2.4f64.sqrt()).abs() < TOLERANCE);
        assert!((grid.chi_square - 0.625).abs() < TOLERANCE);
        assert_eq!(grid.total, 10);
    }

    #[test]
    fn test_shading_density_piecewise() {
        assert!((shading_density(None) - 1.0).abs() < TOLERANCE);
        assert!((shading_density(Some(0.0)) - 1.0).abs() < TOLERANCE);

        // Positive residuals tighten: 1 - 0.08 * r, clamped at r = 10
        assert!((shading_density(Some(2.5)) - 0.8).abs() < TOLERANCE);
        assert!((shading_density(Some(25.0)) - 0.2).abs() < TOLERANCE);

        // Negative residuals widen: 1 - 0.4 * r, clamped at r = -10
        assert!((shading_density(Some(-1.0)) - 1.4).abs() < TOLERANCE);
        assert!((shading_density(Some(-25.0)) - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_marginal_produces_zero_extent_row() {
        let schema = Schema::new(vec![
            Attribute::categorical("a", ["x", "y"]),
            Attribute::categorical("b", ["p", "q", "r"]),
        ])
        .unwrap();
        let mut data = Dataset::new(schema);
        for (a, b) in [("x", "p"), ("x", "q"), ("y", "p"), ("y", "q")] {
            data.push_record(&[Some(a), Some(b)]).unwrap();
        }

        let grid = layout_sieve(&data, "a", "b", Rect::new(0.0, 0.0, 10.0, 10.0), None).unwrap();

        // The "r" row exists with zero height and an undefined residual
        assert_eq!(grid.cells.len(), 6);
        let dead = grid.cell(0, 2).unwrap();
        assert!((dead.rect.height() - 0.0).abs() < TOLERANCE);
        assert_eq!(dead.residual, None);
        assert!((dead.shading_density - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_empty_subset_grid() {
        let schema = Schema::new(vec![
            Attribute::categorical("a", ["x", "y"]),
            Attribute::categorical("b", ["p", "q"]),
        ])
        .unwrap();
        let data = Dataset::new(schema);

        let grid = layout_sieve(&data, "a", "b", Rect::new(0.0, 0.0, 10.0, 10.0), None).unwrap();
        assert_eq!(grid.total, 0);
        assert_eq!(grid.chi_square, 0.0);
        assert_eq!(grid.cells.len(), 4);
        assert!(grid
            .cells
            .iter()
            .all(|cell| cell.rect.width() == 0.0 && cell.rect.height() == 0.0));
    }

    #[test]
    fn test_condition_filter_applies() {
        let schema = Schema::new(vec![
            Attribute::categorical("a", ["x", "y"]),
            Attribute::categorical("b", ["p", "q"]),
            Attribute::categorical("site", ["north", "south"]),
        ])
        .unwrap();
        let mut data = Dataset::new(schema);
        for (a, b, site) in [
            ("x", "p", "north"),
            ("x", "q", "north"),
            ("y", "p", "south"),
            ("y", "q", "south"),
        ] {
            data.push_record(&[Some(a), Some(b), Some(site)]).unwrap();
        }

        let condition = ConditionFilter::new("site", "north");
        let grid = layout_sieve(
            &data,
            "a",
            "b",
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Some(&condition),
        )
        .unwrap();

        assert_eq!(grid.total, 2);
        // Only x records survive the filter, so the x column spans the
        // full width
        assert!((grid.cell(0, 0).unwrap().rect.width() - 10.0).abs() < TOLERANCE);
        assert!((grid.cell(1, 0).unwrap().rect.width() - 0.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let first = layout_test_grid();
        let second = layout_test_grid();
        assert_eq!(first, second);
    }

    #[test]
    fn test_grid_serde_round_trip() {
        let grid = layout_test_grid();
        let json = serde_json::to_string(&grid).unwrap();
        let back: SieveGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}

//! FILENAME: crosstab-engine/src/definition.rs
//! Query configuration - the serializable description of what to compute.
//!
//! These structures describe a cross-tabulation request the way a caller
//! (typically a display front-end) would persist it: attribute choices are
//! plain names, resolved and validated against the schema at computation
//! time.

use serde::{Deserialize, Serialize};

/// Restricts a computation to records holding `value` for `attribute`.
///
/// The attribute must be categorical and the value must belong to its
/// vocabulary; both are validated when the filter is applied. Records
/// missing a value for the filter attribute never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionFilter {
    pub attribute: String,
    pub value: String,
}

impl ConditionFilter {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        ConditionFilter {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Direction along which a rectangle is subdivided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Axis {
    /// Split into side-by-side columns.
    #[default]
    Horizontal,
    /// Split into stacked rows.
    Vertical,
}

impl Axis {
    pub fn flipped(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Controls mosaic subdivision geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Base gap between adjacent sibling cells. The gap applied at depth
    /// `d` of a `k`-attribute layout is `cell_spacing * (k - d)`, so outer
    /// splits separate more strongly than inner ones.
    pub cell_spacing: f64,

    /// Alternate the split axis per nesting level.
    pub alternate_axes: bool,

    /// Axis used at the outermost level.
    pub initial_axis: Axis,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            cell_spacing: 6.0,
            alternate_axes: true,
            initial_axis: Axis::Horizontal,
        }
    }
}

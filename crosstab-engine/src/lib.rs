//! FILENAME: crosstab-engine/src/lib.rs
//! Categorical cross-tabulation and association-strength engine.
//!
//! This crate provides the statistical core behind mosaic and sieve
//! displays as a standalone module, separate from any presentation layer.
//! It depends on `dataset` only for the shared data model (Schema,
//! Dataset, ValueId).
//!
//! Layers:
//! - `definition`: Serializable query configuration (WHAT we compute)
//! - `contingency`: Joint and marginal count tables (HOW we count)
//! - `association`: Chi-square, expected counts, Pearson residuals
//! - `mosaic`: Nested proportional rectangle subdivision
//! - `sieve`: Marginal-proportional grid with residual annotations
//!
//! Every operation is a pure function over its inputs with no shared
//! mutable state; identical inputs always produce identical outputs.

pub mod association;
pub mod contingency;
pub mod definition;
pub mod error;
pub mod mosaic;
pub mod sieve;

pub use association::{
    rank_pairs, score_association, AssociationCell, AssociationResult, PairScore,
};
pub use contingency::{build_contingency, ContingencyTable, GroupKey, MarginalCounts};
pub use definition::{Axis, ConditionFilter, LayoutOptions};
pub use error::CrosstabError;
pub use mosaic::{
    apriori_distribution, layout_mosaic, ClassDistribution, LeafPayload, PathStep, Rect,
    RectContent, RectNode,
};
pub use sieve::{layout_sieve, SieveCell, SieveGrid};

//! FILENAME: crosstab-engine/src/mosaic.rs
//! Mosaic layout - nested proportional rectangle subdivision.
//!
//! Recursively partitions a bounding rectangle into a tree of
//! sub-rectangles whose extents are proportional to the joint frequencies
//! of 1-4 categorical attributes, alternating the split axis per nesting
//! level. The tree is plain data with no back-references to any
//! presentation object; turning it into rendered shapes is the front-end's
//! concern.
//!
//! Placement accumulates positions additively from unrounded extents, so
//! successive children never leave a gap or overlap at the far edge of the
//! parent rectangle.

use serde::{Deserialize, Serialize};

use dataset::{DataValue, Dataset, ValueId, Vocabulary};

use crate::contingency::{resolve_attributes, resolve_condition};
use crate::definition::{Axis, ConditionFilter, LayoutOptions};
use crate::error::CrosstabError;

// ============================================================================
// GEOMETRY
// ============================================================================

/// An axis-aligned rectangle, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// The side length along the given split axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        }
    }

    /// The coordinate where subdivision along `axis` starts.
    fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x0,
            Axis::Vertical => self.y0,
        }
    }

    /// The sub-rectangle spanning [from, to] along `axis`, full extent on
    /// the other axis.
    fn slice(&self, axis: Axis, from: f64, to: f64) -> Rect {
        match axis {
            Axis::Horizontal => Rect::new(from, self.y0, to, self.y1),
            Axis::Vertical => Rect::new(self.x0, from, self.x1, to),
        }
    }
}

// ============================================================================
// TREE NODES
// ============================================================================

/// One (attribute, value) step of the path that produced a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub attribute: String,
    pub value: String,
}

/// Per-class-value counts of a record subset, dense in class-vocabulary
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDistribution {
    pub attribute: String,
    pub counts: Vec<u64>,
}

impl ClassDistribution {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// What a tree node holds below itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RectContent {
    /// One node per value of the next attribute, in vocabulary order.
    Children(Vec<RectNode>),
    Leaf(LeafPayload),
}

/// Payload of a leaf node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafPayload {
    /// Number of records matching the leaf's full path.
    pub count: u64,
    /// Distribution of the class attribute over those records, when the
    /// schema designates a categorical class.
    pub class_distribution: Option<ClassDistribution>,
}

/// A node of the subdivision tree. Extents may legitimately be zero (empty
/// subsets keep their children so consumers always see the complete tree
/// shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectNode {
    pub rect: Rect,
    /// (attribute, value) pairs from the root down to this node; empty for
    /// the root.
    pub path: Vec<PathStep>,
    pub content: RectContent,
}

impl RectNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, RectContent::Leaf(_))
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[RectNode] {
        match &self.content {
            RectContent::Children(children) => children,
            RectContent::Leaf(_) => &[],
        }
    }

    pub fn leaf(&self) -> Option<&LeafPayload> {
        match &self.content {
            RectContent::Leaf(payload) => Some(payload),
            RectContent::Children(_) => None,
        }
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

struct LayoutPass<'a> {
    dataset: &'a Dataset,
    attr_indices: Vec<usize>,
    attr_names: Vec<String>,
    vocabularies: Vec<&'a Vocabulary>,
    options: &'a LayoutOptions,
    class: Option<ClassInfo<'a>>,
}

struct ClassInfo<'a> {
    index: usize,
    name: &'a str,
    cardinality: usize,
}

/// Builds the subdivision tree for `attributes` (1-4 names, outermost
/// first) inside `bounds`.
///
/// At depth `d` the rectangle splits along the initial axis, flipped every
/// level when `options.alternate_axes`. Children are emitted for every
/// vocabulary value in vocabulary order; an empty parent subset produces
/// zero-extent children rather than omitting them.
pub fn layout_mosaic(
    dataset: &Dataset,
    attributes: &[&str],
    bounds: Rect,
    options: &LayoutOptions,
    condition: Option<&ConditionFilter>,
) -> Result<RectNode, CrosstabError> {
    let schema = dataset.schema();
    let attr_indices = resolve_attributes(schema, attributes)?;
    let condition = resolve_condition(schema, condition)?;

    let vocabularies: Vec<&Vocabulary> = attr_indices
        .iter()
        .filter_map(|&index| schema.attributes()[index].vocabulary())
        .collect();

    let class = schema.class_index().and_then(|index| {
        let attribute = &schema.attributes()[index];
        attribute.vocabulary().map(|vocabulary| ClassInfo {
            index,
            name: attribute.name.as_str(),
            cardinality: vocabulary.len(),
        })
    });

    // Root subset: records matching the condition with no missing value
    // among the selected attributes (the same subset a contingency table
    // over these attributes counts)
    let subset: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            if let Some((index, id)) = condition {
                if record.value(index) != DataValue::Category(id) {
                    return false;
                }
            }
            attr_indices
                .iter()
                .all(|&index| record.value(index).category().is_some())
        })
        .map(|(position, _)| position)
        .collect();

    let pass = LayoutPass {
        dataset,
        attr_indices,
        attr_names: attributes.iter().map(|name| name.to_string()).collect(),
        vocabularies,
        options,
        class,
    };

    let children = pass.subdivide(0, &subset, bounds, options.initial_axis, &[]);
    Ok(RectNode {
        rect: bounds,
        path: Vec::new(),
        content: RectContent::Children(children),
    })
}

impl<'a> LayoutPass<'a> {
    fn subdivide(
        &self,
        depth: usize,
        subset: &[usize],
        rect: Rect,
        axis: Axis,
        path: &[PathStep],
    ) -> Vec<RectNode> {
        let attr_index = self.attr_indices[depth];
        let vocabulary = self.vocabularies[depth];
        let is_last = depth + 1 == self.attr_indices.len();

        // Spacing scales with the number of remaining attributes: outer
        // splits separate more strongly than inner ones
        let gap = self.options.cell_spacing * (self.attr_indices.len() - depth) as f64;
        let available =
            (rect.extent(axis) - gap * vocabulary.len().saturating_sub(1) as f64).max(0.0);
        let parent_total = subset.len();

        let mut children = Vec::with_capacity(vocabulary.len());
        let mut cursor = rect.start(axis);

        for (id, value) in vocabulary.values().iter().enumerate() {
            let wanted = DataValue::Category(id as ValueId);
            let child_subset: Vec<usize> = subset
                .iter()
                .copied()
                .filter(|&position| self.dataset.records()[position].value(attr_index) == wanted)
                .collect();

            let proportion = if parent_total > 0 {
                child_subset.len() as f64 / parent_total as f64
            } else {
                0.0
            };
            let child_extent = proportion * available;
            let child_rect = rect.slice(axis, cursor, cursor + child_extent);

            let mut child_path = path.to_vec();
            child_path.push(PathStep {
                attribute: self.attr_names[depth].clone(),
                value: value.clone(),
            });

            let content = if is_last {
                RectContent::Leaf(LeafPayload {
                    count: child_subset.len() as u64,
                    class_distribution: self.class_distribution(&child_subset),
                })
            } else {
                let next_axis = if self.options.alternate_axes {
                    axis.flipped()
                } else {
                    axis
                };
                RectContent::Children(self.subdivide(
                    depth + 1,
                    &child_subset,
                    child_rect,
                    next_axis,
                    &child_path,
                ))
            };

            children.push(RectNode {
                rect: child_rect,
                path: child_path,
                content,
            });
            cursor += child_extent + gap;
        }

        children
    }

    fn class_distribution(&self, subset: &[usize]) -> Option<ClassDistribution> {
        let class = self.class.as_ref()?;
        let mut counts = vec![0u64; class.cardinality];
        for &position in subset {
            if let Some(id) = self.dataset.records()[position].value(class.index).category() {
                counts[id as usize] += 1;
            }
        }
        Some(ClassDistribution {
            attribute: class.name.to_string(),
            counts,
        })
    }
}

/// Class distribution of the whole (condition-filtered) dataset: the
/// baseline a front-end compares each cell's distribution against.
/// `None` when the schema has no categorical class attribute.
pub fn apriori_distribution(
    dataset: &Dataset,
    condition: Option<&ConditionFilter>,
) -> Result<Option<ClassDistribution>, CrosstabError> {
    let schema = dataset.schema();
    let condition = resolve_condition(schema, condition)?;

    let Some(index) = schema.class_index() else {
        return Ok(None);
    };
    let attribute = &schema.attributes()[index];
    let Some(vocabulary) = attribute.vocabulary() else {
        return Ok(None);
    };

    let mut counts = vec![0u64; vocabulary.len()];
    for record in dataset.records() {
        if let Some((cond_index, id)) = condition {
            if record.value(cond_index) != DataValue::Category(id) {
                continue;
            }
        }
        if let Some(id) = record.value(index).category() {
            counts[id as usize] += 1;
        }
    }

    Ok(Some(ClassDistribution {
        attribute: attribute.name.clone(),
        counts,
    }))
}

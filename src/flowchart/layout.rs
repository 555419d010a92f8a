//! Flowchart layout engine: converts a parsed outline into a positioned
//! node/edge graph.
//!
//! DESIGN
//! ======
//! The graph is a depth-2 tree: one root node (the role), one node per
//! section, one node per item. Positions are deterministic — a fixed center
//! column for the root and sections, items split into a left and a right
//! column packed downward from their section's start row. Node ids derive
//! from structural position only, so re-running layout on identical input
//! reproduces identical ids (required by the layout cache and by UI diffing).
//!
//! Layout is a pure, total function of its input; the only guarded edge case
//! is the modulo in item packing, which is skipped entirely for sections
//! without items.

use serde::{Deserialize, Serialize};

use super::outline::OutlineSection;

// Layout constants (logical pixels).
pub const CENTER_X: f64 = 500.0;
pub const LEFT_COLUMN_X: f64 = 300.0;
pub const RIGHT_COLUMN_X: f64 = 700.0;
pub const ROOT_Y: f64 = 0.0;
pub const FIRST_SECTION_Y: f64 = 100.0;
pub const SECTION_GAP: f64 = 100.0;
pub const ITEM_SPACING: f64 = 100.0;
pub const BOTTOM_PADDING: f64 = 100.0;

pub const ROOT_ID: &str = "root";

const ROOT_STYLE: &str = "milestone";
const SECTION_STYLE: &str = "milestone";
const ITEM_STYLE: &str = "topic";
const EDGE_STYLE: &str = "dashed";

/// 2D coordinates assigned to a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Structural role of a node within the flowchart tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Section,
    Item,
}

/// A positioned flowchart node, ready for the rendering widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub position: Position,
    /// Style hint consumed by the renderer; carries no layout meaning.
    pub style: String,
}

/// A directed edge between two flowchart nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: String,
}

/// A completed layout: flat node/edge collections plus the canvas height the
/// renderer should reserve for a scrollable viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flowchart {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub canvas_height: f64,
}

/// Which stage of the incremental reveal a step belongs to. Consumers pick
/// pacing per stage (sections pause longer than items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealStage {
    Root,
    Section,
    Item,
}

/// One emission step of the layout: a node, its incoming edge (absent for
/// the root), and the reveal stage it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct LayoutStep {
    pub stage: RevealStage,
    pub node: GraphNode,
    pub edge: Option<GraphEdge>,
}

/// Lay out a flowchart for `root_label` over `sections`.
#[must_use]
pub fn layout(root_label: &str, sections: &[OutlineSection]) -> Flowchart {
    layout_namespaced(None, root_label, sections)
}

/// Lay out a flowchart with every id prefixed by `namespace`.
///
/// The batch view renders several flowcharts into one canvas widget and needs
/// ids that do not collide across members; the interactive view passes no
/// namespace and gets the canonical `root` / `section-{i}` / `item-{i}-{j}`
/// ids.
#[must_use]
pub fn layout_namespaced(namespace: Option<&str>, root_label: &str, sections: &[OutlineSection]) -> Flowchart {
    let (steps, canvas_height) = build_steps(namespace, root_label, sections);
    let mut nodes = Vec::with_capacity(steps.len());
    let mut edges = Vec::with_capacity(steps.len().saturating_sub(1));
    for step in steps {
        nodes.push(step.node);
        if let Some(edge) = step.edge {
            edges.push(edge);
        }
    }
    Flowchart { nodes, edges, canvas_height }
}

/// Compute the full emission plan: one step per node, in reveal order, plus
/// the final canvas height. Shared by [`layout_namespaced`] and the
/// incremental reveal stream so the two can never drift.
pub(crate) fn build_steps(
    namespace: Option<&str>,
    root_label: &str,
    sections: &[OutlineSection],
) -> (Vec<LayoutStep>, f64) {
    let qualify = |id: &str| -> String {
        match namespace {
            Some(ns) => format!("{ns}:{id}"),
            None => id.to_owned(),
        }
    };

    let mut steps = Vec::new();

    let root_id = qualify(ROOT_ID);
    steps.push(LayoutStep {
        stage: RevealStage::Root,
        node: GraphNode {
            id: root_id.clone(),
            label: root_label.to_owned(),
            kind: NodeKind::Root,
            position: Position { x: CENTER_X, y: ROOT_Y },
            style: ROOT_STYLE.to_owned(),
        },
        edge: None,
    });

    let mut cursor = FIRST_SECTION_Y;

    for (section_index, section) in sections.iter().enumerate() {
        let section_start_y = cursor;
        #[allow(clippy::cast_precision_loss)]
        {
            cursor += SECTION_GAP + ITEM_SPACING * section.items.len() as f64;
        }

        let section_id = qualify(&format!("section-{section_index}"));
        steps.push(LayoutStep {
            stage: RevealStage::Section,
            node: GraphNode {
                id: section_id.clone(),
                label: section.title.clone(),
                kind: NodeKind::Section,
                position: Position { x: CENTER_X, y: section_start_y },
                style: SECTION_STYLE.to_owned(),
            },
            edge: Some(GraphEdge {
                id: qualify(&format!("edge-root-section-{section_index}")),
                source: root_id.clone(),
                target: section_id.clone(),
                style: EDGE_STYLE.to_owned(),
            }),
        });

        if section.items.is_empty() {
            continue;
        }

        // First ceil(n/2) items go in the left column, the rest in the right.
        // Each column packs downward from the section's start row, so the two
        // columns run in parallel rather than one continuing below the other.
        let half = section.items.len().div_ceil(2);

        for (item_index, item) in section.items.iter().enumerate() {
            let x = if item_index < half { LEFT_COLUMN_X } else { RIGHT_COLUMN_X };
            #[allow(clippy::cast_precision_loss)]
            let y = section_start_y + ITEM_SPACING * ((item_index % half) as f64);

            let item_id = qualify(&format!("item-{section_index}-{item_index}"));
            steps.push(LayoutStep {
                stage: RevealStage::Item,
                node: GraphNode {
                    id: item_id.clone(),
                    label: item.clone(),
                    kind: NodeKind::Item,
                    position: Position { x, y },
                    style: ITEM_STYLE.to_owned(),
                },
                edge: Some(GraphEdge {
                    id: qualify(&format!("edge-section-{section_index}-item-{section_index}-{item_index}")),
                    source: section_id.clone(),
                    target: item_id.clone(),
                    style: EDGE_STYLE.to_owned(),
                }),
            });
        }
    }

    (steps, cursor + BOTTOM_PADDING)
}

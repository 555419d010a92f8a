//! Incremental reveal of a flowchart layout.
//!
//! DESIGN
//! ======
//! The reveal is a lazy, finite sequence of growing `(nodes, edges)`
//! snapshots: one after the root, one after each section node+edge, one
//! after each item node+edge. Sections and their items are emitted fully, in
//! order, before the next section begins. The stream carries no wall-clock
//! pacing — each snapshot is tagged with its [`RevealStage`] and the
//! presentation layer decides how long to pause per stage (or consumes the
//! whole stream at once for a non-animated build).
//!
//! Cancellation is cooperative: a shared [`CancelFlag`] is checked before
//! every yield, and once signaled the stream stops emitting without error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::layout::{Flowchart, GraphEdge, GraphNode, LayoutStep, RevealStage, build_steps};
use super::outline::OutlineSection;

/// Shared cancellation signal for an in-progress reveal. Cloning hands out
/// another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One snapshot of the growing graph: everything emitted so far.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RevealFrame {
    pub stage: RevealStage,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Iterator of reveal snapshots for one layout.
pub struct RevealStream {
    steps: std::vec::IntoIter<LayoutStep>,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    canvas_height: f64,
    cancel: CancelFlag,
    complete: bool,
}

impl RevealStream {
    #[must_use]
    pub fn new(namespace: Option<&str>, root_label: &str, sections: &[OutlineSection], cancel: CancelFlag) -> Self {
        let (steps, canvas_height) = build_steps(namespace, root_label, sections);
        Self {
            steps: steps.into_iter(),
            nodes: Vec::new(),
            edges: Vec::new(),
            canvas_height,
            cancel,
            complete: false,
        }
    }

    #[must_use]
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// True once every step has been emitted (never set by cancellation).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Consume the stream and return the completed layout, if the stream ran
    /// to the end. A cancelled or partially-consumed stream returns `None` —
    /// partial layouts must never reach the cache.
    #[must_use]
    pub fn into_flowchart(self) -> Option<Flowchart> {
        if self.complete {
            Some(Flowchart { nodes: self.nodes, edges: self.edges, canvas_height: self.canvas_height })
        } else {
            None
        }
    }
}

impl Iterator for RevealStream {
    type Item = RevealFrame;

    fn next(&mut self) -> Option<RevealFrame> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let step = self.steps.next()?;
        self.nodes.push(step.node);
        if let Some(edge) = step.edge {
            self.edges.push(edge);
        }
        if self.steps.len() == 0 {
            self.complete = true;
        }
        Some(RevealFrame { stage: step.stage, nodes: self.nodes.clone(), edges: self.edges.clone() })
    }
}

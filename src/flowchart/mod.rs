//! Roadmap flowchart core: outline parsing, deterministic layout,
//! incremental reveal, and content-keyed memoization.
//!
//! Raw roadmap text is parsed into ordered [`OutlineSection`]s, laid out as a
//! depth-2 tree (role → sections → items) with fixed-column positioning, and
//! optionally revealed incrementally for animated display. Completed layouts
//! are memoized in an injected [`LayoutCache`] keyed by input content.

pub mod cache;
pub mod layout;
pub mod outline;
pub mod reveal;

pub use cache::{Fingerprint, LayoutCache, layout_cached};
pub use layout::{Flowchart, GraphEdge, GraphNode, NodeKind, ROOT_ID, RevealStage, layout, layout_namespaced};
pub use outline::{OutlineSection, parse_outline, to_outline_text};
pub use reveal::{CancelFlag, RevealFrame, RevealStream};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

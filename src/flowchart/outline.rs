//! Roadmap outline parser.
//!
//! Roadmap text arrives from the roadmap-generation API as a loose markdown
//! outline: an optional `# ` document title, `@ROADMAPID` / `@ROADMAPSLUG`
//! metadata tags, `### ` section headings, and `- ` bullet items. Everything
//! else is treated as noise, never as an error — malformed input degrades to
//! fewer (or zero) sections.

use serde::{Deserialize, Serialize};

/// Metadata tags emitted by the roadmap API ahead of the outline proper.
const METADATA_PREFIXES: &[&str] = &["@ROADMAPID", "@ROADMAPSLUG"];

/// Canonical section heading marker. Both the interactive and the batch
/// views parse with this depth; see DESIGN.md for the depth unification.
const SECTION_MARKER: &str = "### ";

const ITEM_MARKER: &str = "- ";
const TITLE_MARKER: &str = "# ";

/// A titled group of bullet items parsed from roadmap text.
///
/// Ordering is significant at both levels and is preserved through layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub title: String,
    pub items: Vec<String>,
}

/// Parse a roadmap outline into ordered sections.
///
/// Line rules, applied to each trimmed line:
/// - blank, metadata-tagged, and `# ` title lines are skipped
/// - `### ` opens a new section (finalizing the previous one)
/// - `- ` appends an item to the current section; bullets before the first
///   heading have no section to attach to and are dropped
/// - anything else is ignored
///
/// Input with no recognized headings yields an empty vector, not an error.
#[must_use]
pub fn parse_outline(raw: &str) -> Vec<OutlineSection> {
    let mut sections = Vec::new();
    let mut current: Option<OutlineSection> = None;

    for line in raw.lines() {
        let line = line.trim();

        if line.is_empty()
            || line.starts_with(TITLE_MARKER)
            || METADATA_PREFIXES.iter().any(|p| line.starts_with(p))
        {
            continue;
        }

        if let Some(title) = line.strip_prefix(SECTION_MARKER) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(OutlineSection { title: title.trim().to_owned(), items: Vec::new() });
        } else if let Some(item) = line.strip_prefix(ITEM_MARKER) {
            if let Some(section) = current.as_mut() {
                section.items.push(item.trim().to_owned());
            }
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    sections
}

/// Re-serialize sections into the canonical outline form accepted by
/// [`parse_outline`]. Used by the outline view and by round-trip tests.
#[must_use]
pub fn to_outline_text(sections: &[OutlineSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(SECTION_MARKER);
        out.push_str(&section.title);
        out.push('\n');
        for item in &section.items {
            out.push_str(ITEM_MARKER);
            out.push_str(item);
            out.push('\n');
        }
    }
    out
}

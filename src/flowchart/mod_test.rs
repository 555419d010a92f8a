//! Tests for the outline parser, layout engine, reveal stream, and cache.

use std::sync::Arc;

use super::layout::{
    BOTTOM_PADDING, CENTER_X, FIRST_SECTION_Y, ITEM_SPACING, LEFT_COLUMN_X, RIGHT_COLUMN_X, ROOT_ID, ROOT_Y,
    SECTION_GAP,
};
use super::*;

fn section(title: &str, items: &[&str]) -> OutlineSection {
    OutlineSection { title: title.to_owned(), items: items.iter().map(|s| (*s).to_owned()).collect() }
}

// =============================================================================
// PARSER TESTS
// =============================================================================

#[test]
fn parse_sections_and_items_in_order() {
    let input = "### Learn Basics\n- Variables\n- Loops\n### Build Projects\n- Todo App\n";
    let sections = parse_outline(input);
    assert_eq!(sections, vec![section("Learn Basics", &["Variables", "Loops"]), section("Build Projects", &["Todo App"])]);
}

#[test]
fn parse_skips_title_and_metadata_lines() {
    let input = "\
@ROADMAPID: abc-123
@ROADMAPSLUG: backend
# Backend Developer Roadmap

### Fundamentals
- HTTP
";
    let sections = parse_outline(input);
    assert_eq!(sections, vec![section("Fundamentals", &["HTTP"])]);
}

#[test]
fn parse_drops_bullets_before_first_heading() {
    let input = "- orphan item\n### Real Section\n- kept item\n";
    let sections = parse_outline(input);
    assert_eq!(sections, vec![section("Real Section", &["kept item"])]);
}

#[test]
fn parse_ignores_unrecognized_lines() {
    let input = "### Section\nsome prose the model emitted\n- item\n## wrong depth heading\n";
    let sections = parse_outline(input);
    // The `## ` line is neither the canonical heading depth nor a bullet, so
    // it is noise like the prose line.
    assert_eq!(sections, vec![section("Section", &["item"])]);
}

#[test]
fn parse_headingless_input_is_empty_not_error() {
    assert!(parse_outline("").is_empty());
    assert!(parse_outline("just\nplain\ntext\n").is_empty());
}

#[test]
fn parse_trims_whitespace_around_markers() {
    let input = "   ### Padded Title   \n   -   spaced item   \n";
    let sections = parse_outline(input);
    assert_eq!(sections, vec![section("Padded Title", &["spaced item"])]);
}

#[test]
fn parse_section_with_no_items() {
    let sections = parse_outline("### Empty One\n### Second\n- a\n");
    assert_eq!(sections, vec![section("Empty One", &[]), section("Second", &["a"])]);
}

#[test]
fn parse_round_trips_through_canonical_serialization() {
    let input = "# Title\n### Learn Basics\n- Variables\n- Loops\n### Build Projects\n- Todo App\n";
    let first = parse_outline(input);
    let second = parse_outline(&to_outline_text(&first));
    assert_eq!(first, second);
}

// =============================================================================
// LAYOUT TESTS
// =============================================================================

#[test]
fn layout_node_and_edge_counts_match_sections() {
    let sections = vec![section("A", &["a1", "a2", "a3"]), section("B", &[]), section("C", &["c1"])];
    let chart = layout("Role", &sections);

    let section_nodes = chart.nodes.iter().filter(|n| n.kind == NodeKind::Section).count();
    let item_nodes = chart.nodes.iter().filter(|n| n.kind == NodeKind::Item).count();
    assert_eq!(section_nodes, 3);
    assert_eq!(item_nodes, 4);
    assert_eq!(chart.nodes.len(), 1 + 3 + 4);
    assert_eq!(chart.edges.len(), 3 + 4);
}

#[test]
fn layout_edge_sources_form_a_depth_two_tree() {
    let sections = vec![section("A", &["a1", "a2"]), section("B", &["b1"])];
    let chart = layout("Role", &sections);

    for edge in &chart.edges {
        if edge.target.starts_with("section-") {
            assert_eq!(edge.source, ROOT_ID);
        } else {
            // item-{s}-{i} hangs off section-{s}
            let rest = edge.target.strip_prefix("item-").unwrap();
            let section_index = rest.split('-').next().unwrap();
            assert_eq!(edge.source, format!("section-{section_index}"));
        }
    }
}

#[test]
fn layout_empty_items_section_has_node_but_no_items() {
    let chart = layout("Role", &[section("Intro", &[])]);
    assert_eq!(chart.nodes.len(), 2);
    assert_eq!(chart.edges.len(), 1);
    assert!((chart.canvas_height - (FIRST_SECTION_Y + SECTION_GAP + BOTTOM_PADDING)).abs() < f64::EPSILON);
}

#[test]
fn layout_single_item_goes_left() {
    let chart = layout("Role", &[section("S", &["only"])]);
    let item = chart.nodes.iter().find(|n| n.kind == NodeKind::Item).unwrap();
    assert!((item.position.x - LEFT_COLUMN_X).abs() < f64::EPSILON);
    assert!((item.position.y - FIRST_SECTION_Y).abs() < f64::EPSILON);
}

#[test]
fn layout_items_split_into_parallel_columns() {
    // Five items: ceil(5/2) = 3 left, 2 right, both columns packed from the
    // section's start row.
    let chart = layout("Role", &[section("S", &["a", "b", "c", "d", "e"])]);
    let items: Vec<_> = chart.nodes.iter().filter(|n| n.kind == NodeKind::Item).collect();
    assert_eq!(items.len(), 5);

    let xs: Vec<f64> = items.iter().map(|n| n.position.x).collect();
    assert_eq!(xs, vec![LEFT_COLUMN_X, LEFT_COLUMN_X, LEFT_COLUMN_X, RIGHT_COLUMN_X, RIGHT_COLUMN_X]);

    let ys: Vec<f64> = items.iter().map(|n| n.position.y).collect();
    let base = FIRST_SECTION_Y;
    assert_eq!(
        ys,
        vec![base, base + ITEM_SPACING, base + 2.0 * ITEM_SPACING, base, base + ITEM_SPACING]
    );
}

#[test]
fn layout_sections_reserve_space_for_their_items() {
    let sections = vec![section("A", &["a1", "a2"]), section("B", &["b1"])];
    let chart = layout("Role", &sections);

    let find = |id: &str| chart.nodes.iter().find(|n| n.id == id).unwrap();
    assert!((find("section-0").position.y - FIRST_SECTION_Y).abs() < f64::EPSILON);
    // Section B starts below A's gap + 2 items worth of spacing.
    let expected_b = FIRST_SECTION_Y + SECTION_GAP + 2.0 * ITEM_SPACING;
    assert!((find("section-1").position.y - expected_b).abs() < f64::EPSILON);
    // Height: B's row + gap + 1 item + padding.
    let expected_height = expected_b + SECTION_GAP + ITEM_SPACING + BOTTOM_PADDING;
    assert!((chart.canvas_height - expected_height).abs() < f64::EPSILON);
}

#[test]
fn layout_root_and_sections_sit_on_center_column() {
    let chart = layout("Role", &[section("A", &["a1"]), section("B", &[])]);
    for node in &chart.nodes {
        if node.kind != NodeKind::Item {
            assert!((node.position.x - CENTER_X).abs() < f64::EPSILON);
        }
    }
    let root = chart.nodes.iter().find(|n| n.id == ROOT_ID).unwrap();
    assert_eq!(root.label, "Role");
    assert!((root.position.y - ROOT_Y).abs() < f64::EPSILON);
}

#[test]
fn layout_namespace_prefixes_every_id() {
    let chart = layout_namespaced(Some("member-2"), "Role", &[section("A", &["a1"])]);
    for node in &chart.nodes {
        assert!(node.id.starts_with("member-2:"), "node id {} not namespaced", node.id);
    }
    for edge in &chart.edges {
        assert!(edge.id.starts_with("member-2:"));
        assert!(edge.source.starts_with("member-2:"));
        assert!(edge.target.starts_with("member-2:"));
    }
}

#[test]
fn layout_end_to_end_from_raw_text() {
    let input = "# Title\n### Learn Basics\n- Variables\n- Loops\n### Build Projects\n- Todo App\n";
    let sections = parse_outline(input);
    let chart = layout("Frontend Developer", &sections);

    assert_eq!(chart.nodes.len(), 6);
    assert_eq!(chart.edges.len(), 5);

    let find = |label: &str| chart.nodes.iter().find(|n| n.label == label).unwrap();
    // Sole/first items land in the left column.
    assert!((find("Variables").position.x - LEFT_COLUMN_X).abs() < f64::EPSILON);
    assert!((find("Todo App").position.x - LEFT_COLUMN_X).abs() < f64::EPSILON);
}

#[test]
fn layout_is_deterministic() {
    let sections = vec![section("A", &["a1", "a2"]), section("B", &["b1"])];
    assert_eq!(layout("Role", &sections), layout("Role", &sections));
}

// =============================================================================
// CACHE TESTS
// =============================================================================

#[test]
fn cache_hit_returns_the_same_arc_without_recompute() {
    let cache = LayoutCache::new();
    let sections = vec![section("A", &["a1"])];

    let first = layout_cached(&cache, None, "Role", &sections);
    let second = layout_cached(&cache, None, "Role", &sections);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cache_distinguishes_role_sections_and_namespace() {
    let cache = LayoutCache::new();
    let sections = vec![section("A", &["a1"])];

    let _ = layout_cached(&cache, None, "Role", &sections);
    let _ = layout_cached(&cache, None, "Other Role", &sections);
    let _ = layout_cached(&cache, Some("member-0"), "Role", &sections);

    assert_eq!(cache.len(), 3);
}

#[test]
fn cache_evicts_in_insertion_order_past_capacity() {
    let cache = LayoutCache::with_capacity(2);
    let a = Fingerprint::of(None, "A", &[]);
    let b = Fingerprint::of(None, "B", &[]);
    let c = Fingerprint::of(None, "C", &[]);

    cache.insert(a.clone(), layout("A", &[]));
    cache.insert(b.clone(), layout("B", &[]));
    cache.insert(c.clone(), layout("C", &[]));

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&a).is_none());
    assert!(cache.get(&b).is_some());
    assert!(cache.get(&c).is_some());
}

#[test]
fn cache_reinsert_replaces_without_duplicate_eviction_slot() {
    let cache = LayoutCache::with_capacity(2);
    let a = Fingerprint::of(None, "A", &[]);
    cache.insert(a.clone(), layout("A", &[]));
    cache.insert(a.clone(), layout("A", &[]));
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&a).is_some());
}

#[test]
fn fingerprint_is_stable_for_identical_input() {
    let sections = vec![section("A", &["a1", "a2"])];
    assert_eq!(Fingerprint::of(None, "Role", &sections), Fingerprint::of(None, "Role", &sections));
    assert_ne!(Fingerprint::of(None, "Role", &sections), Fingerprint::of(None, "Role", &[]));
}

// =============================================================================
// REVEAL TESTS
// =============================================================================

#[test]
fn reveal_emits_one_snapshot_per_node() {
    let sections = vec![section("A", &["a1", "a2"]), section("B", &["b1"])];
    let frames: Vec<RevealFrame> = RevealStream::new(None, "Role", &sections, CancelFlag::new()).collect();

    // root + 2 sections + 3 items
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0].stage, RevealStage::Root);
    assert_eq!(frames[0].nodes.len(), 1);
    assert!(frames[0].edges.is_empty());

    // Snapshots only ever grow.
    for pair in frames.windows(2) {
        assert!(pair[1].nodes.len() == pair[0].nodes.len() + 1);
        assert!(pair[1].edges.len() >= pair[0].edges.len());
    }
}

#[test]
fn reveal_emits_sections_before_their_items_in_order() {
    let sections = vec![section("A", &["a1"]), section("B", &["b1"])];
    let stages: Vec<RevealStage> = RevealStream::new(None, "Role", &sections, CancelFlag::new())
        .map(|f| f.stage)
        .collect();
    assert_eq!(
        stages,
        vec![RevealStage::Root, RevealStage::Section, RevealStage::Item, RevealStage::Section, RevealStage::Item]
    );
}

#[test]
fn reveal_final_snapshot_matches_batch_layout() {
    let sections = vec![section("A", &["a1", "a2", "a3"]), section("B", &[])];
    let mut stream = RevealStream::new(None, "Role", &sections, CancelFlag::new());
    let mut last = None;
    for frame in stream.by_ref() {
        last = Some(frame);
    }

    let chart = layout("Role", &sections);
    let last = last.unwrap();
    assert_eq!(last.nodes, chart.nodes);
    assert_eq!(last.edges, chart.edges);
    assert!(stream.is_complete());
    assert_eq!(stream.into_flowchart(), Some(chart));
}

#[test]
fn reveal_cancellation_stops_emission() {
    let sections = vec![section("A", &["a1", "a2"]), section("B", &["b1"])];
    let cancel = CancelFlag::new();
    let mut stream = RevealStream::new(None, "Role", &sections, cancel.clone());

    assert!(stream.next().is_some());
    assert!(stream.next().is_some());
    cancel.cancel();
    assert!(stream.next().is_none());
    assert!(!stream.is_complete());
    // A cancelled stream never produces a layout for the cache.
    assert_eq!(stream.into_flowchart(), None);
}

#[test]
fn reveal_of_empty_outline_is_just_the_root() {
    let frames: Vec<RevealFrame> = RevealStream::new(None, "Role", &[], CancelFlag::new()).collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].nodes[0].id, ROOT_ID);
}

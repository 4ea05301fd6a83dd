//! The free-tier limiter: caps a model at a maximum tab count.
//!
//! Border regions are processed first, in declaration order, so border
//! tabs win over layout tabs when both compete for the budget.  The main
//! tree is then descended left to right, deducting each kept child's
//! *actual* consumed tab count before moving to the next sibling.
//!
//! Structural validity is maintained throughout: a container that would
//! end up childless is replaced by an empty `tabset` placeholder, and an
//! exhausted budget replaces the whole layout root with a placeholder of
//! the same top-level variant.  The input is never mutated.

use tracing::debug;

use super::node::{BorderRegion, ContainerAttrs, LayoutNode};
use super::LayoutModel;

/// Returns a new model containing at most `free_limit` tabs.
///
/// `free_limit == 0` drops every tab, producing only placeholders; a
/// limit at or above the total tab count is a structural no-op (deep
/// copy).  Applying the limiter twice with the same limit yields the
/// same model as applying it once.
pub fn limit_to_free_tier(model: &LayoutModel, free_limit: usize) -> LayoutModel {
    debug!(free_limit, "applying free-tier tab limit");

    let mut limited = model.clone();
    let mut remaining = free_limit;

    // Borders consume budget before the layout tree is touched.
    for border in &mut limited.borders {
        limit_border(border, &mut remaining);
    }

    if let Some(root) = limited.layout.take() {
        limited.layout = Some(if remaining > 0 {
            limit_node(root, &mut remaining).unwrap_or_else(LayoutNode::empty_tabset)
        } else {
            empty_root_like(&root)
        });
    }

    limited
}

/// Keeps up to `remaining` of a border's tab children, in original order.
/// Non-tab children are left in place; they carry no tab budget.
fn limit_border(border: &mut BorderRegion, remaining: &mut usize) {
    let children = std::mem::take(&mut border.children);
    border.children = children
        .into_iter()
        .filter(|child| {
            if !child.is_tab() {
                return true;
            }
            if *remaining > 0 {
                *remaining -= 1;
                true
            } else {
                false
            }
        })
        .collect();
}

/// Recursively limits one layout node.
///
/// Returns `None` only for a `Tab` leaf once the budget is exhausted;
/// containers always come back (possibly as placeholders) so the tree
/// stays renderable.
fn limit_node(node: LayoutNode, remaining: &mut usize) -> Option<LayoutNode> {
    match node {
        LayoutNode::Tab(attrs) => {
            if *remaining > 0 {
                *remaining -= 1;
                Some(LayoutNode::Tab(attrs))
            } else {
                None
            }
        }
        LayoutNode::TabSet(mut attrs) => {
            let tab_count = attrs.children.iter().filter(|c| c.is_tab()).count();
            if tab_count <= *remaining {
                // Everything fits: keep the set unmodified.
                *remaining -= tab_count;
            } else {
                // Truncate to the first `remaining` tabs and zero out.
                let keep = *remaining;
                *remaining = 0;
                attrs.children = attrs
                    .children
                    .into_iter()
                    .filter(LayoutNode::is_tab)
                    .take(keep)
                    .collect();
            }
            Some(LayoutNode::TabSet(attrs))
        }
        LayoutNode::Row(attrs) => Some(LayoutNode::Row(limit_container(attrs, remaining))),
        LayoutNode::Column(attrs) => Some(LayoutNode::Column(limit_container(attrs, remaining))),
        // Unrecognized shapes are skipped: kept verbatim, no budget used.
        LayoutNode::Unknown(value) => Some(LayoutNode::Unknown(value)),
    }
}

/// Limits a row/column's children left to right.  Once the budget hits
/// zero the remaining siblings are dropped.
fn limit_container(mut attrs: ContainerAttrs, remaining: &mut usize) -> ContainerAttrs {
    let children = std::mem::take(&mut attrs.children);
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        if *remaining == 0 {
            break;
        }
        if let Some(limited) = limit_node(child, remaining) {
            kept.push(limited);
        }
    }

    if kept.is_empty() {
        kept.push(LayoutNode::empty_tabset());
    }
    attrs.children = kept;
    attrs
}

/// An empty placeholder matching the top-level variant of `root`.
fn empty_root_like(root: &LayoutNode) -> LayoutNode {
    match root {
        LayoutNode::TabSet(_) => LayoutNode::empty_tabset(),
        LayoutNode::Column(_) => LayoutNode::Column(placeholder_container()),
        _ => LayoutNode::Row(placeholder_container()),
    }
}

fn placeholder_container() -> ContainerAttrs {
    ContainerAttrs {
        weight: Some(100.0),
        children: vec![LayoutNode::empty_tabset()],
        ..ContainerAttrs::default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::count::count_tabs;
    use crate::model::node::BorderLocation;

    fn tabs(ids: &[&str]) -> Vec<LayoutNode> {
        ids.iter().map(|id| LayoutNode::tab(*id)).collect()
    }

    fn border_with(ids: &[&str]) -> BorderRegion {
        let mut border = BorderRegion::new(BorderLocation::Bottom);
        border.children = tabs(ids);
        border
    }

    #[test]
    fn test_limit_zero_strips_all_tabs() {
        // Arrange
        let model = LayoutModel {
            borders: vec![border_with(&["b1"])],
            layout: Some(LayoutNode::tabset(tabs(&["a", "b"]))),
            ..LayoutModel::default()
        };

        // Act
        let limited = limit_to_free_tier(&model, 0);

        // Assert: no tabs anywhere, placeholder layout remains.
        assert_eq!(count_tabs(&limited).total, 0);
        assert_eq!(limited.layout, Some(LayoutNode::empty_tabset()));
        assert!(limited.borders[0].children.is_empty());
    }

    #[test]
    fn test_limit_above_total_is_deep_copy() {
        let model = LayoutModel {
            borders: vec![border_with(&["b1"])],
            layout: Some(LayoutNode::row(vec![LayoutNode::tabset(tabs(&["a"]))])),
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 10);
        assert_eq!(limited, model);
    }

    #[test]
    fn test_borders_consume_budget_first() {
        // 2 border tabs + 5 layout tabs, limit 3 → keep 2 border + 1 layout.
        let model = LayoutModel {
            borders: vec![border_with(&["b1", "b2"])],
            layout: Some(LayoutNode::tabset(tabs(&["a", "b", "c", "d", "e"]))),
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 3);
        let counts = count_tabs(&limited);
        assert_eq!(counts.border_tabs, 2);
        assert_eq!(counts.layout_tabs, 1);
    }

    #[test]
    fn test_border_tabs_kept_in_original_order() {
        let model = LayoutModel {
            borders: vec![border_with(&["b1", "b2", "b3"])],
            layout: None,
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 2);
        let ids: Vec<_> = limited.borders[0]
            .children
            .iter()
            .map(|c| match c {
                LayoutNode::Tab(attrs) => attrs.id.clone().unwrap(),
                other => panic!("unexpected child: {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn test_second_border_stripped_when_first_exhausts_budget() {
        let mut top = BorderRegion::new(BorderLocation::Top);
        top.children = tabs(&["t1", "t2"]);
        let model = LayoutModel {
            borders: vec![top, border_with(&["b1"])],
            layout: None,
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 2);
        assert_eq!(limited.borders[0].children.len(), 2);
        assert!(limited.borders[1].children.is_empty());
    }

    #[test]
    fn test_tabset_truncates_to_first_tabs() {
        let model = LayoutModel {
            layout: Some(LayoutNode::tabset(tabs(&["a", "b", "c", "d"]))),
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 2);
        let Some(LayoutNode::TabSet(attrs)) = &limited.layout else {
            panic!("expected a tabset root");
        };
        let ids: Vec<_> = attrs
            .children
            .iter()
            .filter_map(|c| match c {
                LayoutNode::Tab(t) => t.id.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_row_keeps_first_tabset_and_truncates_second() {
        // Row of two tab sets with 2 tabs each, limit 3 → first intact,
        // second truncated to 1.
        let model = LayoutModel {
            layout: Some(LayoutNode::row(vec![
                LayoutNode::tabset(tabs(&["a", "b"])),
                LayoutNode::tabset(tabs(&["c", "d"])),
            ])),
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 3);
        let Some(LayoutNode::Row(row)) = &limited.layout else {
            panic!("expected a row root");
        };
        assert_eq!(row.children.len(), 2);

        let LayoutNode::TabSet(first) = &row.children[0] else {
            panic!("expected a tabset");
        };
        let LayoutNode::TabSet(second) = &row.children[1] else {
            panic!("expected a tabset");
        };
        assert_eq!(first.children.len(), 2);
        assert_eq!(second.children.len(), 1);
    }

    #[test]
    fn test_exhausted_row_replaces_root_with_same_variant_placeholder() {
        // All budget goes to the border; a row root becomes a row
        // wrapping one empty tab set.
        let model = LayoutModel {
            borders: vec![border_with(&["b1"])],
            layout: Some(LayoutNode::row(vec![LayoutNode::tabset(tabs(&["a"]))])),
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 1);
        let Some(LayoutNode::Row(row)) = &limited.layout else {
            panic!("expected a row placeholder");
        };
        assert_eq!(row.children, vec![LayoutNode::empty_tabset()]);
    }

    #[test]
    fn test_unknown_nodes_pass_through_without_budget() {
        let unknown = LayoutNode::Unknown(serde_json::json!({ "type": "floating" }));
        let model = LayoutModel {
            layout: Some(LayoutNode::row(vec![
                unknown.clone(),
                LayoutNode::tabset(tabs(&["a", "b"])),
            ])),
            ..LayoutModel::default()
        };

        let limited = limit_to_free_tier(&model, 1);
        let Some(LayoutNode::Row(row)) = &limited.layout else {
            panic!("expected a row root");
        };
        assert_eq!(row.children[0], unknown);
        assert_eq!(count_tabs(&limited).total, 1);
    }

    #[test]
    fn test_input_model_is_not_mutated() {
        let model = LayoutModel {
            layout: Some(LayoutNode::tabset(tabs(&["a", "b", "c"]))),
            ..LayoutModel::default()
        };
        let snapshot = model.clone();

        let _ = limit_to_free_tier(&model, 1);
        assert_eq!(model, snapshot);
    }
}

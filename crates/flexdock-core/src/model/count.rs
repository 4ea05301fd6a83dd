//! Tab counting over a [`LayoutModel`].

use super::node::LayoutNode;
use super::LayoutModel;

/// Tab counts broken down by where the tabs live.
///
/// Invariant: `total == border_tabs + layout_tabs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabCount {
    /// All tabs in the model.
    pub total: usize,
    /// Tabs inside border regions.
    pub border_tabs: usize,
    /// Tabs inside the main layout tree.
    pub layout_tabs: usize,
}

/// Counts the tabs in a model.
///
/// Pure and total: a model with no borders and no layout yields all-zero
/// counts.  Only `Tab` leaves count; unknown node shapes count as zero.
pub fn count_tabs(model: &LayoutModel) -> TabCount {
    let border_tabs = model
        .borders
        .iter()
        .map(|border| border.children.iter().filter(|c| c.is_tab()).count())
        .sum();

    let layout_tabs = model.layout.as_ref().map_or(0, count_in_node);

    TabCount {
        total: border_tabs + layout_tabs,
        border_tabs,
        layout_tabs,
    }
}

/// Returns `true` if the model holds more tabs than the free tier allows.
pub fn exceeds_free_tier_limit(model: &LayoutModel, free_limit: usize) -> bool {
    count_tabs(model).total > free_limit
}

/// Recursively counts tabs under one layout node.
pub(crate) fn count_in_node(node: &LayoutNode) -> usize {
    match node {
        LayoutNode::Tab(_) => 1,
        LayoutNode::TabSet(attrs) | LayoutNode::Row(attrs) | LayoutNode::Column(attrs) => {
            attrs.children.iter().map(count_in_node).sum()
        }
        LayoutNode::Unknown(_) => 0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

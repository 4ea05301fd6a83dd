//! # flexdock-core
//!
//! Pure domain layer for FlexDock: the JSON layout tree model, tab
//! counting, and the free-tier tab limiter.
//!
//! This crate has zero dependencies on the network, the host UI framework,
//! or any async runtime.  Everything in it is a pure data transformation
//! over the [`model::LayoutModel`] tree, which makes it trivially
//! unit-testable and reusable from any outer layer.
//!
//! # Architecture overview
//!
//! A docking layout is a tree: `Row`s and `Column`s nest arbitrarily,
//! `TabSet`s hold the actual `Tab` leaves, and `BorderRegion`s pin extra
//! tabs to the window edges outside the main tree.  The model is defined
//! and consumed by the rendering widget as JSON; this crate mirrors that
//! JSON shape with typed structs so the transforms cannot produce a tree
//! the renderer would reject.
//!
//! The two operations that matter:
//!
//! - **`count_tabs`** — walks the model and reports how many tabs live in
//!   the borders and in the layout tree.
//! - **`limit_to_free_tier`** — produces a *new* model with at most `N`
//!   tabs, preferring border tabs over layout tabs, and substituting empty
//!   tab-set placeholders wherever a container would otherwise end up
//!   childless (an empty container breaks the renderer; an empty tab set
//!   does not).

pub mod model;

// Re-export the most-used items at the crate root so callers can write
// `flexdock_core::LayoutModel` instead of `flexdock_core::model::LayoutModel`.
pub use model::count::{count_tabs, exceeds_free_tier_limit, TabCount};
pub use model::error::ModelError;
pub use model::limit::limit_to_free_tier;
pub use model::node::{BorderLocation, BorderRegion, ContainerAttrs, LayoutNode, TabAttrs};
pub use model::LayoutModel;

/// Default maximum number of tabs in the free tier.
pub const DEFAULT_FREE_TAB_LIMIT: usize = 3;

//! # flexdock-widget
//!
//! The host-facing glue around `flexdock-core` and `flexdock-license`:
//! everything a UI host needs to present the *right* layout model, minus
//! the rendering itself (the docking renderer is an external dependency).
//!
//! # Architecture
//!
//! ```text
//! Host framework (props, children, theme attribute)
//!         ↕
//! [flexdock-widget]
//!   ├── gating/     LicenseState machine + model selection policy
//!   ├── component/  DockWidget: props, presentation, model-change callback
//!   ├── theme/      ColorScheme + ThemeSource bridge to the host theme
//!   └── identity/   Child-identity resolution across host contract versions
//!         ↕
//! flexdock-core   (pure model transforms)
//! flexdock-license (remote validation + cache)
//! ```
//!
//! # Layer rules
//!
//! - `gating` depends on the core transforms and the validation verdict
//!   type only; it performs no I/O itself.
//! - `component` orchestrates gating and validation; the network call in
//!   [`component::DockWidget::revalidate`] is the crate's only suspension
//!   point.
//! - `theme` and `identity` are trait seams: the host supplies the
//!   implementations, tests supply mocks.

pub mod component;
pub mod gating;
pub mod identity;
pub mod theme;

pub use component::{DockOptions, DockWidget, COMPONENT_NAME};
pub use gating::{GateDecision, GatingPolicy, LicenseState, ValidationTicket};
pub use identity::{ChildHandle, ChildIdentityResolver, ComponentTree, HostCapabilities};
pub use theme::{ColorScheme, ThemeRelay, ThemeSource, ThemeSubscription};

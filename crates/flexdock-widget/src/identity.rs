//! Child-identity resolution across host render-contract versions.
//!
//! Children are allocated to tabs by matching the tab id against the
//! child's declared id.  Where that id lives depends on the host
//! framework version:
//!
//! - the **modern contract** gives each rendered child a *component
//!   path* and exposes a lookup API ([`ComponentTree`]) that returns the
//!   declaration at that path;
//! - the **legacy contract** embeds the full declaration directly in the
//!   child's props.
//!
//! Rather than two widget implementations, this is a capability
//! dispatch: [`HostCapabilities`] records which contract is active and
//! [`ChildIdentityResolver::resolve`] picks the strategy internally,
//! falling back to a direct `id` prop and finally the render key.
//! Children with no resolvable identity are silently ignored by
//! rendering (callbacks still apply), so `resolve` returns an `Option`
//! rather than an error.

use serde_json::{Map, Value};

/// Which features of the host render contract are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCapabilities {
    /// The host exposes the component-path lookup API (modern contract).
    pub component_path_api: bool,
}

/// A rendered child as handed over by the host framework.
#[derive(Debug, Clone, Default)]
pub struct ChildHandle {
    /// Render key, the last-resort identity.
    pub key: Option<String>,
    /// Path into the host's component tree (modern contract only).
    pub component_path: Option<String>,
    /// Props declared directly on the child element.
    pub props: Map<String, Value>,
    /// The child's declaration as embedded by the legacy contract.
    pub embedded_declaration: Option<Value>,
}

/// Lookup into the host's component tree (modern contract).
#[cfg_attr(test, mockall::automock)]
pub trait ComponentTree {
    /// Props of the declaration at `path`, or `None` if the host does
    /// not know the path.
    fn props_at(&self, path: &str) -> Option<Value>;
}

/// A [`ComponentTree`] for hosts without the lookup API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComponentTree;

impl ComponentTree for NoComponentTree {
    fn props_at(&self, _path: &str) -> Option<Value> {
        None
    }
}

/// Resolves child identities using the host's active contract.
pub struct ChildIdentityResolver {
    caps: HostCapabilities,
    tree: Box<dyn ComponentTree>,
}

impl ChildIdentityResolver {
    /// Builds a resolver for the given capabilities.  Legacy hosts can
    /// pass [`NoComponentTree`].
    pub fn new(caps: HostCapabilities, tree: Box<dyn ComponentTree>) -> Self {
        Self { caps, tree }
    }

    /// A resolver for the legacy contract (no lookup API).
    pub fn legacy() -> Self {
        Self::new(HostCapabilities::default(), Box::new(NoComponentTree))
    }

    /// Resolves the identity used to match this child to a tab.
    pub fn resolve(&self, child: &ChildHandle) -> Option<String> {
        let declared = if self.caps.component_path_api {
            self.resolve_by_path(child)
        } else {
            resolve_embedded(child)
        };

        declared
            .or_else(|| id_prop(&child.props))
            .or_else(|| child.key.clone())
    }

    /// `true` if the child resolves to the given tab id.
    pub fn matches(&self, child: &ChildHandle, tab_id: &str) -> bool {
        self.resolve(child).as_deref() == Some(tab_id)
    }

    /// Filters a child list down to the ones belonging to a tab.
    pub fn matching_children<'a>(
        &self,
        children: &'a [ChildHandle],
        tab_id: &str,
    ) -> Vec<&'a ChildHandle> {
        children
            .iter()
            .filter(|child| self.matches(child, tab_id))
            .collect()
    }

    /// Modern strategy: look the declaration up by component path.
    fn resolve_by_path(&self, child: &ChildHandle) -> Option<String> {
        let path = child.component_path.as_deref()?;
        let props = self.tree.props_at(path)?;
        props
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Legacy strategy: read the declaration embedded in the child's props.
fn resolve_embedded(child: &ChildHandle) -> Option<String> {
    child
        .embedded_declaration
        .as_ref()?
        .get("props")?
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A direct `id` prop on the child element itself.
fn id_prop(props: &Map<String, Value>) -> Option<String> {
    props.get("id").and_then(Value::as_str).map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

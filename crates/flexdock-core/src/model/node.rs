//! Typed layout tree nodes.
//!
//! The renderer's JSON uses an internally tagged representation: every
//! node is an object with a `"type"` field (`"tab"`, `"tabset"`, `"row"`,
//! `"column"`) plus type-specific attributes.  Nodes carry many optional
//! attributes this crate never interprets (close buttons, min sizes,
//! class names, ...), so every typed struct flattens the unrecognized
//! remainder into a [`Map`] that round-trips untouched.
//!
//! Unrecognized node *types* are tolerated rather than rejected: they
//! deserialize into [`LayoutNode::Unknown`], count as zero tabs, and pass
//! through the limiter without consuming budget.  A permissive model here
//! keeps a newer renderer schema from breaking the gating path.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Attributes of a `tab` leaf node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabAttrs {
    /// Identifier used to match rendered children to this tab.  Unique
    /// within the tree (assumed from the caller, not enforced here).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name shown in the tab header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Renderer component identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    /// Unmodelled attributes, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Attributes shared by the container nodes (`tabset`, `row`, `column`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Relative size of this container within its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Ordered children.  For a `tabset` these are all `Tab`s; for a
    /// `row`/`column` any variant may appear.
    #[serde(default)]
    pub children: Vec<LayoutNode>,

    /// Unmodelled attributes, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One node of the layout tree.
///
/// Implements `Serialize`/`Deserialize` by hand to get the internally
/// tagged representation *plus* a catch-all: derived internally tagged
/// enums reject unknown tags, and the limiter must skip unknown shapes
/// instead of failing (see the module docs).
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    /// Leaf content pane.
    Tab(TabAttrs),
    /// Tabbed group; children are all `Tab`s.
    TabSet(ContainerAttrs),
    /// Horizontal container.
    Row(ContainerAttrs),
    /// Vertical container.
    Column(ContainerAttrs),
    /// A node this crate does not recognize, preserved verbatim.
    Unknown(Value),
}

impl LayoutNode {
    /// Returns `true` for a `Tab` leaf.
    pub fn is_tab(&self) -> bool {
        matches!(self, LayoutNode::Tab(_))
    }

    /// An empty `tabset` placeholder, used wherever the limiter would
    /// otherwise leave a container with no children.
    pub fn empty_tabset() -> LayoutNode {
        LayoutNode::TabSet(ContainerAttrs {
            weight: Some(100.0),
            ..ContainerAttrs::default()
        })
    }

    /// Convenience constructor for a tab with the given id (the name is
    /// set to the id as well, like a minimal hand-written model).
    pub fn tab(id: impl Into<String>) -> LayoutNode {
        let id = id.into();
        LayoutNode::Tab(TabAttrs {
            name: Some(id.clone()),
            id: Some(id),
            ..TabAttrs::default()
        })
    }

    /// Convenience constructor for a tab set holding the given children.
    pub fn tabset(children: Vec<LayoutNode>) -> LayoutNode {
        LayoutNode::TabSet(ContainerAttrs {
            weight: Some(50.0),
            children,
            ..ContainerAttrs::default()
        })
    }

    /// Convenience constructor for a row holding the given children.
    pub fn row(children: Vec<LayoutNode>) -> LayoutNode {
        LayoutNode::Row(ContainerAttrs {
            weight: Some(100.0),
            children,
            ..ContainerAttrs::default()
        })
    }
}

impl Serialize for LayoutNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        /// Re-attaches the `"type"` tag in front of the flattened attrs.
        #[derive(Serialize)]
        struct Tagged<'a, T> {
            #[serde(rename = "type")]
            kind: &'static str,
            #[serde(flatten)]
            attrs: &'a T,
        }

        match self {
            LayoutNode::Tab(attrs) => Tagged { kind: "tab", attrs }.serialize(serializer),
            LayoutNode::TabSet(attrs) => Tagged { kind: "tabset", attrs }.serialize(serializer),
            LayoutNode::Row(attrs) => Tagged { kind: "row", attrs }.serialize(serializer),
            LayoutNode::Column(attrs) => Tagged { kind: "column", attrs }.serialize(serializer),
            LayoutNode::Unknown(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for LayoutNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut obj = match value {
            Value::Object(obj) => obj,
            // Not even an object: preserve it, skip it in the transforms.
            other => return Ok(LayoutNode::Unknown(other)),
        };

        // Remove the tag before parsing the attrs so it does not also land
        // in the flattened extras (which would duplicate it on re-serialize).
        let tag = obj.remove("type");
        let parsed = match tag.as_ref().and_then(Value::as_str) {
            Some("tab") => attrs_from(obj).map(LayoutNode::Tab),
            Some("tabset") => attrs_from(obj).map(LayoutNode::TabSet),
            Some("row") => attrs_from(obj).map(LayoutNode::Row),
            Some("column") => attrs_from(obj).map(LayoutNode::Column),
            _ => {
                // Unknown tag: put it back and keep the object verbatim.
                if let Some(tag) = tag {
                    obj.insert("type".to_string(), tag);
                }
                Ok(LayoutNode::Unknown(Value::Object(obj)))
            }
        };
        parsed.map_err(de::Error::custom)
    }
}

/// Parses the remaining (tag-stripped) attributes of a node.
fn attrs_from<T: DeserializeOwned>(obj: Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(obj))
}

/// The edge a border region is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderLocation {
    Top,
    Bottom,
    Left,
    Right,
}

/// A named edge region holding tabs outside the main layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRegion {
    /// Which window edge this region is docked to.
    pub location: BorderLocation,

    /// Ordered tab children.  Non-tab entries are tolerated (they parse
    /// as [`LayoutNode::Unknown`]) but do not count as tabs.
    #[serde(default)]
    pub children: Vec<LayoutNode>,

    /// Unmodelled attributes, preserved round-trip (including the
    /// redundant `"type": "border"` tag the renderer emits).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BorderRegion {
    /// An empty region on the given edge.
    pub fn new(location: BorderLocation) -> Self {
        Self {
            location,
            children: Vec::new(),
            extra: Map::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

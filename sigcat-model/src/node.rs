use crate::error::ModelError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sigcat_types::{validate_name, DataType, NodeKind};

/// Children of a branch, keyed by segment name in declaration order.
pub type Children = IndexMap<String, Node>;

/// One node of a signal catalog.
///
/// The wire form is the flat `{type, description, uuid, ...}` object used by
/// catalog files; in memory the branch/leaf split is a closed enum so every
/// consumer has to handle both shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub description: String,
    pub uuid: String,
    pub comment: Option<String>,
    pub body: NodeBody,
}

/// Shape-specific part of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Branch { children: Children },
    Leaf(Leaf),
}

/// The kinds a leaf may have. Branch is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Sensor,
    Actuator,
    Attribute,
}

impl From<LeafKind> for NodeKind {
    fn from(kind: LeafKind) -> Self {
        match kind {
            LeafKind::Sensor => NodeKind::Sensor,
            LeafKind::Actuator => NodeKind::Actuator,
            LeafKind::Attribute => NodeKind::Attribute,
        }
    }
}

/// A sensor, actuator or attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub datatype: DataType,
    pub unit: Option<String>,
    pub min: Option<serde_json::Value>,
    pub max: Option<serde_json::Value>,
    pub allowed: Option<Vec<serde_json::Value>>,
    pub default: Option<serde_json::Value>,
    pub deprecation: Option<String>,
}

impl Leaf {
    fn new(kind: LeafKind, datatype: DataType) -> Self {
        Self {
            kind,
            datatype,
            unit: None,
            min: None,
            max: None,
            allowed: None,
            default: None,
            deprecation: None,
        }
    }
}

impl Node {
    fn with_body(description: impl Into<String>, body: NodeBody) -> Self {
        Self {
            description: description.into(),
            uuid: String::new(),
            comment: None,
            body,
        }
    }

    /// An empty branch.
    pub fn branch(description: impl Into<String>) -> Self {
        Self::with_body(
            description,
            NodeBody::Branch {
                children: Children::new(),
            },
        )
    }

    /// A leaf of the given kind.
    pub fn leaf(kind: LeafKind, datatype: DataType, description: impl Into<String>) -> Self {
        Self::with_body(description, NodeBody::Leaf(Leaf::new(kind, datatype)))
    }

    pub fn sensor(datatype: DataType, description: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Sensor, datatype, description)
    }

    pub fn actuator(datatype: DataType, description: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Actuator, datatype, description)
    }

    pub fn attribute(datatype: DataType, description: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Attribute, datatype, description)
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the unit of a leaf. No effect on branches.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        if let NodeBody::Leaf(leaf) = &mut self.body {
            leaf.unit = Some(unit.into());
        }
        self
    }

    /// Appends a child to a branch. No effect on leaves.
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, child: Node) -> Self {
        if let NodeBody::Branch { children } = &mut self.body {
            children.insert(name.into(), child);
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match &self.body {
            NodeBody::Branch { .. } => NodeKind::Branch,
            NodeBody::Leaf(leaf) => leaf.kind.into(),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.body, NodeBody::Branch { .. })
    }

    /// Declared children of a branch; `None` for leaves.
    pub fn children(&self) -> Option<&Children> {
        match &self.body {
            NodeBody::Branch { children } => Some(children),
            NodeBody::Leaf(_) => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().and_then(|c| c.get(name))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.body {
            NodeBody::Leaf(leaf) => Some(leaf),
            NodeBody::Branch { .. } => None,
        }
    }

    pub fn datatype(&self) -> Option<DataType> {
        self.as_leaf().map(|l| l.datatype)
    }

    pub fn unit(&self) -> Option<&str> {
        self.as_leaf().and_then(|l| l.unit.as_deref())
    }

}

/// Flat wire representation of a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    description: String,
    #[serde(default)]
    uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Children>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatype: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deprecation: Option<String>,
}

impl TryFrom<RawNode> for Node {
    type Error = ModelError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| ModelError::InvalidNode(reason.to_string());

        let leaf_kind = match raw.kind {
            NodeKind::Branch => {
                if raw.datatype.is_some() {
                    return Err(invalid("branch must not declare a datatype"));
                }
                if let Some(children) = &raw.children {
                    for name in children.keys() {
                        validate_name(name)?;
                    }
                }
                return Ok(Node {
                    description: raw.description,
                    uuid: raw.uuid,
                    comment: raw.comment,
                    body: NodeBody::Branch {
                        children: raw.children.unwrap_or_default(),
                    },
                });
            }
            NodeKind::Sensor => LeafKind::Sensor,
            NodeKind::Actuator => LeafKind::Actuator,
            NodeKind::Attribute => LeafKind::Attribute,
        };

        if raw.children.is_some() {
            return Err(invalid("leaf nodes cannot have children"));
        }
        let datatype = raw
            .datatype
            .ok_or_else(|| invalid("leaf node is missing a datatype"))?;

        Ok(Node {
            description: raw.description,
            uuid: raw.uuid,
            comment: raw.comment,
            body: NodeBody::Leaf(Leaf {
                kind: leaf_kind,
                datatype,
                unit: raw.unit,
                min: raw.min,
                max: raw.max,
                allowed: raw.allowed,
                default: raw.default,
                deprecation: raw.deprecation,
            }),
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let kind = node.kind();
        let mut raw = RawNode {
            kind,
            description: node.description,
            uuid: node.uuid,
            comment: node.comment,
            children: None,
            datatype: None,
            unit: None,
            min: None,
            max: None,
            allowed: None,
            default: None,
            deprecation: None,
        };
        match node.body {
            NodeBody::Branch { children } => {
                raw.children = (!children.is_empty()).then_some(children);
            }
            NodeBody::Leaf(leaf) => {
                raw.datatype = Some(leaf.datatype);
                raw.unit = leaf.unit;
                raw.min = leaf.min;
                raw.max = leaf.max;
                raw.allowed = leaf.allowed;
                raw.default = leaf.default;
                raw.deprecation = leaf.deprecation;
            }
        }
        raw
    }
}

//! The representation graph: an arena of scalar, sequence and mapping nodes.
//!
//! Nodes are addressed by [`NodeId`], an index assigned once when the node is
//! added to a [`Graph`]. Identity is the id, never the content: two scalars with
//! the same tag and text are still two distinct nodes, and only the *same* id
//! reached twice is treated as shared by the serializer.
//!
//! Children are linked after creation, so a collection can contain itself or
//! one of its ancestors.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_serializer::{Graph, FlowStyle, ScalarStyle};
//! use yaml_serializer::node::tags;
//!
//! let mut graph = Graph::new();
//! let list = graph.add_sequence(tags::SEQ, FlowStyle::Block);
//! let item = graph.add_scalar(tags::STR, "x", ScalarStyle::Plain);
//! graph.push_item(list, item).unwrap();
//! graph.push_item(list, item).unwrap();
//! // A sequence that contains itself
//! graph.push_item(list, list).unwrap();
//!
//! assert_eq!(graph.children(list).unwrap(), vec![item, item, list]);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard tags of the YAML core schema.
pub mod tags {
    pub const STR: &str = "tag:yaml.org,2002:str";
    pub const INT: &str = "tag:yaml.org,2002:int";
    pub const FLOAT: &str = "tag:yaml.org,2002:float";
    pub const BOOL: &str = "tag:yaml.org,2002:bool";
    pub const NULL: &str = "tag:yaml.org,2002:null";
    pub const SEQ: &str = "tag:yaml.org,2002:seq";
    pub const MAP: &str = "tag:yaml.org,2002:map";
}

/// Stable identity of a node inside its [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Presentation hint for scalars. Passed through to events untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// Presentation hint for collections. Passed through to events untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStyle {
    /// Let the emitter decide
    #[default]
    Any,
    Block,
    Flow,
}

/// Kind-specific content of a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Scalar {
        value: String,
        #[serde(default)]
        style: ScalarStyle,
    },
    Sequence {
        items: Vec<NodeId>,
        #[serde(default)]
        flow_style: FlowStyle,
    },
    Mapping {
        /// Key order is insertion order and is significant.
        entries: Vec<(NodeId, NodeId)>,
        #[serde(default)]
        flow_style: FlowStyle,
    },
}

impl NodeKind {
    /// Human-readable kind name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Scalar { .. } => "scalar",
            NodeKind::Sequence { .. } => "sequence",
            NodeKind::Mapping { .. } => "mapping",
        }
    }
}

/// A graph vertex: a semantic tag plus kind-specific content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar { .. })
    }

    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence { .. })
    }

    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping { .. })
    }

    /// Returns the scalar text, or `None` for collections.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Arena owning every node of a representation graph.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::{Graph, FlowStyle, ScalarStyle};
/// use yaml_serializer::node::tags;
///
/// let mut graph = Graph::new();
/// let map = graph.add_mapping(tags::MAP, FlowStyle::Any);
/// let key = graph.add_scalar(tags::STR, "name", ScalarStyle::Plain);
/// let value = graph.add_scalar(tags::STR, "Alice", ScalarStyle::Plain);
/// graph.insert_entry(map, key, value).unwrap();
///
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.node(value).unwrap().as_str(), Some("Alice"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Graph {
            nodes: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node and returns its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn add_scalar(
        &mut self,
        tag: impl Into<String>,
        value: impl Into<String>,
        style: ScalarStyle,
    ) -> NodeId {
        self.add(Node {
            tag: tag.into(),
            kind: NodeKind::Scalar {
                value: value.into(),
                style,
            },
        })
    }

    pub fn add_sequence(&mut self, tag: impl Into<String>, flow_style: FlowStyle) -> NodeId {
        self.add(Node {
            tag: tag.into(),
            kind: NodeKind::Sequence {
                items: Vec::new(),
                flow_style,
            },
        })
    }

    pub fn add_mapping(&mut self, tag: impl Into<String>, flow_style: FlowStyle) -> NodeId {
        self.add(Node {
            tag: tag.into(),
            kind: NodeKind::Mapping {
                entries: Vec::new(),
                flow_style,
            },
        })
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Like [`Graph::get`] but fails with [`Error::UnknownNode`].
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    /// Appends `child` to the sequence `seq`.
    pub fn push_item(&mut self, seq: NodeId, child: NodeId) -> Result<()> {
        self.node(child)?;
        let node = self.nodes.get_mut(seq.0).ok_or(Error::UnknownNode(seq))?;
        match &mut node.kind {
            NodeKind::Sequence { items, .. } => {
                items.push(child);
                Ok(())
            }
            other => Err(Error::kind_mismatch(seq, "sequence", other.name())),
        }
    }

    /// Appends a `(key, value)` entry to the mapping `map`.
    ///
    /// Keys are identities, so two value-equal keys are both kept.
    pub fn insert_entry(&mut self, map: NodeId, key: NodeId, value: NodeId) -> Result<()> {
        self.node(key)?;
        self.node(value)?;
        let node = self.nodes.get_mut(map.0).ok_or(Error::UnknownNode(map))?;
        match &mut node.kind {
            NodeKind::Mapping { entries, .. } => {
                entries.push((key, value));
                Ok(())
            }
            other => Err(Error::kind_mismatch(map, "mapping", other.name())),
        }
    }

    /// Direct children in traversal order: sequence items, or mapping key then value.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Scalar { .. } => Vec::new(),
            NodeKind::Sequence { items, .. } => items.clone(),
            NodeKind::Mapping { entries, .. } => {
                entries.iter().flat_map(|&(k, v)| [k, v]).collect()
            }
        })
    }

    /// Iterates over all `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

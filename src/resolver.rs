//! Tag inference: what tag would a reader assign to a node it sees untagged?
//!
//! The serializer asks two questions per node:
//!
//! - with `use_content = true`: the tag inferred from the scalar text (e.g. `42` → int)
//! - with `use_content = false`: the default tag for the node's kind (`str`, `seq`, `map`)
//!
//! The position of the node in its parent is passed explicitly as a
//! [`PathContext`] on every call, so resolvers hold no cursor state and can be
//! shared or tested in isolation.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_serializer::{CoreResolver, Graph, NodeKindTag, PathContext, TagResolver};
//! use yaml_serializer::node::tags;
//!
//! let graph = Graph::new();
//! let resolver = CoreResolver::new();
//! let ctx = PathContext::root(&graph);
//!
//! assert_eq!(resolver.resolve(&ctx, NodeKindTag::Scalar, Some("42"), true), tags::INT);
//! assert_eq!(resolver.resolve(&ctx, NodeKindTag::Scalar, Some("42"), false), tags::STR);
//! assert_eq!(resolver.resolve(&ctx, NodeKindTag::Mapping, None, true), tags::MAP);
//! ```

use crate::node::tags;
use crate::{Graph, Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// Structural kind of a node, without its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindTag {
    Scalar,
    Sequence,
    Mapping,
}

impl From<&NodeKind> for NodeKindTag {
    fn from(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Scalar { .. } => NodeKindTag::Scalar,
            NodeKind::Sequence { .. } => NodeKindTag::Sequence,
            NodeKind::Mapping { .. } => NodeKindTag::Mapping,
        }
    }
}

/// Where a node sits inside its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathIndex {
    /// The document root
    Root,
    /// A mapping key
    None,
    /// An item of a sequence
    Position(usize),
    /// A mapping value, stored under this key node
    Key(NodeId),
}

/// The (parent, index) context of the node being resolved.
#[derive(Clone, Copy, Debug)]
pub struct PathContext<'g> {
    pub graph: &'g Graph,
    pub parent: Option<NodeId>,
    pub index: PathIndex,
}

impl<'g> PathContext<'g> {
    #[must_use]
    pub fn root(graph: &'g Graph) -> Self {
        PathContext {
            graph,
            parent: None,
            index: PathIndex::Root,
        }
    }

    #[must_use]
    pub fn child(graph: &'g Graph, parent: NodeId, index: PathIndex) -> Self {
        PathContext {
            graph,
            parent: Some(parent),
            index,
        }
    }

    #[must_use]
    pub fn parent_node(&self) -> Option<&'g Node> {
        self.parent.and_then(|id| self.graph.get(id))
    }

    /// Scalar text of the key this node is stored under, if it is a mapping value.
    #[must_use]
    pub fn key_text(&self) -> Option<&'g str> {
        match self.index {
            PathIndex::Key(key) => self.graph.get(key).and_then(Node::as_str),
            _ => None,
        }
    }
}

/// Answers tag-inference questions for the serializer.
pub trait TagResolver {
    /// Returns the tag a reader would assign to a node of `kind` at `ctx`.
    ///
    /// `value` is the scalar text (`None` for collections). With `use_content`
    /// the text may be inspected; without it only the kind default applies.
    fn resolve(
        &self,
        ctx: &PathContext<'_>,
        kind: NodeKindTag,
        value: Option<&str>,
        use_content: bool,
    ) -> String;
}

impl<R: TagResolver + ?Sized> TagResolver for &R {
    fn resolve(
        &self,
        ctx: &PathContext<'_>,
        kind: NodeKindTag,
        value: Option<&str>,
        use_content: bool,
    ) -> String {
        (**self).resolve(ctx, kind, value, use_content)
    }
}

/// Which position in the parent a [`PathRule`] applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSelector {
    /// Value stored under a mapping key with this scalar text
    Key(String),
    /// Item at this sequence position
    Position(usize),
}

/// Forces a tag for nodes found at a given place in their parent.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::{NodeKindTag, PathRule};
///
/// let rule = PathRule::key("when", NodeKindTag::Scalar, "tag:yaml.org,2002:timestamp")
///     .under("!event");
/// assert_eq!(rule.parent_tag.as_deref(), Some("!event"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
    pub parent_tag: Option<String>,
    pub selector: PathSelector,
    pub kind: NodeKindTag,
    pub tag: String,
}

impl PathRule {
    pub fn key(key: impl Into<String>, kind: NodeKindTag, tag: impl Into<String>) -> Self {
        PathRule {
            parent_tag: None,
            selector: PathSelector::Key(key.into()),
            kind,
            tag: tag.into(),
        }
    }

    pub fn position(position: usize, kind: NodeKindTag, tag: impl Into<String>) -> Self {
        PathRule {
            parent_tag: None,
            selector: PathSelector::Position(position),
            kind,
            tag: tag.into(),
        }
    }

    /// Restricts the rule to parents carrying `tag`.
    #[must_use]
    pub fn under(mut self, tag: impl Into<String>) -> Self {
        self.parent_tag = Some(tag.into());
        self
    }

    fn matches(&self, ctx: &PathContext<'_>, kind: NodeKindTag) -> bool {
        if self.kind != kind {
            return false;
        }
        if let Some(parent_tag) = &self.parent_tag {
            match ctx.parent_node() {
                Some(parent) if &parent.tag == parent_tag => {}
                _ => return false,
            }
        }
        match (&self.selector, ctx.index) {
            (PathSelector::Key(key), PathIndex::Key(_)) => ctx.key_text() == Some(key.as_str()),
            (PathSelector::Position(want), PathIndex::Position(at)) => *want == at,
            _ => false,
        }
    }
}

/// Core-schema resolver with optional path rules.
#[derive(Clone, Debug, Default)]
pub struct CoreResolver {
    path_rules: Vec<PathRule>,
}

impl CoreResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path rule. Rules are checked in the order they were added.
    #[must_use]
    pub fn with_path_rule(mut self, rule: PathRule) -> Self {
        self.path_rules.push(rule);
        self
    }

    pub fn path_rules(&self) -> &[PathRule] {
        &self.path_rules
    }

    /// The tag implied by scalar text alone, or `None` for plain strings.
    #[must_use]
    pub fn infer_scalar(value: &str) -> Option<&'static str> {
        if is_null(value) {
            Some(tags::NULL)
        } else if is_bool(value) {
            Some(tags::BOOL)
        } else if is_int(value) {
            Some(tags::INT)
        } else if is_float(value) {
            Some(tags::FLOAT)
        } else {
            None
        }
    }

    const fn kind_default(kind: NodeKindTag) -> &'static str {
        match kind {
            NodeKindTag::Scalar => tags::STR,
            NodeKindTag::Sequence => tags::SEQ,
            NodeKindTag::Mapping => tags::MAP,
        }
    }
}

impl TagResolver for CoreResolver {
    fn resolve(
        &self,
        ctx: &PathContext<'_>,
        kind: NodeKindTag,
        value: Option<&str>,
        use_content: bool,
    ) -> String {
        if let Some(rule) = self.path_rules.iter().find(|rule| rule.matches(ctx, kind)) {
            return rule.tag.clone();
        }
        if use_content && kind == NodeKindTag::Scalar {
            if let Some(tag) = value.and_then(Self::infer_scalar) {
                return tag.to_string();
            }
        }
        Self::kind_default(kind).to_string()
    }
}

fn is_null(s: &str) -> bool {
    matches!(s, "" | "~" | "null" | "Null" | "NULL")
}

fn is_bool(s: &str) -> bool {
    matches!(
        s,
        "true"
            | "True"
            | "TRUE"
            | "false"
            | "False"
            | "FALSE"
            | "yes"
            | "Yes"
            | "YES"
            | "no"
            | "No"
            | "NO"
            | "on"
            | "On"
            | "ON"
            | "off"
            | "Off"
            | "OFF"
    )
}

fn is_int(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if let Some(hex) = digits.strip_prefix("0x") {
        return is_digits(hex, |c| c.is_ascii_hexdigit());
    }
    if let Some(oct) = digits.strip_prefix("0o") {
        return is_digits(oct, |c| ('0'..='7').contains(&c));
    }
    is_digits(digits, |c| c.is_ascii_digit())
}

/// Non-empty, starts with a digit, only digits or `_` separators.
fn is_digits(s: &str, digit: impl Fn(char) -> bool) -> bool {
    s.chars().next().map_or(false, &digit) && s.chars().all(|c| c == '_' || digit(c))
}

fn is_float(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    if matches!(unsigned, ".inf" | ".Inf" | ".INF") {
        return true;
    }
    if matches!(s, ".nan" | ".NaN" | ".NAN") {
        return true;
    }
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            (!int.is_empty() || !frac.is_empty())
                && int.chars().all(|c| c.is_ascii_digit() || c == '_')
                && frac.chars().all(|c| c.is_ascii_digit() || c == '_')
                && (int.chars().any(|c| c.is_ascii_digit())
                    || frac.chars().any(|c| c.is_ascii_digit()))
        }
        // An exponent turns a bare integer into a float
        None => exponent.is_some() && is_digits(mantissa, |c| c.is_ascii_digit()),
    };
    let exponent_ok = exponent.map_or(true, |exp| {
        let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
        !exp.is_empty() && exp.chars().all(|c| c.is_ascii_digit())
    });
    mantissa_ok && exponent_ok
}

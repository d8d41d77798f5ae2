//! Anchor planning: find every node reachable more than once and label it.
//!
//! The planner walks the graph depth-first in the same order the serializer
//! emits it. The first visit of a node records it without a label. A second
//! visit (through another parent, or through a cycle back-edge) gives it the
//! next label from the [`AnchorTemplate`], and does not descend again. This
//! bounds the walk on cyclic graphs and makes every anchor known before the
//! node's first expansion is emitted.
//!
//! Anchor-exempt nodes never get a label, so every reference to one is expanded
//! in full and the planner descends into it each time. A cycle made only of
//! exempt nodes has nothing to alias and is rejected with
//! [`Error::UnanchoredCycle`].

use crate::{Error, Graph, NodeId, NodeKind, Result};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::str::FromStr;

/// Template for anchor labels: a prefix, one run of `#`, and a suffix.
///
/// The run of `#` is replaced by the anchor number, zero-padded to the run's length.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::AnchorTemplate;
///
/// let template = AnchorTemplate::default();
/// assert_eq!(template.format(1), "id0001");
/// assert_eq!(template.format(12345), "id12345");
///
/// let custom: AnchorTemplate = "ref_##_x".parse().unwrap();
/// assert_eq!(custom.format(7), "ref_07_x");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorTemplate {
    prefix: String,
    width: usize,
    suffix: String,
}

impl AnchorTemplate {
    pub const DEFAULT: &'static str = "id####";

    /// Parses a template; exactly one contiguous run of `#` is required.
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = || Error::InvalidAnchorFormat(template.to_string());
        let start = template.find('#').ok_or_else(invalid)?;
        let width = template[start..]
            .find(|c: char| c != '#')
            .unwrap_or(template.len() - start);
        let suffix = &template[start + width..];
        if suffix.contains('#') {
            return Err(invalid());
        }
        Ok(AnchorTemplate {
            prefix: template[..start].to_string(),
            width,
            suffix: suffix.to_string(),
        })
    }

    #[must_use]
    pub fn format(&self, number: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            number,
            self.suffix,
            width = self.width
        )
    }
}

impl Default for AnchorTemplate {
    fn default() -> Self {
        AnchorTemplate {
            prefix: "id".to_string(),
            width: 4,
            suffix: String::new(),
        }
    }
}

impl FromStr for AnchorTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AnchorTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, "#".repeat(self.width), self.suffix)
    }
}

/// Per-document plan: which nodes were visited, and the labels of shared ones.
///
/// Absent means "never reached"; `None` means "reached once"; `Some(label)` means shared.
/// Entries iterate in first-visit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorTable {
    entries: IndexMap<NodeId, Option<String>>,
}

impl AnchorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// The anchor label for `id`, if it is shared.
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.entries.get(&id).and_then(|label| label.as_deref())
    }

    #[must_use]
    pub fn is_shared(&self, id: NodeId) -> bool {
        self.label(id).is_some()
    }

    /// Number of visited nodes, shared or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared nodes with their labels, in first-visit order.
    pub fn shared(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.entries
            .iter()
            .filter_map(|(id, label)| label.as_deref().map(|label| (*id, label)))
    }
}

/// Predicate marking nodes that must never receive an anchor.
pub type AnchorExemption<'a> = &'a dyn Fn(&Graph, NodeId) -> bool;

/// Builds an [`AnchorTable`] for one document.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::{AnchorPlanner, AnchorTemplate, FlowStyle, Graph, ScalarStyle};
/// use yaml_serializer::node::tags;
///
/// let mut graph = Graph::new();
/// let seq = graph.add_sequence(tags::SEQ, FlowStyle::Any);
/// let a = graph.add_scalar(tags::STR, "x", ScalarStyle::Plain);
/// graph.push_item(seq, a).unwrap();
/// graph.push_item(seq, a).unwrap();
///
/// let template = AnchorTemplate::default();
/// let table = AnchorPlanner::new(&template).plan(&graph, seq).unwrap();
/// assert_eq!(table.label(a), Some("id0001"));
/// assert_eq!(table.label(seq), None);
/// ```
pub struct AnchorPlanner<'a> {
    template: &'a AnchorTemplate,
    exemption: Option<AnchorExemption<'a>>,
    table: AnchorTable,
    // Exempt nodes entered since the last first-visited plain node
    exempt_run: IndexSet<NodeId>,
    last_id: u64,
}

impl<'a> AnchorPlanner<'a> {
    #[must_use]
    pub fn new(template: &'a AnchorTemplate) -> Self {
        AnchorPlanner {
            template,
            exemption: None,
            table: AnchorTable::new(),
            exempt_run: IndexSet::new(),
            last_id: 0,
        }
    }

    /// Nodes for which `exemption` returns true never get an anchor.
    #[must_use]
    pub fn exempt(mut self, exemption: AnchorExemption<'a>) -> Self {
        self.exemption = Some(exemption);
        self
    }

    /// Runs the planning pass from `root`.
    pub fn plan(mut self, graph: &Graph, root: NodeId) -> Result<AnchorTable> {
        self.visit(graph, root)?;
        tracing::trace!(
            visited = self.table.len(),
            shared = self.last_id,
            "anchor plan complete"
        );
        Ok(self.table)
    }

    fn visit(&mut self, graph: &Graph, id: NodeId) -> Result<()> {
        let node = graph.node(id)?;

        if self.exemption.map_or(false, |exempt| exempt(graph, id)) {
            if !self.exempt_run.insert(id) {
                return Err(Error::UnanchoredCycle(id));
            }
            self.visit_children(graph, &node.kind)?;
            self.exempt_run.pop();
            return Ok(());
        }

        if let Some(label) = self.table.entries.get_mut(&id) {
            if label.is_none() {
                self.last_id += 1;
                let generated = self.template.format(self.last_id);
                tracing::trace!(node = %id, anchor = %generated, "node is shared");
                *label = Some(generated);
            }
            return Ok(());
        }

        self.table.entries.insert(id, None);
        let outer_run = std::mem::take(&mut self.exempt_run);
        let result = self.visit_children(graph, &node.kind);
        self.exempt_run = outer_run;
        result
    }

    fn visit_children(&mut self, graph: &Graph, kind: &NodeKind) -> Result<()> {
        match kind {
            NodeKind::Scalar { .. } => {}
            NodeKind::Sequence { items, .. } => {
                for &item in items {
                    self.visit(graph, item)?;
                }
            }
            NodeKind::Mapping { entries, .. } => {
                for &(key, value) in entries {
                    self.visit(graph, key)?;
                    self.visit(graph, value)?;
                }
            }
        }
        Ok(())
    }
}

//! # yaml_serializer
//!
//! Serializes a YAML representation graph into a flat stream of structural events.
//!
//! ## What does it do?
//!
//! A representation graph is what a YAML loader builds before constructing native
//! values: scalar, sequence and mapping nodes, each carrying a tag. Nodes may be
//! shared between several parents, and a collection may even contain one of its own
//! ancestors. This crate walks such a graph and produces the event stream
//! (`StreamStart`, `DocumentStart`, `Scalar`, `SequenceStart`, `Alias`, ...) that an
//! emitter turns back into text.
//!
//! ## Key Features
//!
//! - **Lossless topology**: every node reachable more than once gets an anchor; the
//!   first occurrence is expanded, every other one becomes an alias
//! - **Terminates on cycles**: a back-edge to an ancestor is just another alias
//! - **Identity, not equality**: two separately built but equal nodes stay separate
//! - **Implicit tags**: tags a reader would infer anyway are flagged as omittable,
//!   using a pluggable [`TagResolver`]
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use yaml_serializer::{to_events, Event, FlowStyle, Graph, ScalarStyle};
//! use yaml_serializer::node::tags;
//!
//! let mut graph = Graph::new();
//! let list = graph.add_sequence(tags::SEQ, FlowStyle::Block);
//! let shared = graph.add_scalar(tags::STR, "x", ScalarStyle::Plain);
//! graph.push_item(list, shared).unwrap();
//! graph.push_item(list, shared).unwrap();
//!
//! let events = to_events(&graph, list).unwrap();
//! assert!(events.contains(&Event::Alias { anchor: "id0001".to_string() }));
//! ```
//!
//! ### Writing Several Documents
//!
//! ```rust
//! use yaml_serializer::{Event, Graph, ScalarStyle, Serializer, SerializerOptions};
//! use yaml_serializer::node::tags;
//!
//! let mut graph = Graph::new();
//! let first = graph.add_scalar(tags::STR, "one", ScalarStyle::Plain);
//! let second = graph.add_scalar(tags::INT, "2", ScalarStyle::Plain);
//!
//! let options = SerializerOptions::new().with_explicit_start(true);
//! let mut serializer = Serializer::new(Vec::<Event>::new(), options).unwrap();
//! serializer.open().unwrap();
//! serializer.serialize(&graph, first).unwrap();
//! serializer.serialize(&graph, second).unwrap();
//! serializer.close().unwrap();
//!
//! // StreamStart, 2 x (DocumentStart, Scalar, DocumentEnd), StreamEnd
//! assert_eq!(serializer.into_inner().len(), 8);
//! ```
//!
//! ## Out of Scope
//!
//! Turning events into text (quoting, indentation, line folding), parsing, and
//! validating tag syntax all belong to other components.

pub mod anchor;
pub mod error;
pub mod event;
pub mod node;
pub mod options;
pub mod resolver;
pub mod ser;
pub mod sink;

pub use anchor::{AnchorExemption, AnchorPlanner, AnchorTable, AnchorTemplate};
pub use error::{Error, Result};
pub use event::{Event, ImplicitTags, Version};
pub use node::{FlowStyle, Graph, Node, NodeId, NodeKind, ScalarStyle};
pub use options::SerializerOptions;
pub use resolver::{
    CoreResolver, NodeKindTag, PathContext, PathIndex, PathRule, PathSelector, TagResolver,
};
pub use ser::{Serializer, State};
pub use sink::{EventLog, EventSink};

/// Serialize the graph reachable from `root` as a complete one-document stream.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::{to_events, Event, Graph, ScalarStyle};
/// use yaml_serializer::node::tags;
///
/// let mut graph = Graph::new();
/// let root = graph.add_scalar(tags::STR, "hello", ScalarStyle::Plain);
///
/// let events = to_events(&graph, root).unwrap();
/// assert_eq!(events.first(), Some(&Event::StreamStart));
/// assert_eq!(events.last(), Some(&Event::StreamEnd));
/// ```
///
/// # Errors
///
/// Returns an error if `root` or any node reachable from it is not part of `graph`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_events(graph: &Graph, root: NodeId) -> Result<Vec<Event>> {
    to_events_with_options(graph, root, SerializerOptions::default())
}

/// Serialize one document with custom options.
///
/// # Errors
///
/// Returns an error if the options are malformed or the graph has dangling ids.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_events_with_options(
    graph: &Graph,
    root: NodeId,
    options: SerializerOptions,
) -> Result<Vec<Event>> {
    stream_to_events(graph, &[root], options)
}

/// Serialize several roots of the same graph as consecutive documents of one stream.
///
/// Anchors are assigned independently for every document.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::{stream_to_events, Event, Graph, ScalarStyle, SerializerOptions};
/// use yaml_serializer::node::tags;
///
/// let mut graph = Graph::new();
/// let a = graph.add_scalar(tags::STR, "a", ScalarStyle::Plain);
/// let b = graph.add_scalar(tags::STR, "b", ScalarStyle::Plain);
///
/// let events = stream_to_events(&graph, &[a, b], SerializerOptions::new()).unwrap();
/// let documents = events
///     .iter()
///     .filter(|e| matches!(e, Event::DocumentStart { .. }))
///     .count();
/// assert_eq!(documents, 2);
/// ```
///
/// # Errors
///
/// Returns an error if the options are malformed or the graph has dangling ids.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn stream_to_events(
    graph: &Graph,
    roots: &[NodeId],
    options: SerializerOptions,
) -> Result<Vec<Event>> {
    let mut serializer = Serializer::new(Vec::<Event>::new(), options)?;
    serializer.open()?;
    for &root in roots {
        serializer.serialize(graph, root)?;
    }
    serializer.close()?;
    Ok(serializer.into_inner())
}

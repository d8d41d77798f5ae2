//! Graph serialization.
//!
//! This module provides the [`Serializer`], which turns a representation
//! [`Graph`] into a stream of [`Event`]s and hands them to an [`EventSink`].
//!
//! ## Overview
//!
//! Each call to [`Serializer::serialize`] writes one document in two passes:
//!
//! - **Plan**: an [`AnchorPlanner`] walks the graph and labels every node reachable
//!   more than once, whether through sharing or through a cycle
//! - **Emit**: a depth-first walk in the same order emits the first occurrence of a
//!   node in full (carrying its anchor) and every later occurrence as an alias
//!
//! While emitting, the [`TagResolver`] is asked which tag a reader would infer
//! for each node. When the node's tag matches, the tag is marked implicit.
//!
//! ## Lifecycle
//!
//! `open` → `serialize`* → `close`. Calling out of order fails with a usage error,
//! except that a second `close` is a no-op.
//!
//! ```rust
//! use yaml_serializer::{Event, FlowStyle, Graph, ScalarStyle, Serializer, SerializerOptions};
//! use yaml_serializer::node::tags;
//!
//! let mut graph = Graph::new();
//! let seq = graph.add_sequence(tags::SEQ, FlowStyle::Any);
//! let a = graph.add_scalar(tags::STR, "x", ScalarStyle::Plain);
//! graph.push_item(seq, a).unwrap();
//! graph.push_item(seq, a).unwrap();
//!
//! let mut serializer = Serializer::new(Vec::<Event>::new(), SerializerOptions::new()).unwrap();
//! serializer.open().unwrap();
//! serializer.serialize(&graph, seq).unwrap();
//! serializer.close().unwrap();
//!
//! let events = serializer.into_inner();
//! assert_eq!(events[3].anchor(), Some("id0001"));
//! assert_eq!(events[4], Event::Alias { anchor: "id0001".to_string() });
//! ```

use crate::resolver::PathIndex;
use crate::{
    AnchorPlanner, AnchorTable, AnchorTemplate, CoreResolver, Error, Event, EventSink, Graph,
    ImplicitTags, NodeId, NodeKind, NodeKindTag, PathContext, Result, SerializerOptions,
    TagResolver, Version,
};
use std::collections::HashSet;

/// Lifecycle state of a [`Serializer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Unopened,
    Open,
    Closed,
}

type Exemption = Box<dyn Fn(&Graph, NodeId) -> bool>;

/// The graph serializer.
///
/// Owns the event sink and the tag resolver. Documents are written strictly one
/// after another; all per-document state lives inside a single `serialize` call.
pub struct Serializer<S, R = CoreResolver> {
    sink: S,
    resolver: R,
    options: SerializerOptions,
    version: Option<Version>,
    anchor_template: AnchorTemplate,
    exemption: Option<Exemption>,
    state: State,
}

impl<S: EventSink> Serializer<S> {
    /// Creates a serializer using the [`CoreResolver`].
    ///
    /// Fails if the configured version or anchor format is malformed.
    pub fn new(sink: S, options: SerializerOptions) -> Result<Self> {
        Serializer::with_resolver(sink, CoreResolver::new(), options)
    }
}

impl<S: EventSink, R: TagResolver> Serializer<S, R> {
    pub fn with_resolver(sink: S, resolver: R, options: SerializerOptions) -> Result<Self> {
        let version = options.directive_version()?;
        let anchor_template = options.anchor_template()?;
        Ok(Serializer {
            sink,
            resolver,
            options,
            version,
            anchor_template,
            exemption: None,
            state: State::Unopened,
        })
    }

    /// Nodes for which `exempt` returns true are never anchored and never aliased.
    #[must_use]
    pub fn with_anchor_exemption<F>(mut self, exempt: F) -> Self
    where
        F: Fn(&Graph, NodeId) -> bool + 'static,
    {
        self.exemption = Some(Box::new(exempt));
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Starts the stream.
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            State::Unopened => {
                self.sink.emit(Event::StreamStart)?;
                self.state = State::Open;
                tracing::debug!("serializer opened");
                Ok(())
            }
            State::Open => Err(Error::AlreadyOpened),
            State::Closed => Err(Error::Closed),
        }
    }

    /// Ends the stream. Closing an already closed serializer does nothing.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            State::Unopened => Err(Error::NotOpened),
            State::Open => {
                self.sink.emit(Event::StreamEnd)?;
                self.state = State::Closed;
                tracing::debug!("serializer closed");
                Ok(())
            }
            State::Closed => Ok(()),
        }
    }

    /// Writes the graph reachable from `root` as one document.
    ///
    /// Anchor numbering restarts for every document.
    pub fn serialize(&mut self, graph: &Graph, root: NodeId) -> Result<()> {
        match self.state {
            State::Unopened => return Err(Error::NotOpened),
            State::Closed => return Err(Error::Closed),
            State::Open => {}
        }

        let anchors = self.plan(graph, root)?;

        self.sink.emit(Event::DocumentStart {
            explicit: self.options.explicit_start,
            version: self.version,
            tags: self.options.header_tags(),
        })?;

        let mut document = DocumentEmitter {
            graph,
            anchors: &anchors,
            resolver: &self.resolver,
            sink: &mut self.sink,
            explicit_types: self.options.explicit_types,
            emitted: HashSet::new(),
            aliases: 0,
        };
        document.emit_node(root, None, PathIndex::Root)?;
        let (expanded, aliases) = (document.emitted.len(), document.aliases);

        self.sink.emit(Event::DocumentEnd {
            explicit: self.options.explicit_end,
        })?;

        tracing::debug!(
            root = %root,
            nodes = expanded,
            anchors = anchors.shared().count(),
            aliases,
            "document serialized"
        );
        Ok(())
    }

    fn plan(&self, graph: &Graph, root: NodeId) -> Result<AnchorTable> {
        let mut planner = AnchorPlanner::new(&self.anchor_template);
        if let Some(exempt) = self.exemption.as_deref() {
            planner = planner.exempt(exempt);
        }
        planner.plan(graph, root)
    }
}

/// Emission state for a single document.
struct DocumentEmitter<'a, S, R> {
    graph: &'a Graph,
    anchors: &'a AnchorTable,
    resolver: &'a R,
    sink: &'a mut S,
    explicit_types: bool,
    emitted: HashSet<NodeId>,
    aliases: usize,
}

impl<S: EventSink, R: TagResolver> DocumentEmitter<'_, S, R> {
    fn emit_node(&mut self, id: NodeId, parent: Option<NodeId>, index: PathIndex) -> Result<()> {
        let (graph, anchors) = (self.graph, self.anchors);
        let node = graph.node(id)?;
        let anchor = anchors.label(id);

        if let Some(anchor) = anchor {
            if self.emitted.contains(&id) {
                tracing::trace!(node = %id, anchor, "alias");
                self.aliases += 1;
                return self.sink.emit(Event::Alias {
                    anchor: anchor.to_string(),
                });
            }
        }

        // The plan guarantees every cycle passes a labelled node, so this walk ends
        self.emitted.insert(id);

        let ctx = match parent {
            Some(parent) => PathContext::child(graph, parent, index),
            None => PathContext::root(graph),
        };
        let anchor = anchor.map(str::to_string);
        let tag = node.tag.clone();

        match &node.kind {
            NodeKind::Scalar { value, style } => {
                let implicit = if self.explicit_types {
                    ImplicitTags::EXPLICIT
                } else {
                    let text = Some(value.as_str());
                    let detected = self.resolver.resolve(&ctx, NodeKindTag::Scalar, text, true);
                    let default = self.resolver.resolve(&ctx, NodeKindTag::Scalar, text, false);
                    ImplicitTags::new(tag == detected, tag == default)
                };
                self.sink.emit(Event::Scalar {
                    anchor,
                    tag,
                    implicit,
                    value: value.clone(),
                    style: *style,
                })?;
            }
            NodeKind::Sequence { items, flow_style } => {
                let implicit = self.collection_implicit(&ctx, NodeKindTag::Sequence, &tag);
                self.sink.emit(Event::SequenceStart {
                    anchor,
                    tag,
                    implicit,
                    flow_style: *flow_style,
                })?;
                for (position, &item) in items.iter().enumerate() {
                    self.emit_node(item, Some(id), PathIndex::Position(position))?;
                }
                self.sink.emit(Event::SequenceEnd)?;
            }
            NodeKind::Mapping {
                entries,
                flow_style,
            } => {
                let implicit = self.collection_implicit(&ctx, NodeKindTag::Mapping, &tag);
                self.sink.emit(Event::MappingStart {
                    anchor,
                    tag,
                    implicit,
                    flow_style: *flow_style,
                })?;
                for &(key, value) in entries {
                    self.emit_node(key, Some(id), PathIndex::None)?;
                    self.emit_node(value, Some(id), PathIndex::Key(key))?;
                }
                self.sink.emit(Event::MappingEnd)?;
            }
        }

        Ok(())
    }

    // Collections have no content inference, so one flag covers both cases.
    fn collection_implicit(&self, ctx: &PathContext<'_>, kind: NodeKindTag, tag: &str) -> bool {
        !self.explicit_types && self.resolver.resolve(ctx, kind, None, true) == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::tags;
    use crate::{FlowStyle, ScalarStyle};

    fn open_serializer(options: SerializerOptions) -> Serializer<Vec<Event>> {
        let mut serializer = Serializer::new(Vec::<Event>::new(), options).unwrap();
        serializer.open().unwrap();
        serializer
    }

    /// Node events only, without the stream and document frame.
    fn body(events: &[Event]) -> &[Event] {
        &events[2..events.len() - 1]
    }

    #[test]
    fn test_plain_str_scalar_is_implicit() {
        let mut graph = Graph::new();
        let root = graph.add_scalar(tags::STR, "hello", ScalarStyle::Plain);

        let mut serializer = open_serializer(SerializerOptions::new());
        serializer.serialize(&graph, root).unwrap();
        let events = serializer.into_inner();

        assert_eq!(
            events,
            vec![
                Event::StreamStart,
                Event::DocumentStart {
                    explicit: false,
                    version: None,
                    tags: None
                },
                Event::Scalar {
                    anchor: None,
                    tag: tags::STR.to_string(),
                    implicit: ImplicitTags::new(true, true),
                    value: "hello".to_string(),
                    style: ScalarStyle::Plain,
                },
                Event::DocumentEnd { explicit: false },
            ]
        );
    }

    #[test]
    fn test_str_that_looks_like_int() {
        let mut graph = Graph::new();
        let root = graph.add_scalar(tags::STR, "42", ScalarStyle::DoubleQuoted);

        let mut serializer = open_serializer(SerializerOptions::new());
        serializer.serialize(&graph, root).unwrap();
        let events = serializer.into_inner();

        match &body(&events)[0] {
            Event::Scalar { implicit, .. } => {
                assert_eq!(*implicit, ImplicitTags::new(false, true));
            }
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_shared_scalar_becomes_alias() {
        let mut graph = Graph::new();
        let seq = graph.add_sequence(tags::SEQ, FlowStyle::Any);
        let a = graph.add_scalar(tags::STR, "x", ScalarStyle::Plain);
        graph.push_item(seq, a).unwrap();
        graph.push_item(seq, a).unwrap();

        let mut serializer = open_serializer(SerializerOptions::new());
        serializer.serialize(&graph, seq).unwrap();
        let events = serializer.into_inner();

        assert_eq!(
            body(&events),
            &[
                Event::SequenceStart {
                    anchor: None,
                    tag: tags::SEQ.to_string(),
                    implicit: true,
                    flow_style: FlowStyle::Any,
                },
                Event::Scalar {
                    anchor: Some("id0001".to_string()),
                    tag: tags::STR.to_string(),
                    implicit: ImplicitTags::new(true, true),
                    value: "x".to_string(),
                    style: ScalarStyle::Plain,
                },
                Event::Alias {
                    anchor: "id0001".to_string()
                },
                Event::SequenceEnd,
            ]
        );
    }

    #[test]
    fn test_explicit_types_disable_implicit_flags() {
        let mut graph = Graph::new();
        let map = graph.add_mapping(tags::MAP, FlowStyle::Block);
        let k = graph.add_scalar(tags::STR, "k", ScalarStyle::Plain);
        let v = graph.add_scalar(tags::INT, "1", ScalarStyle::Plain);
        graph.insert_entry(map, k, v).unwrap();

        let mut serializer = open_serializer(SerializerOptions::new().with_explicit_types(true));
        serializer.serialize(&graph, map).unwrap();
        let events = serializer.into_inner();

        for event in body(&events) {
            match event {
                Event::Scalar { implicit, .. } => assert_eq!(*implicit, ImplicitTags::EXPLICIT),
                Event::MappingStart { implicit, .. } => assert!(!implicit),
                Event::MappingEnd => {}
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[test]
    fn test_custom_collection_tag_is_explicit() {
        let mut graph = Graph::new();
        let set = graph.add_mapping("tag:yaml.org,2002:set", FlowStyle::Any);

        let mut serializer = open_serializer(SerializerOptions::new());
        serializer.serialize(&graph, set).unwrap();
        let events = serializer.into_inner();

        assert!(matches!(
            &body(&events)[0],
            Event::MappingStart { implicit: false, .. }
        ));
    }

    #[test]
    fn test_document_markers_and_directives() {
        let mut graph = Graph::new();
        let root = graph.add_scalar(tags::NULL, "~", ScalarStyle::Plain);
        let options = SerializerOptions::new()
            .with_explicit_start(true)
            .with_explicit_end(true)
            .with_version("1.1")
            .with_tag_directive("!e!", "tag:example.com,2000:");

        let mut serializer = open_serializer(options);
        serializer.serialize(&graph, root).unwrap();
        let events = serializer.into_inner();

        match &events[1] {
            Event::DocumentStart {
                explicit,
                version,
                tags,
            } => {
                assert!(*explicit);
                assert_eq!(*version, Some(Version::new(1, 1)));
                assert_eq!(tags.as_ref().map(|t| t.len()), Some(1));
            }
            other => panic!("expected document start, got {other:?}"),
        }
        assert_eq!(events.last(), Some(&Event::DocumentEnd { explicit: true }));
    }

    #[test]
    fn test_lifecycle_errors() {
        let graph = {
            let mut graph = Graph::new();
            graph.add_scalar(tags::STR, "x", ScalarStyle::Plain);
            graph
        };
        let root = NodeId::new(0);

        let mut serializer =
            Serializer::new(Vec::<Event>::new(), SerializerOptions::new()).unwrap();
        assert_eq!(serializer.serialize(&graph, root), Err(Error::NotOpened));
        assert_eq!(serializer.close(), Err(Error::NotOpened));

        serializer.open().unwrap();
        assert_eq!(serializer.open(), Err(Error::AlreadyOpened));
        serializer.close().unwrap();
        assert_eq!(serializer.close(), Ok(()));
        assert_eq!(serializer.state(), State::Closed);

        assert_eq!(serializer.open(), Err(Error::Closed));
        assert_eq!(serializer.serialize(&graph, root), Err(Error::Closed));
        assert_eq!(
            serializer.into_inner(),
            vec![Event::StreamStart, Event::StreamEnd]
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let bad_version = SerializerOptions::new().with_version("one.two");
        assert!(matches!(
            Serializer::new(Vec::<Event>::new(), bad_version),
            Err(Error::InvalidVersion(_))
        ));

        let bad_anchor = SerializerOptions::new().with_anchor_format("anchor");
        assert!(matches!(
            Serializer::new(Vec::<Event>::new(), bad_anchor),
            Err(Error::InvalidAnchorFormat(_))
        ));
    }

    #[test]
    fn test_unknown_root_emits_nothing() {
        let graph = Graph::new();
        let mut serializer = open_serializer(SerializerOptions::new());
        assert_eq!(
            serializer.serialize(&graph, NodeId::new(7)),
            Err(Error::UnknownNode(NodeId::new(7)))
        );
        assert_eq!(serializer.into_inner(), vec![Event::StreamStart]);
    }

    #[test]
    fn test_exempt_cycle_is_an_error() {
        let mut graph = Graph::new();
        let seq = graph.add_sequence("!loop", FlowStyle::Any);
        graph.push_item(seq, seq).unwrap();

        let mut serializer = Serializer::new(Vec::<Event>::new(), SerializerOptions::new())
            .unwrap()
            .with_anchor_exemption(|g, id| g.get(id).map_or(false, |n| n.tag == "!loop"));
        serializer.open().unwrap();

        assert_eq!(
            serializer.serialize(&graph, seq),
            Err(Error::UnanchoredCycle(seq))
        );
        assert_eq!(serializer.into_inner(), vec![Event::StreamStart]);
    }

    #[test]
    fn test_children_of_shared_exempt_node_are_aliased() {
        let mut graph = Graph::new();
        let seq = graph.add_sequence(tags::SEQ, FlowStyle::Any);
        let group = graph.add_sequence("!group", FlowStyle::Any);
        let leaf = graph.add_scalar(tags::STR, "payload", ScalarStyle::Plain);
        graph.push_item(group, leaf).unwrap();
        graph.push_item(seq, group).unwrap();
        graph.push_item(seq, group).unwrap();

        let mut serializer = Serializer::new(Vec::<Event>::new(), SerializerOptions::new())
            .unwrap()
            .with_anchor_exemption(|g, id| g.get(id).map_or(false, |n| n.tag == "!group"));
        serializer.open().unwrap();
        serializer.serialize(&graph, seq).unwrap();
        let events = serializer.into_inner();

        let group_start = |anchor: Option<&str>| Event::SequenceStart {
            anchor: anchor.map(str::to_string),
            tag: "!group".to_string(),
            implicit: false,
            flow_style: FlowStyle::Any,
        };
        assert_eq!(
            &body(&events)[1..],
            &[
                group_start(None),
                Event::Scalar {
                    anchor: Some("id0001".to_string()),
                    tag: tags::STR.to_string(),
                    implicit: ImplicitTags::new(true, true),
                    value: "payload".to_string(),
                    style: ScalarStyle::Plain,
                },
                Event::SequenceEnd,
                group_start(None),
                Event::Alias {
                    anchor: "id0001".to_string()
                },
                Event::SequenceEnd,
                Event::SequenceEnd,
            ]
        );
    }

    #[test]
    fn test_cycle_through_exempt_node_is_broken_by_alias() {
        // group -> seq -> group, only the group is exempt
        let mut graph = Graph::new();
        let group = graph.add_sequence("!group", FlowStyle::Any);
        let seq = graph.add_sequence(tags::SEQ, FlowStyle::Any);
        graph.push_item(group, seq).unwrap();
        graph.push_item(seq, group).unwrap();

        let mut serializer = Serializer::new(Vec::<Event>::new(), SerializerOptions::new())
            .unwrap()
            .with_anchor_exemption(|g, id| g.get(id).map_or(false, |n| n.tag == "!group"));
        serializer.open().unwrap();
        serializer.serialize(&graph, group).unwrap();
        let events = serializer.into_inner();

        let starts: Vec<Option<&str>> = body(&events)
            .iter()
            .filter(|e| matches!(e, Event::SequenceStart { .. }))
            .map(Event::anchor)
            .collect();
        // group, seq &id0001, group again, then *id0001
        assert_eq!(starts, vec![None, Some("id0001"), None]);
        assert!(body(&events).contains(&Event::Alias {
            anchor: "id0001".to_string()
        }));
    }

    #[test]
    fn test_exempt_shared_node_is_expanded_twice() {
        let mut graph = Graph::new();
        let seq = graph.add_sequence(tags::SEQ, FlowStyle::Any);
        let leaf = graph.add_scalar("!big", "payload", ScalarStyle::Plain);
        graph.push_item(seq, leaf).unwrap();
        graph.push_item(seq, leaf).unwrap();

        let mut serializer = Serializer::new(Vec::<Event>::new(), SerializerOptions::new())
            .unwrap()
            .with_anchor_exemption(|g, id| g.get(id).map_or(false, |n| n.tag == "!big"));
        serializer.open().unwrap();
        serializer.serialize(&graph, seq).unwrap();
        let events = serializer.into_inner();

        let scalars = body(&events)
            .iter()
            .filter(|e| matches!(e, Event::Scalar { anchor: None, .. }))
            .count();
        assert_eq!(scalars, 2);
        assert!(!body(&events).iter().any(|e| matches!(e, Event::Alias { .. })));
    }
}

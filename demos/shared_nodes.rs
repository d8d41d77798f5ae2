//! Serializes a small graph with a shared node and a cycle, and prints the
//! resulting events in test-suite notation.
//!
//! Run with: `cargo run --example shared_nodes`

use yaml_serializer::node::tags;
use yaml_serializer::{EventLog, FlowStyle, Graph, ScalarStyle, Serializer, SerializerOptions};

fn main() -> yaml_serializer::Result<()> {
    let mut graph = Graph::new();

    // defaults: &id0001 {adapter: postgres}
    let defaults = graph.add_mapping(tags::MAP, FlowStyle::Flow);
    let adapter = graph.add_scalar(tags::STR, "adapter", ScalarStyle::Plain);
    let postgres = graph.add_scalar(tags::STR, "postgres", ScalarStyle::Plain);
    graph.insert_entry(defaults, adapter, postgres)?;

    let root = graph.add_mapping(tags::MAP, FlowStyle::Block);
    for env in ["development", "test"] {
        let key = graph.add_scalar(tags::STR, env, ScalarStyle::Plain);
        graph.insert_entry(root, key, defaults)?;
    }

    // The root refers back to itself
    let me = graph.add_scalar(tags::STR, "self", ScalarStyle::Plain);
    graph.insert_entry(root, me, root)?;

    let options = SerializerOptions::new()
        .with_explicit_start(true)
        .with_version("1.1");
    let mut serializer = Serializer::new(EventLog::new(std::io::stdout()), options)?;
    serializer.open()?;
    serializer.serialize(&graph, root)?;
    serializer.close()
}

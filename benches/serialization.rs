use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yaml_serializer::node::tags;
use yaml_serializer::{
    to_events, AnchorPlanner, AnchorTemplate, EventLog, FlowStyle, Graph, NodeId, ScalarStyle,
    Serializer, SerializerOptions,
};

/// A list of `size` records, each `{id: <n>, name: <text>, owner: *shared}`.
fn records(size: usize) -> (Graph, NodeId) {
    let mut graph = Graph::with_capacity(size * 7 + 4);
    let root = graph.add_sequence(tags::SEQ, FlowStyle::Block);
    let owner = graph.add_mapping(tags::MAP, FlowStyle::Flow);
    let owner_key = graph.add_scalar(tags::STR, "name", ScalarStyle::Plain);
    let owner_name = graph.add_scalar(tags::STR, "Alice", ScalarStyle::Plain);
    graph.insert_entry(owner, owner_key, owner_name).unwrap();

    for i in 0..size {
        let record = graph.add_mapping(tags::MAP, FlowStyle::Block);
        let id_key = graph.add_scalar(tags::STR, "id", ScalarStyle::Plain);
        let id = graph.add_scalar(tags::INT, i.to_string(), ScalarStyle::Plain);
        let name_key = graph.add_scalar(tags::STR, "name", ScalarStyle::Plain);
        let name = graph.add_scalar(tags::STR, format!("Product {}", i), ScalarStyle::Plain);
        let owner_ref = graph.add_scalar(tags::STR, "owner", ScalarStyle::Plain);
        graph.insert_entry(record, id_key, id).unwrap();
        graph.insert_entry(record, name_key, name).unwrap();
        graph.insert_entry(record, owner_ref, owner).unwrap();
        graph.push_item(root, record).unwrap();
    }
    (graph, root)
}

fn benchmark_to_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_events");

    for size in [10, 100, 1000].iter() {
        let (graph, root) = records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| to_events(black_box(graph), root))
        });
    }
    group.finish();
}

fn benchmark_anchor_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor_plan");
    let template = AnchorTemplate::default();

    for size in [10, 100, 1000].iter() {
        let (graph, root) = records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| AnchorPlanner::new(&template).plan(black_box(graph), root))
        });
    }
    group.finish();
}

fn benchmark_event_log(c: &mut Criterion) {
    let (graph, root) = records(100);

    c.bench_function("event_log_100", |b| {
        b.iter(|| {
            let sink = EventLog::new(Vec::<u8>::with_capacity(16 * 1024));
            let mut serializer = Serializer::new(sink, SerializerOptions::new()).unwrap();
            serializer.open().unwrap();
            serializer.serialize(black_box(&graph), root).unwrap();
            serializer.close().unwrap();
            serializer.into_inner().into_inner()
        })
    });
}

criterion_group!(
    benches,
    benchmark_to_events,
    benchmark_anchor_plan,
    benchmark_event_log
);
criterion_main!(benches);

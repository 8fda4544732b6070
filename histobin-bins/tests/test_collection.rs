use histobin_bins::attribute::AttributeType;
use histobin_bins::collection::BinCollection;
use histobin_bins::comparator::BinComparator;
use histobin_bins::creator::{BinCreator, BinCreatorRegistry};
use histobin_bins::filter::ElementFilter;
use histobin_bins::formatter::StartsWith;
use histobin_common::element::ElementKind;
use histobin_common::error::GraphError;
use histobin_common::graph::MemoryGraph;
use histobin_common::source::{AttributeId, ElementRead, ElementWrite};
use histobin_common::value::{Value, ValueType};
use std::collections::HashSet;

fn creator(graph: &MemoryGraph, attribute_type: AttributeType, kind: ElementKind, name: &str) -> BinCreator {
    let registry = BinCreatorRegistry::with_defaults();
    attribute_type
        .bin_creators(graph, kind, &registry)
        .swap_remove(name)
        .unwrap()
}

/// Ten vertices typed A, A, B, null, A, B, null, A, B, null with 0, 4 and 8 selected
fn typed_vertices() -> (MemoryGraph, AttributeId) {
    let mut graph = MemoryGraph::new();
    graph.add_vertices(10);
    let attr = graph.add_attribute(ElementKind::Vertex, "type", ValueType::String);
    let types = ["A", "A", "B", "", "A", "B", "", "A", "B", ""];
    for (vertex, t) in types.iter().enumerate() {
        if !t.is_empty() {
            graph.set_value(attr, vertex, Value::from(*t));
        }
    }
    for vertex in [0, 4, 8] {
        graph.select(ElementKind::Vertex, vertex);
    }
    (graph, attr)
}

fn build(graph: &MemoryGraph, attr: AttributeId) -> BinCollection {
    let creator = creator(graph, AttributeType::Attribute, ElementKind::Vertex, "type");
    BinCollection::build(graph, ElementKind::Vertex, Some(attr), &creator, None, None)
}

fn count_of(collection: &BinCollection, key: &Value) -> (usize, usize) {
    collection
        .bins()
        .iter()
        .find(|b| b.key() == key)
        .map(|b| (b.element_count(), b.selected_count))
        .unwrap()
}

#[test]
fn test_identity_binning_with_nulls() {
    let (graph, attr) = typed_vertices();
    let collection = build(&graph, attr);

    assert_eq!(collection.len(), 3);
    assert_eq!(count_of(&collection, &Value::from("A")), (4, 2));
    assert_eq!(count_of(&collection, &Value::from("B")), (3, 1));
    assert_eq!(count_of(&collection, &Value::Null), (3, 0));
    assert_eq!(collection.bins().iter().filter(|b| b.is_null()).count(), 1);
    let total: usize = collection.bins().iter().map(|b| b.element_count()).sum();
    assert_eq!(total, 10);
}

#[test]
fn test_chains_partition_elements() {
    let (graph, attr) = typed_vertices();
    let collection = build(&graph, attr);

    let mut seen = HashSet::new();
    for index in 0..collection.len() {
        let positions: Vec<_> = collection.positions(index).collect();
        assert_eq!(positions.len(), collection.bins()[index].element_count());
        let key = collection.bins()[index].key().clone();
        for p in positions {
            assert!(seen.insert(p), "position {p} in two bins");
            assert_eq!(graph.value(attr, p), key);
        }
    }
    assert_eq!(seen.len(), 10);
}

#[test]
fn test_sort_keeps_chains() {
    let (graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    collection.sort(BinComparator::ReverseTotalCount);

    let labels: Vec<_> = collection.bins().iter().map(|b| b.display_label()).collect();
    assert_eq!(labels, vec!["A", "B", "<No Value>"]);
    let a: Vec<_> = collection.positions(0).collect();
    assert_eq!(a, vec![7, 4, 1, 0]);
}

#[test]
fn test_sort_reports_moves() {
    let (graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    let before: Vec<Value> = collection.bins().iter().map(|b| b.key().clone()).collect();
    let moved = collection.sort(BinComparator::ReverseKey);
    for (old, key) in before.iter().enumerate() {
        assert_eq!(collection.bins()[moved[old]].key(), key);
    }
    assert_eq!(collection.sort(BinComparator::ReverseKey), vec![0, 1, 2]);
}

#[test]
fn test_filter_excludes_elements() {
    let (graph, attr) = typed_vertices();
    let creator = creator(&graph, AttributeType::Attribute, ElementKind::Vertex, "type");
    let filter = ElementFilter::from_selection(&graph, ElementKind::Vertex);
    let collection = BinCollection::build(&graph, ElementKind::Vertex, Some(attr), &creator, Some(&filter), None);

    assert_eq!(collection.len(), 2);
    let total: usize = collection.bins().iter().map(|b| b.element_count()).sum();
    assert_eq!(total, 3);
    assert!(collection.bins().iter().all(|b| b.is_fully_selected()));
}

#[test]
fn test_formatter_regroups_keys() {
    let mut graph = MemoryGraph::new();
    graph.add_vertices(4);
    let attr = graph.add_attribute(ElementKind::Vertex, "name", ValueType::String);
    for (vertex, name) in ["apple", "apricot", "banana", "avocado"].iter().enumerate() {
        graph.set_value(attr, vertex, Value::from(*name));
    }
    let creator = creator(&graph, AttributeType::Attribute, ElementKind::Vertex, "name");
    let formatter = StartsWith { length: 1 };
    let collection =
        BinCollection::build(&graph, ElementKind::Vertex, Some(attr), &creator, None, Some(&formatter));
    assert_eq!(collection.to_text(true, false), "a\t3\nb\t1\n");
}

#[test]
fn test_endpoint_representative_skips_missing() -> Result<(), GraphError> {
    let mut graph = MemoryGraph::new();
    graph.add_vertices(3);
    let attr = graph.add_attribute(ElementKind::Vertex, "colour", ValueType::String);
    graph.set_value(attr, 0, Value::from("red"));
    graph.set_value(attr, 1, Value::from("blue"));
    graph.add_transaction(0, 1, true)?;
    graph.add_transaction(0, 2, true)?;
    graph.add_transaction(1, 0, true)?;

    let creator = creator(&graph, AttributeType::DestinationVertexAttribute, ElementKind::Transaction, "colour");
    let collection = BinCollection::build(&graph, ElementKind::Transaction, Some(attr), &creator, None, None);
    assert_eq!(collection.to_text(true, false), "blue\t1\n<No Value>\t1\nred\t1\n");
    Ok(())
}

#[test]
fn test_graph_property_bins() -> Result<(), GraphError> {
    let mut graph = MemoryGraph::new();
    graph.add_vertices(4);
    graph.add_transaction(0, 1, true)?;
    graph.add_transaction(0, 2, true)?;
    graph.add_transaction(0, 3, true)?;

    let creator = creator(&graph, AttributeType::GraphProperty, ElementKind::Vertex, "Neighbour Count");
    let mut collection = BinCollection::build(&graph, ElementKind::Vertex, None, &creator, None, None);
    collection.sort(BinComparator::Key);
    assert_eq!(collection.to_text(true, false), "1\t3\n3\t1\n");
    Ok(())
}

#[test]
fn test_export_selected_only() {
    let (graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    collection.sort(BinComparator::Key);
    assert_eq!(collection.to_text(true, false), "<No Value>\t3\nA\t4\nB\t3\n");
    assert_eq!(collection.to_text(true, true), "A\t2\nB\t1\n");
    assert_eq!(collection.to_text(false, true), "A\nB\n");
}

#[test]
fn test_select_only_bins() {
    let (mut graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    collection.sort(BinComparator::Key);

    collection.select_only_bins(&mut graph, 2, 2);
    assert_eq!(graph.selected(ElementKind::Vertex), vec![2, 5, 8]);
    let counts: Vec<_> = collection.bins().iter().map(|b| b.selected_count).collect();
    assert_eq!(counts, vec![0, 0, 3]);
}

#[test]
fn test_select_and_invert_bins() {
    let (mut graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    collection.sort(BinComparator::Key);

    collection.invert_bins(&mut graph, 1, 1);
    assert_eq!(graph.selected(ElementKind::Vertex), vec![1, 7, 8]);
    assert_eq!(collection.bins()[1].selected_count, 2);

    collection.select_bins(&mut graph, 0, 0, true);
    assert_eq!(graph.selected(ElementKind::Vertex), vec![1, 3, 6, 7, 8, 9]);

    collection.select_bins(&mut graph, 1, 99, false);
    assert_eq!(graph.selected(ElementKind::Vertex), vec![3, 6, 9]);
}

#[test]
fn test_complete_bins() {
    let (mut graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    collection.sort(BinComparator::Key);

    collection.complete_bins(&mut graph, 0, 2);
    assert_eq!(graph.selected(ElementKind::Vertex), vec![0, 1, 2, 4, 5, 7, 8]);
    let counts: Vec<_> = collection.bins().iter().map(|b| b.selected_count).collect();
    assert_eq!(counts, vec![0, 4, 3]);
}

#[test]
fn test_select_bin_indices() {
    let (mut graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    collection.sort(BinComparator::Key);

    collection.select_bin_indices(&mut graph, &[0, 7]);
    assert_eq!(graph.selected(ElementKind::Vertex), vec![0, 3, 4, 6, 8, 9]);
}

#[test]
fn test_update_selection_recounts() {
    let (mut graph, attr) = typed_vertices();
    let mut collection = build(&graph, attr);
    let selection = graph.selection_attribute(ElementKind::Vertex).unwrap();
    for vertex in 0..10 {
        graph.set_selected(selection, vertex, true);
    }
    collection.update_selection(&graph);
    assert!(collection.bins().iter().all(|b| b.is_fully_selected()));
}

#[test]
fn test_merged_selection_reaches_transactions() -> Result<(), GraphError> {
    let mut graph = MemoryGraph::new();
    graph.add_vertices(3);
    let attr = graph.add_attribute(ElementKind::Link, "kind", ValueType::String);
    graph.add_transaction(0, 1, true)?;
    graph.add_transaction(1, 0, true)?;
    graph.add_transaction(1, 2, true)?;
    graph.set_value(attr, graph.link(0, 1).unwrap(), Value::from("x"));
    graph.set_value(attr, graph.link(1, 2).unwrap(), Value::from("y"));

    let creator = creator(&graph, AttributeType::Attribute, ElementKind::Link, "kind");
    let mut collection = BinCollection::build(&graph, ElementKind::Link, Some(attr), &creator, None, None);
    collection.sort(BinComparator::Key);
    collection.select_only_bins(&mut graph, 0, 0);
    assert_eq!(graph.selected(ElementKind::Transaction), vec![0, 1]);
    assert_eq!(collection.bins()[0].selected_count, 1);
    Ok(())
}

#[test]
fn test_empty_source() {
    let graph = MemoryGraph::new();
    let creator = creator(&graph, AttributeType::GraphProperty, ElementKind::Vertex, "Transaction Count");
    let collection = BinCollection::build(&graph, ElementKind::Vertex, None, &creator, None, None);
    assert!(collection.is_empty());
    assert_eq!(collection.max_element_count(), 0);
    assert_eq!(collection.to_text(true, false), "");
}

use crate::accumulator::{Aggregation, GraphProperty, GraphPropertyAccumulator};
use crate::creator::{BinCreator, BinCreatorRegistry};
use crate::representative::Representative;
use histobin_common::element::ElementKind;
use histobin_common::source::ElementRead;
use histobin_common::value::ValueType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// How the key of an element is derived.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// The element's own attribute
    #[default]
    Attribute,
    /// A structural property such as a neighbour or transaction count
    GraphProperty,
    /// An attribute of the source vertex
    SourceVertexAttribute,
    /// An attribute of the destination vertex
    DestinationVertexAttribute,
    /// A transaction attribute folded over every transaction under the element
    TransactionAggregate(Aggregation),
    /// A vertex attribute folded over every neighbour
    NeighbourAggregate(Aggregation),
}

impl AttributeType {
    pub fn all() -> Vec<AttributeType> {
        let mut types = vec![
            AttributeType::Attribute,
            AttributeType::GraphProperty,
            AttributeType::SourceVertexAttribute,
            AttributeType::DestinationVertexAttribute,
        ];
        types.extend(Aggregation::iter().map(AttributeType::TransactionAggregate));
        types.extend(Aggregation::iter().map(AttributeType::NeighbourAggregate));
        types
    }

    pub fn applies_to(&self, kind: ElementKind) -> bool {
        match self {
            AttributeType::Attribute | AttributeType::GraphProperty => true,
            AttributeType::SourceVertexAttribute | AttributeType::DestinationVertexAttribute => {
                kind != ElementKind::Vertex
            }
            AttributeType::TransactionAggregate(_) => kind != ElementKind::Transaction,
            AttributeType::NeighbourAggregate(_) => kind == ElementKind::Vertex,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            AttributeType::TransactionAggregate(_) | AttributeType::NeighbourAggregate(_)
        )
    }

    /// The kind whose attributes are offered when binning elements of `kind`
    pub fn attribute_kind(&self, kind: ElementKind) -> Option<ElementKind> {
        match self {
            AttributeType::Attribute => Some(kind),
            AttributeType::GraphProperty => None,
            AttributeType::SourceVertexAttribute
            | AttributeType::DestinationVertexAttribute
            | AttributeType::NeighbourAggregate(_) => Some(ElementKind::Vertex),
            AttributeType::TransactionAggregate(_) => Some(ElementKind::Transaction),
        }
    }

    /// Bin creators offered for elements of `kind`, keyed by attribute or
    /// property name in name order
    pub fn bin_creators(
        &self,
        source: &dyn ElementRead,
        kind: ElementKind,
        registry: &BinCreatorRegistry,
    ) -> IndexMap<String, BinCreator> {
        let mut creators = IndexMap::new();
        if !self.applies_to(kind) {
            return creators;
        }
        let Some(attribute_kind) = self.attribute_kind(kind) else {
            for property in GraphProperty::for_kind(kind) {
                creators.insert(
                    property.label().to_string(),
                    BinCreator::without_attribute(
                        Representative::Identity,
                        Arc::new(GraphPropertyAccumulator::new(*property, kind)),
                    ),
                );
            }
            creators.sort_keys();
            return creators;
        };

        let mut attributes = source.attributes(attribute_kind);
        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        for attribute in attributes {
            let creator = match registry.get(*self, attribute.value_type) {
                Some(creator) => Some(creator),
                None if !self.is_aggregate() => registry.get(*self, ValueType::Object),
                None => None,
            };
            if let Some(creator) = creator {
                creators.insert(attribute.name, creator.clone());
            }
        }
        creators
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::Attribute => f.write_str("Attribute"),
            AttributeType::GraphProperty => f.write_str("Graph Property"),
            AttributeType::SourceVertexAttribute => f.write_str("Source Node Attribute"),
            AttributeType::DestinationVertexAttribute => f.write_str("Destination Node Attribute"),
            AttributeType::TransactionAggregate(aggregation) => {
                write!(f, "{} Transaction Attribute", aggregation.label())
            }
            AttributeType::NeighbourAggregate(aggregation) => {
                write!(f, "{} Neighbour Attribute", aggregation.label())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histobin_common::graph::MemoryGraph;

    fn graph() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph.add_attribute(ElementKind::Vertex, "Type", ValueType::String);
        graph.add_attribute(ElementKind::Vertex, "Age", ValueType::Integer);
        graph.add_attribute(ElementKind::Transaction, "Amount", ValueType::Float);
        graph.add_attribute(ElementKind::Transaction, "Note", ValueType::String);
        graph
    }

    #[test]
    fn test_applies_to() {
        assert!(AttributeType::SourceVertexAttribute.applies_to(ElementKind::Edge));
        assert!(!AttributeType::SourceVertexAttribute.applies_to(ElementKind::Vertex));
        assert!(!AttributeType::TransactionAggregate(Aggregation::Sum).applies_to(ElementKind::Transaction));
        assert!(AttributeType::NeighbourAggregate(Aggregation::Sum).applies_to(ElementKind::Vertex));
        assert!(!AttributeType::NeighbourAggregate(Aggregation::Sum).applies_to(ElementKind::Link));
    }

    #[test]
    fn test_attribute_creators_sorted_by_name() {
        let registry = BinCreatorRegistry::with_defaults();
        let creators = AttributeType::Attribute.bin_creators(&graph(), ElementKind::Vertex, &registry);
        let names: Vec<_> = creators.keys().cloned().collect();
        assert_eq!(names, vec!["Age", "Type", "selected"]);
    }

    #[test]
    fn test_aggregate_creators_skip_unsupported_types() {
        let registry = BinCreatorRegistry::with_defaults();
        let creators = AttributeType::TransactionAggregate(Aggregation::Average).bin_creators(
            &graph(),
            ElementKind::Link,
            &registry,
        );
        let names: Vec<_> = creators.keys().cloned().collect();
        assert_eq!(names, vec!["Amount"]);

        let creators = AttributeType::TransactionAggregate(Aggregation::UniqueValues).bin_creators(
            &graph(),
            ElementKind::Vertex,
            &registry,
        );
        assert_eq!(creators.len(), 3);
    }

    #[test]
    fn test_graph_property_creators() {
        let registry = BinCreatorRegistry::with_defaults();
        let creators = AttributeType::GraphProperty.bin_creators(&graph(), ElementKind::Vertex, &registry);
        assert_eq!(creators.len(), 5);
        assert!(creators.contains_key("Neighbour Count"));
        assert!(creators.values().all(|c| !c.attribute_required));

        let creators = AttributeType::GraphProperty.bin_creators(&graph(), ElementKind::Transaction, &registry);
        assert_eq!(creators.keys().collect::<Vec<_>>(), vec!["Transaction Direction"]);
    }

    #[test]
    fn test_not_applicable_offers_nothing() {
        let registry = BinCreatorRegistry::with_defaults();
        let creators = AttributeType::SourceVertexAttribute.bin_creators(&graph(), ElementKind::Vertex, &registry);
        assert!(creators.is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(AttributeType::SourceVertexAttribute.to_string(), "Source Node Attribute");
        assert_eq!(
            AttributeType::TransactionAggregate(Aggregation::UniqueValues).to_string(),
            "Unique Values Transaction Attribute"
        );
        assert_eq!(AttributeType::all().len(), 14);
    }

    #[test]
    fn test_serde() -> Result<(), serde_json::Error> {
        let parsed: AttributeType = serde_json::from_str(r#"{"transaction_aggregate": "average"}"#)?;
        assert_eq!(parsed, AttributeType::TransactionAggregate(Aggregation::Average));
        let parsed: AttributeType = serde_json::from_str(r#""graph_property""#)?;
        assert_eq!(parsed, AttributeType::GraphProperty);
        Ok(())
    }
}

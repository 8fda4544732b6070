use super::BinAccumulator;
use histobin_common::element::{ElementId, ElementKind};
use histobin_common::source::{AttributeId, ElementRead};
use histobin_common::value::Value;

/// A structural property of an element, computed from the graph topology.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum GraphProperty {
    NeighbourCount,
    TransactionCount,
    OutgoingTransactionCount,
    IncomingTransactionCount,
    UndirectedTransactionCount,
    TransactionDirection,
}

impl GraphProperty {
    pub fn label(&self) -> &'static str {
        match self {
            GraphProperty::NeighbourCount => "Neighbour Count",
            GraphProperty::TransactionCount => "Transaction Count",
            GraphProperty::OutgoingTransactionCount => "Outgoing Transaction Count",
            GraphProperty::IncomingTransactionCount => "Incoming Transaction Count",
            GraphProperty::UndirectedTransactionCount => "Undirected Transaction Count",
            GraphProperty::TransactionDirection => "Transaction Direction",
        }
    }

    pub fn for_kind(kind: ElementKind) -> &'static [GraphProperty] {
        match kind {
            ElementKind::Vertex => &[
                GraphProperty::NeighbourCount,
                GraphProperty::TransactionCount,
                GraphProperty::OutgoingTransactionCount,
                GraphProperty::IncomingTransactionCount,
                GraphProperty::UndirectedTransactionCount,
            ],
            ElementKind::Link | ElementKind::Edge => &[GraphProperty::TransactionCount],
            ElementKind::Transaction => &[GraphProperty::TransactionDirection],
        }
    }

    pub fn value(&self, source: &dyn ElementRead, kind: ElementKind, element: ElementId) -> Value {
        let count_directed = |outgoing: bool| {
            source
                .transactions(kind, element)
                .into_iter()
                .filter(|tx| source.is_directed(*tx))
                .filter_map(|tx| source.endpoints(ElementKind::Transaction, tx))
                .filter(|(src, dst)| if outgoing { *src == element } else { *dst == element })
                .count() as i64
        };
        match self {
            GraphProperty::NeighbourCount => Value::Int(source.neighbours(element).len() as i64),
            GraphProperty::TransactionCount => {
                Value::Int(source.transactions(kind, element).len() as i64)
            }
            GraphProperty::OutgoingTransactionCount => Value::Int(count_directed(true)),
            GraphProperty::IncomingTransactionCount => Value::Int(count_directed(false)),
            GraphProperty::UndirectedTransactionCount => Value::Int(
                source
                    .transactions(kind, element)
                    .into_iter()
                    .filter(|tx| !source.is_directed(*tx))
                    .count() as i64,
            ),
            GraphProperty::TransactionDirection => Value::Bool(source.is_directed(element)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphPropertyAccumulator {
    property: GraphProperty,
    kind: ElementKind,
    value: Value,
}

impl GraphPropertyAccumulator {
    pub fn new(property: GraphProperty, kind: ElementKind) -> Self {
        Self {
            property,
            kind,
            value: Value::Null,
        }
    }
}

impl BinAccumulator for GraphPropertyAccumulator {
    fn create(&self) -> Box<dyn BinAccumulator> {
        Box::new(Self::new(self.property, self.kind))
    }

    fn clear(&mut self) {
        self.value = Value::Null;
    }

    fn set_key(&mut self, source: &dyn ElementRead, _attribute: Option<AttributeId>, element: ElementId) {
        self.value = self.property.value(source, self.kind, element);
    }

    fn is_only_null(&self) -> bool {
        self.value.is_null()
    }

    fn key(&self) -> Value {
        self.value.clone()
    }

    fn label(&self) -> Option<String> {
        match self.value {
            Value::Null => None,
            Value::Bool(true) => Some("Directed".to_string()),
            Value::Bool(false) => Some("Undirected".to_string()),
            ref value => Some(value.to_string()),
        }
    }
}

use crate::element::{ElementId, ElementKind};
use crate::error::GraphError;
use crate::source::{Attribute, AttributeId, ElementRead, ElementWrite};
use crate::value::{Value, ValueType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const SELECTED_ATTRIBUTE: &str = "selected";

#[derive(Debug, Clone, Copy, PartialEq)]
struct TransactionRecord {
    source: ElementId,
    destination: ElementId,
    directed: bool,
}

#[derive(Debug, Clone)]
struct AttributeRecord {
    info: Attribute,
    values: Vec<Value>,
}

/// Groups transactions under a pair of vertices.
#[derive(Debug, Clone, Default)]
struct PairIndex {
    pairs: Vec<(ElementId, ElementId)>,
    transactions: Vec<Vec<ElementId>>,
    lookup: HashMap<(ElementId, ElementId), ElementId>,
}

impl PairIndex {
    fn add(&mut self, pair: (ElementId, ElementId), transaction: ElementId) {
        let id = match self.lookup.get(&pair) {
            Some(id) => *id,
            None => {
                let id = self.pairs.len();
                self.pairs.push(pair);
                self.transactions.push(Vec::new());
                self.lookup.insert(pair, id);
                id
            }
        };
        self.transactions[id].push(transaction);
    }
}

/// An in-memory element store.
///
/// Edges group transactions by their ordered endpoint pair and links by the
/// unordered pair. Vertices and transactions carry a boolean `selected`
/// attribute; links and edges are selected through their transactions.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    vertex_count: usize,
    transactions: Vec<TransactionRecord>,
    vertex_transactions: Vec<Vec<ElementId>>,
    edges: PairIndex,
    links: PairIndex,
    attributes: Vec<AttributeRecord>,
    selection: HashMap<ElementKind, AttributeId>,
    time_zone: Option<String>,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            vertex_count: 0,
            transactions: Vec::new(),
            vertex_transactions: Vec::new(),
            edges: PairIndex::default(),
            links: PairIndex::default(),
            attributes: Vec::new(),
            selection: HashMap::new(),
            time_zone: None,
        };
        for kind in [ElementKind::Vertex, ElementKind::Transaction] {
            let id = graph.add_attribute(kind, SELECTED_ATTRIBUTE, ValueType::Boolean);
            graph.selection.insert(kind, id);
        }
        graph
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let spec: GraphSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec)
    }

    pub fn from_spec(spec: &GraphSpec) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        graph.add_vertices(spec.vertices);
        for tx in &spec.transactions {
            graph.add_transaction(tx.source, tx.destination, tx.directed)?;
        }
        for attribute in &spec.attributes {
            let id = graph.add_attribute(attribute.kind, &attribute.name, attribute.value_type);
            for (position, json) in attribute.values.iter().enumerate() {
                graph.check_element(attribute.kind, position)?;
                let value = value_from_json(json, attribute.value_type).ok_or_else(|| {
                    GraphError::InvalidValue {
                        attribute: attribute.name.clone(),
                        position,
                        value_type: attribute.value_type,
                    }
                })?;
                let element = graph.element(attribute.kind, position);
                graph.set_value(id, element, value);
            }
        }
        for (kind, elements) in &spec.selected {
            for element in elements {
                graph.check_element(*kind, *element)?;
                graph.select(*kind, *element);
            }
        }
        graph.time_zone = spec.time_zone.clone();
        Ok(graph)
    }

    fn check_element(&self, kind: ElementKind, element: ElementId) -> Result<(), GraphError> {
        if element >= self.element_count(kind) {
            return Err(GraphError::UnknownElement { kind, element });
        }
        Ok(())
    }

    pub fn add_vertex(&mut self) -> ElementId {
        self.vertex_count += 1;
        self.vertex_transactions.push(Vec::new());
        self.vertex_count - 1
    }

    pub fn add_vertices(&mut self, count: usize) -> Vec<ElementId> {
        (0..count).map(|_| self.add_vertex()).collect()
    }

    pub fn add_transaction(
        &mut self,
        source: ElementId,
        destination: ElementId,
        directed: bool,
    ) -> Result<ElementId, GraphError> {
        for vertex in [source, destination] {
            if vertex >= self.vertex_count {
                return Err(GraphError::UnknownVertex(vertex));
            }
        }
        let id = self.transactions.len();
        self.transactions.push(TransactionRecord {
            source,
            destination,
            directed,
        });
        self.vertex_transactions[source].push(id);
        if destination != source {
            self.vertex_transactions[destination].push(id);
        }
        self.edges.add((source, destination), id);
        self.links
            .add((source.min(destination), source.max(destination)), id);
        Ok(id)
    }

    /// Adds an attribute, or returns the existing one with the same kind and name
    pub fn add_attribute(&mut self, kind: ElementKind, name: &str, value_type: ValueType) -> AttributeId {
        if let Some(existing) = self
            .attributes
            .iter()
            .find(|a| a.info.kind == kind && a.info.name == name)
        {
            return existing.info.id;
        }
        let id = AttributeId(self.attributes.len());
        self.attributes.push(AttributeRecord {
            info: Attribute {
                id,
                kind,
                name: name.to_string(),
                value_type,
            },
            values: Vec::new(),
        });
        id
    }

    pub fn edge(&self, source: ElementId, destination: ElementId) -> Option<ElementId> {
        self.edges.lookup.get(&(source, destination)).copied()
    }

    pub fn link(&self, a: ElementId, b: ElementId) -> Option<ElementId> {
        self.links.lookup.get(&(a.min(b), a.max(b))).copied()
    }

    /// Flags an element as selected, through its transactions for links and edges
    pub fn select(&mut self, kind: ElementKind, element: ElementId) {
        let (attribute_kind, targets) = match kind {
            ElementKind::Link | ElementKind::Edge => {
                (ElementKind::Transaction, self.transactions(kind, element))
            }
            _ => (kind, vec![element]),
        };
        if let Some(attribute) = self.selection_attribute(attribute_kind) {
            for target in targets {
                self.set_selected(attribute, target, true);
            }
        }
    }

    /// Elements of a kind whose selection flag is set, in position order
    pub fn selected(&self, kind: ElementKind) -> Vec<ElementId> {
        let Some(attribute) = self.selection_attribute(kind) else {
            return Vec::new();
        };
        (0..self.element_count(kind))
            .map(|position| self.element(kind, position))
            .filter(|element| self.is_selected(attribute, *element))
            .collect()
    }

    pub fn set_time_zone(&mut self, time_zone: Option<String>) {
        self.time_zone = time_zone;
    }
}

impl ElementRead for MemoryGraph {
    fn element_count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Vertex => self.vertex_count,
            ElementKind::Link => self.links.pairs.len(),
            ElementKind::Edge => self.edges.pairs.len(),
            ElementKind::Transaction => self.transactions.len(),
        }
    }

    fn element(&self, _kind: ElementKind, position: usize) -> ElementId {
        position
    }

    fn attributes(&self, kind: ElementKind) -> Vec<Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.info.kind == kind)
            .map(|a| a.info.clone())
            .collect()
    }

    fn attribute_info(&self, attribute: AttributeId) -> Option<Attribute> {
        self.attributes.get(attribute.0).map(|a| a.info.clone())
    }

    fn value(&self, attribute: AttributeId, element: ElementId) -> Value {
        self.attributes
            .get(attribute.0)
            .and_then(|a| a.values.get(element))
            .cloned()
            .unwrap_or_default()
    }

    fn selection_attribute(&self, kind: ElementKind) -> Option<AttributeId> {
        self.selection.get(&kind).copied()
    }

    fn endpoints(&self, kind: ElementKind, element: ElementId) -> Option<(ElementId, ElementId)> {
        match kind {
            ElementKind::Vertex => None,
            ElementKind::Link => self.links.pairs.get(element).copied(),
            ElementKind::Edge => self.edges.pairs.get(element).copied(),
            ElementKind::Transaction => self
                .transactions
                .get(element)
                .map(|tx| (tx.source, tx.destination)),
        }
    }

    fn transactions(&self, kind: ElementKind, element: ElementId) -> Vec<ElementId> {
        match kind {
            ElementKind::Vertex => self.vertex_transactions.get(element).cloned(),
            ElementKind::Link => self.links.transactions.get(element).cloned(),
            ElementKind::Edge => self.edges.transactions.get(element).cloned(),
            ElementKind::Transaction => {
                (element < self.transactions.len()).then(|| vec![element])
            }
        }
        .unwrap_or_default()
    }

    fn is_directed(&self, transaction: ElementId) -> bool {
        self.transactions
            .get(transaction)
            .is_some_and(|tx| tx.directed)
    }

    fn neighbours(&self, vertex: ElementId) -> Vec<ElementId> {
        self.transactions(ElementKind::Vertex, vertex)
            .into_iter()
            .filter_map(|tx| self.transactions.get(tx))
            .map(|tx| {
                if tx.source == vertex {
                    tx.destination
                } else {
                    tx.source
                }
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn time_zone(&self) -> Option<String> {
        self.time_zone.clone()
    }
}

impl ElementWrite for MemoryGraph {
    fn as_read(&self) -> &dyn ElementRead {
        self
    }

    fn set_value(&mut self, attribute: AttributeId, element: ElementId, value: Value) {
        let Some(record) = self.attributes.get_mut(attribute.0) else {
            return;
        };
        if record.values.len() <= element {
            record.values.resize(element + 1, Value::Null);
        }
        record.values[element] = value;
    }
}

/// Serializable description of a `MemoryGraph`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSpec {
    pub vertices: usize,
    pub transactions: Vec<TransactionSpec>,
    pub attributes: Vec<AttributeSpec>,
    pub selected: HashMap<ElementKind, Vec<ElementId>>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSpec {
    pub source: ElementId,
    pub destination: ElementId,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

fn default_directed() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub kind: ElementKind,
    pub name: String,
    pub value_type: ValueType,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// Date-times are read from RFC 3339 strings or epoch milliseconds
fn value_from_json(json: &serde_json::Value, value_type: ValueType) -> Option<Value> {
    use serde_json::Value as Json;
    if json.is_null() {
        return Some(Value::Null);
    }
    match (value_type, json) {
        (ValueType::Boolean, Json::Bool(v)) => Some(Value::Bool(*v)),
        (ValueType::Integer, Json::Number(n)) => n.as_i64().map(Value::Int),
        (ValueType::Float, Json::Number(n)) => n.as_f64().map(Value::float),
        (ValueType::String, Json::String(s)) => Some(Value::String(s.clone())),
        (ValueType::DateTime, Json::String(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Value::Timestamp(dt.with_timezone(&Utc))),
        (ValueType::DateTime, Json::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(Value::Timestamp),
        (ValueType::Object, Json::String(s)) => Some(Value::Object(s.clone())),
        (ValueType::Object, other) => Some(Value::Object(other.to_string())),
        _ => None,
    }
}

use crate::element::{ElementId, ElementKind};
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttributeId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: AttributeId,
    pub kind: ElementKind,
    pub name: String,
    pub value_type: ValueType,
}

/// Read access to an element store.
///
/// Elements of each kind are addressable by position `0..element_count(kind)`.
/// Lookups that can fail return `None` rather than an error.
pub trait ElementRead {
    fn element_count(&self, kind: ElementKind) -> usize;

    fn element(&self, kind: ElementKind, position: usize) -> ElementId;

    fn attributes(&self, kind: ElementKind) -> Vec<Attribute>;

    fn attribute(&self, kind: ElementKind, name: &str) -> Option<AttributeId> {
        self.attributes(kind)
            .into_iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.id)
    }

    fn attribute_info(&self, attribute: AttributeId) -> Option<Attribute>;

    /// Returns `Value::Null` when the element has no value
    fn value(&self, attribute: AttributeId, element: ElementId) -> Value;

    /// The boolean attribute that flags selected elements of a kind, if any
    fn selection_attribute(&self, kind: ElementKind) -> Option<AttributeId>;

    fn is_selected(&self, attribute: AttributeId, element: ElementId) -> bool {
        matches!(self.value(attribute, element), Value::Bool(true))
    }

    /// Source and destination vertices of a link, edge or transaction
    fn endpoints(&self, kind: ElementKind, element: ElementId) -> Option<(ElementId, ElementId)>;

    /// Transactions incident to a vertex, grouped under a link or edge, or
    /// the transaction itself
    fn transactions(&self, kind: ElementKind, element: ElementId) -> Vec<ElementId>;

    fn is_directed(&self, transaction: ElementId) -> bool;

    fn neighbours(&self, vertex: ElementId) -> Vec<ElementId>;

    /// IANA name of the time zone date-times should be presented in
    fn time_zone(&self) -> Option<String> {
        None
    }
}

/// Write access to an element store.
pub trait ElementWrite: ElementRead {
    fn as_read(&self) -> &dyn ElementRead;

    fn set_value(&mut self, attribute: AttributeId, element: ElementId, value: Value);

    fn set_selected(&mut self, attribute: AttributeId, element: ElementId, selected: bool) {
        self.set_value(attribute, element, Value::Bool(selected))
    }
}

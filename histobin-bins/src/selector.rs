use histobin_common::element::{ElementId, ElementKind};
use histobin_common::source::{AttributeId, ElementRead, ElementWrite};

/// Reads and writes the selection state of elements of one kind.
///
/// Vertices and transactions carry their own selection flag. Links and edges
/// are selected through their transactions: setting the state writes every
/// transaction, and the element counts as selected when any transaction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinSelector {
    Direct(AttributeId),
    Relation(AttributeId),
    Unavailable,
}

impl BinSelector {
    pub fn for_kind(source: &dyn ElementRead, kind: ElementKind) -> Self {
        let attribute = match kind {
            ElementKind::Link | ElementKind::Edge => source
                .selection_attribute(ElementKind::Transaction)
                .map(BinSelector::Relation),
            _ => source.selection_attribute(kind).map(BinSelector::Direct),
        };
        attribute.unwrap_or(BinSelector::Unavailable)
    }

    pub fn is_selected(&self, source: &dyn ElementRead, kind: ElementKind, element: ElementId) -> bool {
        match *self {
            BinSelector::Direct(attribute) => source.is_selected(attribute, element),
            BinSelector::Relation(attribute) => source
                .transactions(kind, element)
                .into_iter()
                .any(|tx| source.is_selected(attribute, tx)),
            BinSelector::Unavailable => false,
        }
    }

    pub fn set_selected(&self, graph: &mut dyn ElementWrite, kind: ElementKind, element: ElementId, selected: bool) {
        match *self {
            BinSelector::Direct(attribute) => graph.set_selected(attribute, element, selected),
            BinSelector::Relation(attribute) => {
                for tx in graph.transactions(kind, element) {
                    graph.set_selected(attribute, tx, selected);
                }
            }
            BinSelector::Unavailable => {}
        }
    }
}

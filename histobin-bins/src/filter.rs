use crate::selector::BinSelector;
use histobin_common::element::{ElementId, ElementKind};
use histobin_common::source::ElementRead;
use std::collections::HashSet;

/// The set of elements admitted into a histogram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementFilter {
    elements: HashSet<ElementId>,
}

impl ElementFilter {
    pub fn new(elements: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// Admits the elements of `kind` that are currently selected
    pub fn from_selection(source: &dyn ElementRead, kind: ElementKind) -> Self {
        let selector = BinSelector::for_kind(source, kind);
        Self::new(
            (0..source.element_count(kind))
                .map(|position| source.element(kind, position))
                .filter(|element| selector.is_selected(source, kind, *element)),
        )
    }

    pub fn accepts(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

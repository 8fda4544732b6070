use histobin_common::element::{ElementId, ElementKind};
use histobin_common::source::ElementRead;

/// Maps a binned element to the element(s) whose attribute feeds its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representative {
    Identity,
    SourceVertex,
    DestinationVertex,
    /// Every transaction under the element
    TransactionAggregate,
    /// Every neighbour of a vertex
    NeighbourAggregate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representatives {
    /// The element has no representative and is left out of the histogram
    None,
    One(ElementId),
    Many(Vec<ElementId>),
}

impl Representatives {
    pub fn is_none(&self) -> bool {
        matches!(self, Representatives::None)
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        let (one, many): (Option<ElementId>, &[ElementId]) = match self {
            Representatives::None => (None, &[] as &[ElementId]),
            Representatives::One(element) => (Some(*element), &[] as &[ElementId]),
            Representatives::Many(elements) => (None, elements.as_slice()),
        };
        one.into_iter().chain(many.iter().copied())
    }
}

impl Representative {
    pub fn resolve(&self, source: &dyn ElementRead, kind: ElementKind, element: ElementId) -> Representatives {
        match self {
            Representative::Identity => Representatives::One(element),
            Representative::SourceVertex => source
                .endpoints(kind, element)
                .map_or(Representatives::None, |(src, _)| Representatives::One(src)),
            Representative::DestinationVertex => source
                .endpoints(kind, element)
                .map_or(Representatives::None, |(_, dst)| Representatives::One(dst)),
            Representative::TransactionAggregate => {
                Representatives::Many(source.transactions(kind, element))
            }
            Representative::NeighbourAggregate => match kind {
                ElementKind::Vertex => Representatives::Many(source.neighbours(element)),
                _ => Representatives::None,
            },
        }
    }
}

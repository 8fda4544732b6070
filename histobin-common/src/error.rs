use crate::element::{ElementId, ElementKind};
use crate::value::ValueType;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown vertex: {0}")]
    UnknownVertex(ElementId),

    #[error("Unknown {kind}: {element}")]
    UnknownElement { kind: ElementKind, element: ElementId },

    #[error("Value at position {position} of attribute `{attribute}` is not a valid {value_type}")]
    InvalidValue {
        attribute: String,
        position: usize,
        value_type: ValueType,
    },

    #[error("JSON error: `{0}`")]
    JsonError(#[from] serde_json::Error),
}

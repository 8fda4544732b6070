use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

/// Identifier of an element within an element store.
pub type ElementId = usize;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    /// A graph node.
    #[default]
    Vertex,
    /// Every transaction between a pair of vertices, in either direction.
    Link,
    /// Every transaction between a pair of vertices, in one direction.
    Edge,
    /// A single relation between two vertices.
    Transaction,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Vertex => "Node",
            ElementKind::Link => "Link",
            ElementKind::Edge => "Edge",
            ElementKind::Transaction => "Transaction",
        }
    }

    /// Whether an element of this kind stands for a group of transactions
    pub fn is_merged(&self) -> bool {
        matches!(self, ElementKind::Link | ElementKind::Edge)
    }
}

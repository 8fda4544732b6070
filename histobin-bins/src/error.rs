use histobin_common::element::ElementKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BinError {
    #[error("Attribute type `{attribute_type}` does not apply to {kind} elements")]
    NotApplicable {
        attribute_type: String,
        kind: ElementKind,
    },

    #[error("No bin creator for attribute `{0}`")]
    UnknownAttribute(String),

    #[error("Invalid formatter: {0}")]
    InvalidFormatter(String),
}

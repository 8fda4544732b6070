pub mod element;
pub mod error;
pub mod graph;
pub mod source;
pub mod value;

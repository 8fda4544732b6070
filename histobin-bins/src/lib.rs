pub mod accumulator;
pub mod attribute;
pub mod bin;
pub mod collection;
pub mod comparator;
pub mod creator;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod representative;
pub mod selector;

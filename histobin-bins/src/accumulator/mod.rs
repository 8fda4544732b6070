pub mod aggregate;
pub mod datetime;
pub mod property;

use crate::bin::Bin;
use chrono_tz::Tz;
use histobin_common::element::ElementId;
use histobin_common::source::{AttributeId, ElementRead};
use histobin_common::value::Value;
use std::fmt::Debug;

pub use aggregate::{AggregateAccumulator, Aggregation};
pub use datetime::DateTimeAccumulator;
pub use property::{GraphProperty, GraphPropertyAccumulator};

/// Derives a bin key from the representatives of one element.
///
/// A registered accumulator acts as a template: `create` makes a working
/// copy, `init` runs once before a construction pass, and each element is
/// folded in with `clear` followed by one `set_key` per representative.
/// Nulls never contribute; until a concrete value has been folded in the
/// accumulator reports `is_only_null`.
pub trait BinAccumulator: Debug + Send + Sync {
    /// A fresh accumulator of the same kind, keeping any state set up by `init`
    fn create(&self) -> Box<dyn BinAccumulator>;

    fn init(&mut self, _source: &dyn ElementRead, _attribute: Option<AttributeId>) {}

    fn clear(&mut self);

    fn set_key(&mut self, source: &dyn ElementRead, attribute: Option<AttributeId>, element: ElementId);

    fn is_only_null(&self) -> bool;

    /// The zone date-time keys are presented in, once resolved by `init`
    fn time_zone(&self) -> Option<Tz> {
        None
    }

    /// The finalized key, used to look up existing bins
    fn key(&self) -> Value;

    fn label(&self) -> Option<String> {
        let key = self.key();
        (!key.is_null()).then(|| key.to_string())
    }

    fn prepare_for_presentation(&self) -> Bin {
        Bin::new(self.key(), self.label())
    }
}

/// Keys an element by one attribute value.
#[derive(Debug, Clone, Default)]
pub struct AttributeAccumulator {
    value: Value,
}

impl BinAccumulator for AttributeAccumulator {
    fn create(&self) -> Box<dyn BinAccumulator> {
        Box::new(Self::default())
    }

    fn clear(&mut self) {
        self.value = Value::Null;
    }

    fn set_key(&mut self, source: &dyn ElementRead, attribute: Option<AttributeId>, element: ElementId) {
        let Some(attribute) = attribute else {
            return;
        };
        let value = source.value(attribute, element);
        if !value.is_null() {
            self.value = value;
        }
    }

    fn is_only_null(&self) -> bool {
        self.value.is_null()
    }

    fn key(&self) -> Value {
        self.value.clone()
    }
}

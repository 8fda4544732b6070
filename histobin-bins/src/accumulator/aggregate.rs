use super::BinAccumulator;
use histobin_common::element::ElementId;
use histobin_common::source::{AttributeId, ElementRead};
use histobin_common::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use strum::{Display, EnumIter, EnumString, VariantNames};

#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Average,
    Maximum,
    Minimum,
    UniqueValues,
}

impl Aggregation {
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Sum => "Sum",
            Aggregation::Average => "Average",
            Aggregation::Maximum => "Maximum",
            Aggregation::Minimum => "Minimum",
            Aggregation::UniqueValues => "Unique Values",
        }
    }

    /// Whether attributes of this type can be aggregated this way
    pub fn supports(&self, value_type: ValueType) -> bool {
        match self {
            Aggregation::Sum | Aggregation::Average => {
                matches!(value_type, ValueType::Integer | ValueType::Float)
            }
            Aggregation::Maximum | Aggregation::Minimum => matches!(
                value_type,
                ValueType::Integer | ValueType::Float | ValueType::DateTime
            ),
            Aggregation::UniqueValues => true,
        }
    }
}

/// Folds the attribute values of many representatives into one key.
#[derive(Debug, Clone)]
pub struct AggregateAccumulator {
    aggregation: Aggregation,
    count: usize,
    int_sum: i64,
    float_sum: f64,
    has_float: bool,
    extreme: Option<Value>,
    distinct: HashSet<Value>,
}

impl AggregateAccumulator {
    pub fn new(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            count: 0,
            int_sum: 0,
            float_sum: 0.0,
            has_float: false,
            extreme: None,
            distinct: HashSet::new(),
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    fn fold(&mut self, value: Value) {
        match self.aggregation {
            Aggregation::Sum | Aggregation::Average => match value {
                Value::Int(v) => self.int_sum = self.int_sum.saturating_add(v),
                Value::Float(v) => {
                    self.float_sum += v.0;
                    self.has_float = true;
                }
                _ => return,
            },
            Aggregation::Maximum | Aggregation::Minimum => {
                let wanted = match self.aggregation {
                    Aggregation::Maximum => Ordering::Greater,
                    _ => Ordering::Less,
                };
                let replace = match &self.extreme {
                    Some(current) => value.compare(current) == wanted,
                    None => true,
                };
                if replace {
                    self.extreme = Some(value);
                }
            }
            Aggregation::UniqueValues => {
                self.distinct.insert(value);
            }
        }
        self.count += 1;
    }

    fn total(&self) -> f64 {
        self.int_sum as f64 + self.float_sum
    }
}

impl BinAccumulator for AggregateAccumulator {
    fn create(&self) -> Box<dyn BinAccumulator> {
        Box::new(Self::new(self.aggregation))
    }

    fn clear(&mut self) {
        *self = Self::new(self.aggregation);
    }

    fn set_key(&mut self, source: &dyn ElementRead, attribute: Option<AttributeId>, element: ElementId) {
        let Some(attribute) = attribute else {
            return;
        };
        let value = source.value(attribute, element);
        if !value.is_null() {
            self.fold(value);
        }
    }

    fn is_only_null(&self) -> bool {
        self.count == 0
    }

    fn key(&self) -> Value {
        if self.count == 0 {
            return Value::Null;
        }
        match self.aggregation {
            Aggregation::Sum if self.has_float => Value::float(self.total()),
            Aggregation::Sum => Value::Int(self.int_sum),
            Aggregation::Average => Value::float(self.total() / self.count as f64),
            Aggregation::Maximum | Aggregation::Minimum => self.extreme.clone().unwrap_or_default(),
            Aggregation::UniqueValues => Value::Int(self.distinct.len() as i64),
        }
    }
}

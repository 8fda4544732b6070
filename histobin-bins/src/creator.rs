use crate::accumulator::{
    AggregateAccumulator, Aggregation, AttributeAccumulator, BinAccumulator, DateTimeAccumulator,
};
use crate::attribute::AttributeType;
use crate::representative::Representative;
use histobin_common::value::ValueType;
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// Pairs a bin accumulator template with the representative that feeds it.
#[derive(Debug, Clone)]
pub struct BinCreator {
    pub attribute_required: bool,
    pub representative: Representative,
    pub template: Arc<dyn BinAccumulator>,
}

impl BinCreator {
    pub fn new(representative: Representative, template: Arc<dyn BinAccumulator>) -> Self {
        Self {
            attribute_required: true,
            representative,
            template,
        }
    }

    pub fn without_attribute(representative: Representative, template: Arc<dyn BinAccumulator>) -> Self {
        Self {
            attribute_required: false,
            representative,
            template,
        }
    }
}

/// Bin creators keyed by attribute type and attribute value type.
#[derive(Debug, Clone, Default)]
pub struct BinCreatorRegistry {
    creators: HashMap<(AttributeType, ValueType), BinCreator>,
}

impl BinCreatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for value_type in ValueType::iter() {
            let template = value_template(value_type);
            for (attribute_type, representative) in [
                (AttributeType::Attribute, Representative::Identity),
                (AttributeType::SourceVertexAttribute, Representative::SourceVertex),
                (AttributeType::DestinationVertexAttribute, Representative::DestinationVertex),
            ] {
                registry.register(
                    attribute_type,
                    value_type,
                    BinCreator::new(representative, template.clone()),
                );
            }

            for aggregation in Aggregation::iter().filter(|a| a.supports(value_type)) {
                let template: Arc<dyn BinAccumulator> = Arc::new(AggregateAccumulator::new(aggregation));
                registry.register(
                    AttributeType::TransactionAggregate(aggregation),
                    value_type,
                    BinCreator::new(Representative::TransactionAggregate, template.clone()),
                );
                registry.register(
                    AttributeType::NeighbourAggregate(aggregation),
                    value_type,
                    BinCreator::new(Representative::NeighbourAggregate, template),
                );
            }
        }
        registry
    }

    pub fn register(&mut self, attribute_type: AttributeType, value_type: ValueType, creator: BinCreator) {
        self.creators.insert((attribute_type, value_type), creator);
    }

    pub fn get(&self, attribute_type: AttributeType, value_type: ValueType) -> Option<&BinCreator> {
        self.creators.get(&(attribute_type, value_type))
    }
}

fn value_template(value_type: ValueType) -> Arc<dyn BinAccumulator> {
    match value_type {
        ValueType::DateTime => Arc::new(DateTimeAccumulator::default()),
        _ => Arc::new(AttributeAccumulator::default()),
    }
}

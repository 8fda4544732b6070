use super::BinAccumulator;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use histobin_common::element::ElementId;
use histobin_common::source::{AttributeId, ElementRead};
use histobin_common::value::Value;

const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %Z";

/// Keys an element by a date-time attribute, labelled in the source's time zone.
#[derive(Debug, Clone, Default)]
pub struct DateTimeAccumulator {
    time_zone: Option<Tz>,
    value: Option<DateTime<Utc>>,
}

impl DateTimeAccumulator {
    pub fn with_time_zone(time_zone: Tz) -> Self {
        Self {
            time_zone: Some(time_zone),
            value: None,
        }
    }
}

impl BinAccumulator for DateTimeAccumulator {
    fn create(&self) -> Box<dyn BinAccumulator> {
        Box::new(Self {
            time_zone: self.time_zone,
            value: None,
        })
    }

    fn init(&mut self, source: &dyn ElementRead, _attribute: Option<AttributeId>) {
        let Some(name) = source.time_zone() else {
            return;
        };
        match name.parse::<Tz>() {
            Ok(tz) => self.time_zone = Some(tz),
            Err(_) => tracing::warn!(time_zone = %name, "Unknown time zone, labelling date-times in UTC"),
        }
    }

    fn clear(&mut self) {
        self.value = None;
    }

    fn set_key(&mut self, source: &dyn ElementRead, attribute: Option<AttributeId>, element: ElementId) {
        if let Some(Value::Timestamp(ts)) = attribute.map(|a| source.value(a, element)) {
            self.value = Some(ts);
        }
    }

    fn is_only_null(&self) -> bool {
        self.value.is_none()
    }

    fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    fn key(&self) -> Value {
        self.value.map(Value::Timestamp).unwrap_or_default()
    }

    fn label(&self) -> Option<String> {
        let ts = self.value?;
        Some(match self.time_zone {
            Some(tz) => ts.with_timezone(&tz).format(LABEL_FORMAT).to_string(),
            None => ts.format(LABEL_FORMAT).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histobin_common::element::ElementKind;
    use histobin_common::graph::MemoryGraph;
    use histobin_common::source::ElementWrite;
    use histobin_common::value::ValueType;

    fn graph_with_time(time_zone: Option<&str>) -> (MemoryGraph, AttributeId) {
        let mut graph = MemoryGraph::new();
        graph.add_vertex();
        let when = graph.add_attribute(ElementKind::Vertex, "when", ValueType::DateTime);
        let ts = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        graph.set_value(when, 0, Value::Timestamp(ts));
        graph.set_time_zone(time_zone.map(String::from));
        (graph, when)
    }

    #[test]
    fn test_label_in_source_time_zone() {
        let (graph, when) = graph_with_time(Some("Australia/Brisbane"));
        let mut acc = DateTimeAccumulator::default().create();
        acc.init(&graph, Some(when));
        acc.set_key(&graph, Some(when), 0);
        assert_eq!(acc.label().as_deref(), Some("2023-11-15 08:13:20.000 AEST"));
    }

    #[test]
    fn test_unknown_time_zone_falls_back_to_utc() {
        let (graph, when) = graph_with_time(Some("Nowhere/Special"));
        let mut acc = DateTimeAccumulator::default().create();
        acc.init(&graph, Some(when));
        acc.set_key(&graph, Some(when), 0);
        assert_eq!(acc.label().as_deref(), Some("2023-11-14 22:13:20.000 UTC"));
    }

    #[test]
    fn test_create_keeps_time_zone() {
        let template = DateTimeAccumulator::with_time_zone(Tz::UTC);
        let (graph, when) = graph_with_time(None);
        let mut acc = template.create();
        acc.set_key(&graph, Some(when), 0);
        assert!(!acc.is_only_null());
        assert!(acc.label().is_some());
    }
}

use crate::accumulator::BinAccumulator;
use crate::error::BinError;
use chrono::{Datelike, Month, Timelike, Weekday};
use chrono_tz::Tz;
use histobin_common::element::ElementId;
use histobin_common::source::{AttributeId, ElementRead};
use histobin_common::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumString, VariantNames};

/// Wraps a bin accumulator template so that its keys are regrouped.
pub trait BinFormatter: Debug + Send + Sync {
    fn wrap(&self, template: Box<dyn BinAccumulator>) -> Box<dyn BinAccumulator>;
}

/// Maps a finalized key onto the key of a coarser bin.
pub trait KeyFormat: Debug + Clone + Send + Sync + 'static {
    /// Receives the time zone the wrapped accumulator resolved in `init`
    fn init(&mut self, _time_zone: Option<Tz>) {}

    fn format(&self, key: Value) -> Value;

    fn label(&self, key: &Value) -> String {
        key.to_string()
    }
}

impl<F: KeyFormat> BinFormatter for F {
    fn wrap(&self, template: Box<dyn BinAccumulator>) -> Box<dyn BinAccumulator> {
        Box::new(FormattedAccumulator {
            inner: template,
            format: self.clone(),
        })
    }
}

#[derive(Debug)]
struct FormattedAccumulator<F: KeyFormat> {
    inner: Box<dyn BinAccumulator>,
    format: F,
}

impl<F: KeyFormat> BinAccumulator for FormattedAccumulator<F> {
    fn create(&self) -> Box<dyn BinAccumulator> {
        Box::new(Self {
            inner: self.inner.create(),
            format: self.format.clone(),
        })
    }

    fn init(&mut self, source: &dyn ElementRead, attribute: Option<AttributeId>) {
        self.inner.init(source, attribute);
        self.format.init(self.inner.time_zone());
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn set_key(&mut self, source: &dyn ElementRead, attribute: Option<AttributeId>, element: ElementId) {
        self.inner.set_key(source, attribute, element);
    }

    fn is_only_null(&self) -> bool {
        self.inner.is_only_null()
    }

    fn time_zone(&self) -> Option<Tz> {
        self.inner.time_zone()
    }

    fn key(&self) -> Value {
        self.format.format(self.inner.key())
    }

    fn label(&self) -> Option<String> {
        let key = self.key();
        (!key.is_null()).then(|| self.format.label(&key))
    }
}

/// Groups strings by their first `length` characters.
#[derive(Debug, Clone, PartialEq)]
pub struct StartsWith {
    pub length: usize,
}

impl KeyFormat for StartsWith {
    fn format(&self, key: Value) -> Value {
        match key {
            Value::String(s) => Value::String(s.chars().take(self.length).collect()),
            Value::Object(s) => Value::Object(s.chars().take(self.length).collect()),
            other => other,
        }
    }
}

/// Groups numbers into half-open intervals of a fixed width.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberInterval {
    pub width: f64,
}

impl KeyFormat for NumberInterval {
    fn format(&self, key: Value) -> Value {
        match key.as_f64() {
            Some(v) => Value::float((v / self.width).floor() * self.width),
            None => key,
        }
    }

    fn label(&self, key: &Value) -> String {
        match key.as_f64() {
            Some(lo) => format!("[{}, {})", lo, lo + self.width),
            None => key.to_string(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatetimePart {
    Year,
    Month,
    DayOfMonth,
    DayOfWeek,
    Hour,
}

/// Groups date-times by one calendar component, read in the time zone the
/// date-times are labelled in (UTC when there is none).
#[derive(Debug, Clone, PartialEq)]
pub struct DatetimePartFormat {
    pub part: DatetimePart,
    time_zone: Option<Tz>,
}

impl DatetimePartFormat {
    pub fn new(part: DatetimePart) -> Self {
        Self {
            part,
            time_zone: None,
        }
    }
}

impl KeyFormat for DatetimePartFormat {
    fn init(&mut self, time_zone: Option<Tz>) {
        self.time_zone = time_zone;
    }

    fn format(&self, key: Value) -> Value {
        let Value::Timestamp(ts) = key else {
            return key;
        };
        let part = match self.time_zone {
            Some(tz) => part_of(self.part, &ts.with_timezone(&tz)),
            None => part_of(self.part, &ts),
        };
        Value::Int(part)
    }

    fn label(&self, key: &Value) -> String {
        let Value::Int(n) = key else {
            return key.to_string();
        };
        let name = match self.part {
            DatetimePart::Month => u8::try_from(*n)
                .ok()
                .and_then(|n| Month::try_from(n).ok())
                .map(|m| m.name().to_string()),
            DatetimePart::DayOfWeek => weekday_from_monday(*n).map(|d| weekday_name(d).to_string()),
            _ => None,
        };
        name.unwrap_or_else(|| n.to_string())
    }
}

fn part_of<T: Datelike + Timelike>(part: DatetimePart, t: &T) -> i64 {
    match part {
        DatetimePart::Year => t.year() as i64,
        DatetimePart::Month => t.month() as i64,
        DatetimePart::DayOfMonth => t.day() as i64,
        DatetimePart::DayOfWeek => t.weekday().number_from_monday() as i64,
        DatetimePart::Hour => t.hour() as i64,
    }
}

fn weekday_from_monday(n: i64) -> Option<Weekday> {
    let index = u8::try_from(n.checked_sub(1)?).ok()?;
    Weekday::try_from(index).ok()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serializable choice of bin formatter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormatterConfig {
    #[default]
    Default,
    StartsWith {
        length: usize,
    },
    NumberInterval {
        width: f64,
    },
    DatetimePart {
        part: DatetimePart,
    },
}

impl FormatterConfig {
    pub fn label(&self) -> &'static str {
        match self {
            FormatterConfig::Default => "Default",
            FormatterConfig::StartsWith { .. } => "Starts With",
            FormatterConfig::NumberInterval { .. } => "Number Interval",
            FormatterConfig::DatetimePart { .. } => "Date-Time Part",
        }
    }

    pub fn applies_to(&self, value_type: ValueType) -> bool {
        match self {
            FormatterConfig::Default => true,
            FormatterConfig::StartsWith { .. } => {
                matches!(value_type, ValueType::String | ValueType::Object)
            }
            FormatterConfig::NumberInterval { .. } => {
                matches!(value_type, ValueType::Integer | ValueType::Float)
            }
            FormatterConfig::DatetimePart { .. } => value_type == ValueType::DateTime,
        }
    }

    /// The formatter to wrap bin templates with, `None` for the default
    pub fn formatter(&self) -> Result<Option<Box<dyn BinFormatter>>, BinError> {
        match self {
            FormatterConfig::Default => Ok(None),
            FormatterConfig::StartsWith { length } => {
                if *length == 0 {
                    return Err(BinError::InvalidFormatter(
                        "starts_with length must be at least 1".to_string(),
                    ));
                }
                Ok(Some(Box::new(StartsWith { length: *length })))
            }
            FormatterConfig::NumberInterval { width } => {
                if !(width.is_finite() && *width > 0.0) {
                    return Err(BinError::InvalidFormatter(format!(
                        "number_interval width must be positive, got {width}"
                    )));
                }
                Ok(Some(Box::new(NumberInterval { width: *width })))
            }
            FormatterConfig::DatetimePart { part } => {
                Ok(Some(Box::new(DatetimePartFormat::new(*part))))
            }
        }
    }
}

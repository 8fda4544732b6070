use histobin_common::value::Value;

/// Label shown for the bin that collects elements without a value
pub const NO_VALUE: &str = "<No Value>";

/// A committed histogram bin.
///
/// `element_count` and the element chain are fixed when the collection is
/// built. Selection counters and activation flags are mutated by the
/// selection modes, with `saved_*` holding the snapshot a drag rolls back to.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub(crate) key: Value,
    pub(crate) label: Option<String>,
    pub(crate) element_count: usize,
    pub(crate) first_element: Option<usize>,
    pub selected_count: usize,
    pub saved_selected_count: usize,
    pub activated: bool,
    pub saved_activated: bool,
}

impl Bin {
    pub fn new(key: Value, label: Option<String>) -> Self {
        Self {
            key,
            label,
            element_count: 0,
            first_element: None,
            selected_count: 0,
            saved_selected_count: 0,
            activated: false,
            saved_activated: false,
        }
    }

    pub(crate) fn null() -> Self {
        Self::new(Value::Null, None)
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(NO_VALUE)
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Position of the first element in this bin's chain
    pub fn first_element(&self) -> Option<usize> {
        self.first_element
    }

    pub fn is_null(&self) -> bool {
        self.key.is_null()
    }

    pub fn is_fully_selected(&self) -> bool {
        self.selected_count == self.element_count
    }
}

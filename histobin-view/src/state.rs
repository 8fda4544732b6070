use crate::error::ViewError;
use crate::mode::BinSelectionMode;
use histobin_bins::attribute::AttributeType;
use histobin_bins::collection::BinCollection;
use histobin_bins::comparator::BinComparator;
use histobin_bins::creator::BinCreatorRegistry;
use histobin_bins::error::BinError;
use histobin_bins::filter::ElementFilter;
use histobin_bins::formatter::FormatterConfig;
use histobin_common::element::ElementKind;
use histobin_common::source::ElementRead;
use serde::{Deserialize, Serialize};

/// The persisted configuration of a histogram view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramState {
    pub element_kind: ElementKind,
    pub attribute_type: AttributeType,
    pub attribute: Option<String>,
    pub comparator: BinComparator,
    pub selection_mode: BinSelectionMode,
    pub formatter: FormatterConfig,
}

impl HistogramState {
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ViewError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Repairs choices that the graph can no longer honour.
    ///
    /// An attribute type that does not apply to the element kind falls back
    /// to `Attribute`. An attribute the source no longer offers is cleared.
    /// A formatter that does not fit the attribute's value type falls back to
    /// the default.
    pub fn validate(&self, source: &dyn ElementRead, registry: &BinCreatorRegistry) -> Self {
        let mut state = self.clone();
        if !state.attribute_type.applies_to(state.element_kind) {
            tracing::debug!(
                attribute_type = %state.attribute_type,
                kind = %state.element_kind,
                "Attribute type does not apply, using attribute"
            );
            state.attribute_type = AttributeType::Attribute;
        }

        let creators = state
            .attribute_type
            .bin_creators(source, state.element_kind, registry);
        let known = state
            .attribute
            .as_ref()
            .is_some_and(|name| creators.contains_key(name));
        if !known && state.attribute.is_some() {
            tracing::debug!(attribute = ?state.attribute, "Attribute not found, clearing");
            state.attribute = None;
        }

        let value_type = state.attribute.as_ref().and_then(|name| {
            let kind = state.attribute_type.attribute_kind(state.element_kind)?;
            let id = source.attribute(kind, name)?;
            source.attribute_info(id).map(|info| info.value_type)
        });
        let formatter_fits = match value_type {
            Some(value_type) => state.formatter.applies_to(value_type),
            None => state.formatter == FormatterConfig::Default,
        };
        if !formatter_fits {
            state.formatter = FormatterConfig::Default;
        }
        state
    }

    /// Builds and sorts the bins this state describes.
    ///
    /// Returns `None` when no attribute is chosen.
    pub fn build_collection(
        &self,
        source: &dyn ElementRead,
        registry: &BinCreatorRegistry,
        filter: Option<&ElementFilter>,
    ) -> Result<Option<BinCollection>, ViewError> {
        if !self.attribute_type.applies_to(self.element_kind) {
            return Err(BinError::NotApplicable {
                attribute_type: self.attribute_type.to_string(),
                kind: self.element_kind,
            }
            .into());
        }
        let Some(name) = &self.attribute else {
            return Ok(None);
        };
        let creators = self
            .attribute_type
            .bin_creators(source, self.element_kind, registry);
        let creator = creators
            .get(name)
            .ok_or_else(|| BinError::UnknownAttribute(name.clone()))?;
        let attribute = self
            .attribute_type
            .attribute_kind(self.element_kind)
            .and_then(|kind| source.attribute(kind, name));
        let formatter = self.formatter.formatter()?;

        let mut collection = BinCollection::build(
            source,
            self.element_kind,
            attribute,
            creator,
            filter,
            formatter.as_deref(),
        );
        collection.sort(self.comparator);
        Ok(Some(collection))
    }
}

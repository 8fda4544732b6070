use crate::commit::{CommandQueue, SelectionCommand, SelectionCommitter};
use crate::error::ViewError;
use crate::interaction::BinInteraction;
use crate::mode::{BinSelectionMode, Modifiers};
use crate::state::HistogramState;
use histobin_bins::attribute::AttributeType;
use histobin_bins::collection::BinCollection;
use histobin_bins::comparator::BinComparator;
use histobin_bins::creator::BinCreatorRegistry;
use histobin_bins::filter::ElementFilter;
use histobin_bins::formatter::FormatterConfig;
use histobin_common::element::ElementKind;
use histobin_common::source::{ElementRead, ElementWrite};

/// A histogram over one graph, driven by pointer gestures.
///
/// Gestures update the bins immediately. Changes to the graph are queued
/// and written by `commit`, which needs a write handle.
#[derive(Debug)]
pub struct HistogramView {
    state: HistogramState,
    registry: BinCreatorRegistry,
    collection: Option<BinCollection>,
    interaction: BinInteraction,
    pending: CommandQueue,
    filter: Option<ElementFilter>,
}

impl HistogramView {
    pub fn new(
        state: HistogramState,
        registry: BinCreatorRegistry,
        source: &dyn ElementRead,
    ) -> Result<Self, ViewError> {
        let mut view = Self {
            state: state.validate(source, &registry),
            registry,
            collection: None,
            interaction: BinInteraction::new(),
            pending: CommandQueue::new(),
            filter: None,
        };
        view.rebuild(source)?;
        Ok(view)
    }

    pub fn state(&self) -> &HistogramState {
        &self.state
    }

    pub fn collection(&self) -> Option<&BinCollection> {
        self.collection.as_ref()
    }

    pub fn interaction(&self) -> &BinInteraction {
        &self.interaction
    }

    pub fn pending(&self) -> &[SelectionCommand] {
        self.pending.commands()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Rebuilds the bins from the graph, discarding uncommitted gestures
    #[tracing::instrument(skip_all, fields(kind = %self.state.element_kind))]
    pub fn rebuild(&mut self, source: &dyn ElementRead) -> Result<(), ViewError> {
        self.interaction.reset();
        self.pending.drain();
        self.collection = self
            .state
            .build_collection(source, &self.registry, self.filter.as_ref())?;
        tracing::info!(
            attribute = ?self.state.attribute,
            bins = self.collection.as_ref().map_or(0, |c| c.len()),
            "Rebuilt histogram"
        );
        Ok(())
    }

    pub fn set_element_kind(
        &mut self,
        source: &dyn ElementRead,
        element_kind: ElementKind,
    ) -> Result<(), ViewError> {
        self.state.element_kind = element_kind;
        self.filter = None;
        self.revalidate(source)
    }

    pub fn set_attribute(
        &mut self,
        source: &dyn ElementRead,
        attribute_type: AttributeType,
        attribute: Option<String>,
    ) -> Result<(), ViewError> {
        self.state.attribute_type = attribute_type;
        self.state.attribute = attribute;
        self.revalidate(source)
    }

    pub fn set_formatter(
        &mut self,
        source: &dyn ElementRead,
        formatter: FormatterConfig,
    ) -> Result<(), ViewError> {
        self.state.formatter = formatter;
        self.revalidate(source)
    }

    pub fn set_comparator(&mut self, comparator: BinComparator) {
        self.state.comparator = comparator;
        self.sort_bins();
    }

    /// Switches mode, dropping any staged activation
    pub fn set_selection_mode(&mut self, mode: BinSelectionMode) {
        self.state.selection_mode = mode;
        self.interaction.reset();
        self.clear_activation();
    }

    /// Restricts the histogram to the currently selected elements
    pub fn filter_on_selection(&mut self, source: &dyn ElementRead) -> Result<(), ViewError> {
        self.filter = Some(ElementFilter::from_selection(
            source,
            self.state.element_kind,
        ));
        self.rebuild(source)
    }

    pub fn clear_filter(&mut self, source: &dyn ElementRead) -> Result<(), ViewError> {
        self.filter = None;
        self.rebuild(source)
    }

    pub fn mouse_pressed(&mut self, modifiers: Modifiers, bar: isize) {
        if let Some(collection) = &mut self.collection {
            self.interaction.mouse_pressed(
                self.state.selection_mode,
                modifiers,
                collection.bins_mut(),
                bar,
            );
        }
    }

    pub fn mouse_dragged(&mut self, bar: isize) {
        if let Some(collection) = &mut self.collection {
            self.interaction
                .mouse_dragged(self.state.selection_mode, collection.bins_mut(), bar);
        }
    }

    pub fn mouse_released(&mut self) {
        if let Some(collection) = &self.collection {
            self.interaction.mouse_released(
                self.state.selection_mode,
                collection.bins(),
                &mut self.pending,
            );
        }
    }

    /// Commits the activated bins of a staged selection mode
    pub fn select(&mut self) {
        self.state.selection_mode.select(&mut self.pending);
    }

    pub fn invert_bins(&mut self, first: usize, last: usize) {
        self.pending.push(SelectionCommand::Invert { first, last });
    }

    pub fn select_bin_indices(&mut self, indices: &[usize]) {
        self.pending.select_bin_indices(indices);
    }

    /// Writes queued selection changes to the graph
    pub fn commit(&mut self, graph: &mut dyn ElementWrite) {
        let commands = self.pending.drain();
        let Some(collection) = &mut self.collection else {
            return;
        };
        if commands.is_empty() {
            return;
        }
        let mut staged = false;
        for command in &commands {
            staged |= matches!(
                command,
                SelectionCommand::FilterSelection | SelectionCommand::ExpandSelection
            );
            command.apply(collection, graph);
        }
        if staged {
            self.clear_activation();
        }
        if self.state.comparator.uses_selection() {
            self.sort_bins();
        }
    }

    /// Recounts selections changed outside the view
    pub fn update_selection(&mut self, source: &dyn ElementRead) {
        if let Some(collection) = &mut self.collection {
            collection.update_selection(source);
        }
        if self.state.comparator.uses_selection() {
            self.sort_bins();
        }
    }

    pub fn export(&self, include_counts: bool, selected_only: bool) -> String {
        self.collection
            .as_ref()
            .map(|c| c.to_text(include_counts, selected_only))
            .unwrap_or_default()
    }

    fn revalidate(&mut self, source: &dyn ElementRead) -> Result<(), ViewError> {
        self.state = self.state.validate(source, &self.registry);
        self.rebuild(source)
    }

    /// Reorders the bins, carrying queued commands over to the new order
    fn sort_bins(&mut self) {
        let Some(collection) = &mut self.collection else {
            return;
        };
        let moved = collection.sort(self.state.comparator);
        self.interaction.reset();
        for command in self.pending.drain() {
            for remapped in command.remap(&moved) {
                self.pending.push(remapped);
            }
        }
    }

    fn clear_activation(&mut self) {
        if let Some(collection) = &mut self.collection {
            for bin in collection.bins_mut() {
                bin.activated = false;
                bin.saved_activated = false;
            }
        }
    }
}

use histobin_bins::collection::BinCollection;
use histobin_common::source::ElementWrite;

/// Receives the selection changes produced by an interaction.
///
/// Bin indices refer to the collection's current (sorted) order.
pub trait SelectionCommitter {
    fn select_only_bins(&mut self, first: usize, last: usize);

    fn select_bins(&mut self, first: usize, last: usize, select: bool);

    fn complete_bins(&mut self, first: usize, last: usize);

    fn select_bin_indices(&mut self, indices: &[usize]);

    fn filter_selection(&mut self);

    fn expand_selection(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    SelectOnly { first: usize, last: usize },
    Select { first: usize, last: usize, select: bool },
    Invert { first: usize, last: usize },
    Complete { first: usize, last: usize },
    SelectIndices(Vec<usize>),
    FilterSelection,
    ExpandSelection,
}

impl SelectionCommand {
    /// Writes the command to the element store and updates the bin counters
    #[tracing::instrument(skip(collection, graph))]
    pub fn apply(&self, collection: &mut BinCollection, graph: &mut dyn ElementWrite) {
        match self {
            SelectionCommand::SelectOnly { first, last } => {
                collection.select_only_bins(graph, *first, *last)
            }
            SelectionCommand::Select { first, last, select } => {
                collection.select_bins(graph, *first, *last, *select)
            }
            SelectionCommand::Invert { first, last } => collection.invert_bins(graph, *first, *last),
            SelectionCommand::Complete { first, last } => {
                collection.complete_bins(graph, *first, *last)
            }
            SelectionCommand::SelectIndices(indices) => collection.select_bin_indices(graph, indices),
            SelectionCommand::FilterSelection => collection.filter_selection(graph),
            SelectionCommand::ExpandSelection => collection.expand_selection(graph),
        }
    }

    /// Re-addresses the command after the bins were reordered, where the bin
    /// previously at index `i` now sits at `moved[i]`.
    ///
    /// Ranges are no longer contiguous after a reorder, so they become one
    /// command per bin.
    pub fn remap(&self, moved: &[usize]) -> Vec<SelectionCommand> {
        let span = |first: usize, last: usize| -> Vec<usize> {
            if first > last {
                return Vec::new();
            }
            moved
                .iter()
                .copied()
                .skip(first)
                .take(last.saturating_sub(first).saturating_add(1))
                .collect()
        };
        match self {
            SelectionCommand::SelectOnly { first, last } => vec![
                SelectionCommand::Select {
                    first: 0,
                    last: moved.len().saturating_sub(1),
                    select: false,
                },
                SelectionCommand::SelectIndices(span(*first, *last)),
            ],
            SelectionCommand::Select { first, last, select } => span(*first, *last)
                .into_iter()
                .map(|i| SelectionCommand::Select {
                    first: i,
                    last: i,
                    select: *select,
                })
                .collect(),
            SelectionCommand::Invert { first, last } => span(*first, *last)
                .into_iter()
                .map(|i| SelectionCommand::Invert { first: i, last: i })
                .collect(),
            SelectionCommand::Complete { first, last } => span(*first, *last)
                .into_iter()
                .map(|i| SelectionCommand::Complete { first: i, last: i })
                .collect(),
            SelectionCommand::SelectIndices(indices) => vec![SelectionCommand::SelectIndices(
                indices.iter().filter_map(|i| moved.get(*i).copied()).collect(),
            )],
            SelectionCommand::FilterSelection | SelectionCommand::ExpandSelection => {
                vec![self.clone()]
            }
        }
    }
}

/// Collects commands for deferred application against a write handle.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: Vec<SelectionCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: SelectionCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[SelectionCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn drain(&mut self) -> Vec<SelectionCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl SelectionCommitter for CommandQueue {
    fn select_only_bins(&mut self, first: usize, last: usize) {
        self.push(SelectionCommand::SelectOnly { first, last });
    }

    fn select_bins(&mut self, first: usize, last: usize, select: bool) {
        self.push(SelectionCommand::Select { first, last, select });
    }

    fn complete_bins(&mut self, first: usize, last: usize) {
        self.push(SelectionCommand::Complete { first, last });
    }

    fn select_bin_indices(&mut self, indices: &[usize]) {
        self.push(SelectionCommand::SelectIndices(indices.to_vec()));
    }

    fn filter_selection(&mut self) {
        self.push(SelectionCommand::FilterSelection);
    }

    fn expand_selection(&mut self) {
        self.push(SelectionCommand::ExpandSelection);
    }
}

use crate::commit::SelectionCommitter;
use crate::range::clamp_range;
use histobin_bins::bin::Bin;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

/// Modifier keys held during a pointer interaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            control: false,
        }
    }

    pub fn control() -> Self {
        Self {
            shift: false,
            control: true,
        }
    }
}

/// How pointer gestures over the bars change the selection.
///
/// `FreeSelection` edits each bin's selected count during the gesture and
/// commits on release. The other modes only mark bins as activated; the
/// selection changes when `select` is called.
#[derive(
    Debug,
    Default,
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
pub enum BinSelectionMode {
    #[default]
    FreeSelection,
    WithinExistingSelection,
    AddToExistingSelection,
}

impl BinSelectionMode {
    pub fn label(&self) -> &'static str {
        match self {
            BinSelectionMode::FreeSelection => "Free Selection",
            BinSelectionMode::WithinExistingSelection => "Within Existing Selection",
            BinSelectionMode::AddToExistingSelection => "Add to Existing Selection",
        }
    }

    /// Whether gestures only mark bins until `select` is called
    pub fn is_staged(&self) -> bool {
        !matches!(self, BinSelectionMode::FreeSelection)
    }

    /// Starts a gesture over bars `drag_start..=drag_end`.
    ///
    /// Without modifiers every bin is reset first. Shift extends the current
    /// state and control toggles each bin in range. The resulting state of
    /// every bin is saved so that dragging can roll back.
    pub fn press(&self, modifiers: Modifiers, bins: &mut [Bin], drag_start: isize, drag_end: isize) {
        let Some((first, last)) = clamp_range(drag_start, drag_end, bins.len()) else {
            return;
        };
        let extend = modifiers.shift || modifiers.control;
        for bin in bins.iter_mut() {
            if self.is_staged() {
                if !extend {
                    bin.activated = false;
                }
                bin.saved_activated = bin.activated;
            } else {
                if !extend {
                    bin.selected_count = 0;
                }
                bin.saved_selected_count = bin.selected_count;
            }
        }
        self.apply(modifiers, &mut bins[first..=last]);
    }

    /// Moves the end of a gesture from `old_end` to `new_end`, restoring bins
    /// that leave the range to their state before the gesture
    pub fn drag(
        &self,
        modifiers: Modifiers,
        bins: &mut [Bin],
        drag_start: isize,
        old_end: isize,
        new_end: isize,
    ) {
        if let Some((first, last)) = clamp_range(drag_start, old_end, bins.len()) {
            for bin in &mut bins[first..=last] {
                if self.is_staged() {
                    bin.activated = bin.saved_activated;
                } else {
                    bin.selected_count = bin.saved_selected_count;
                }
            }
        }
        if let Some((first, last)) = clamp_range(drag_start, new_end, bins.len()) {
            self.apply(modifiers, &mut bins[first..=last]);
        }
    }

    /// Finishes a gesture, committing it in free selection mode
    pub fn release(
        &self,
        modifiers: Modifiers,
        bins: &[Bin],
        drag_start: isize,
        drag_end: isize,
        committer: &mut dyn SelectionCommitter,
    ) {
        if self.is_staged() {
            return;
        }
        let Some((first, last)) = clamp_range(drag_start, drag_end, bins.len()) else {
            return;
        };
        if modifiers.control {
            committer.complete_bins(first, last);
        } else if modifiers.shift {
            committer.select_bins(first, last, true);
        } else {
            committer.select_only_bins(first, last);
        }
    }

    /// Commits the activated bins of a staged mode
    pub fn select(&self, committer: &mut dyn SelectionCommitter) {
        match self {
            BinSelectionMode::FreeSelection => {}
            BinSelectionMode::WithinExistingSelection => committer.filter_selection(),
            BinSelectionMode::AddToExistingSelection => committer.expand_selection(),
        }
    }

    fn apply(&self, modifiers: Modifiers, bins: &mut [Bin]) {
        for bin in bins {
            if self.is_staged() {
                bin.activated = !(modifiers.control && bin.saved_activated);
            } else if modifiers.control && bin.saved_selected_count > 0 {
                bin.selected_count = 0;
            } else {
                bin.selected_count = bin.element_count();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{CommandQueue, SelectionCommand};
    use histobin_bins::attribute::AttributeType;
    use histobin_bins::collection::BinCollection;
    use histobin_bins::comparator::BinComparator;
    use histobin_bins::creator::BinCreatorRegistry;
    use histobin_common::element::ElementKind;
    use histobin_common::graph::MemoryGraph;
    use histobin_common::source::ElementWrite;
    use histobin_common::value::{Value, ValueType};
    use rstest::rstest;

    /// Bins keyed 0, 1, 2, ... holding `counts[i]` elements each
    fn bins_with_counts(counts: &[usize]) -> Vec<Bin> {
        let mut graph = MemoryGraph::new();
        let attr = graph.add_attribute(ElementKind::Vertex, "bucket", ValueType::Integer);
        for (bucket, count) in counts.iter().enumerate() {
            for _ in 0..*count {
                let vertex = graph.add_vertex();
                graph.set_value(attr, vertex, Value::Int(bucket as i64));
            }
        }
        let registry = BinCreatorRegistry::with_defaults();
        let creators = AttributeType::Attribute.bin_creators(&graph, ElementKind::Vertex, &registry);
        let mut collection =
            BinCollection::build(&graph, ElementKind::Vertex, Some(attr), &creators["bucket"], None, None);
        collection.sort(BinComparator::Key);
        collection.bins().to_vec()
    }

    fn selected(bins: &[Bin]) -> Vec<usize> {
        bins.iter().map(|b| b.selected_count).collect()
    }

    fn activated(bins: &[Bin]) -> Vec<bool> {
        bins.iter().map(|b| b.activated).collect()
    }

    #[test]
    fn test_free_click_selects_only_that_bin() {
        let mut bins = bins_with_counts(&[2, 4, 3, 1]);
        bins[3].selected_count = 1;
        let mode = BinSelectionMode::FreeSelection;
        mode.press(Modifiers::default(), &mut bins, 1, 1);
        assert_eq!(selected(&bins), vec![0, 4, 0, 0]);

        let mut queue = CommandQueue::new();
        mode.release(Modifiers::default(), &bins, 1, 1, &mut queue);
        assert_eq!(queue.drain(), vec![SelectionCommand::SelectOnly { first: 1, last: 1 }]);
    }

    #[test]
    fn test_drag_rolls_back_shrunk_range() {
        let mut bins = bins_with_counts(&[1, 1, 2, 2, 2, 2, 1]);
        bins[4].selected_count = 1;
        let mode = BinSelectionMode::FreeSelection;
        let before = selected(&bins);

        mode.press(Modifiers::shift(), &mut bins, 2, 2);
        mode.drag(Modifiers::shift(), &mut bins, 2, 2, 5);
        assert_eq!(selected(&bins), vec![0, 0, 2, 2, 2, 2, 0]);
        mode.drag(Modifiers::shift(), &mut bins, 2, 5, 3);
        assert_eq!(selected(&bins)[4..], before[4..]);
        assert_eq!(selected(&bins), vec![0, 0, 2, 2, 1, 0, 0]);
    }

    #[test]
    fn test_drag_across_start() {
        let mut bins = bins_with_counts(&[1, 1, 1, 1, 1]);
        let mode = BinSelectionMode::FreeSelection;
        mode.press(Modifiers::default(), &mut bins, 2, 2);
        mode.drag(Modifiers::default(), &mut bins, 2, 2, 4);
        mode.drag(Modifiers::default(), &mut bins, 2, 4, 0);
        assert_eq!(selected(&bins), vec![1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_control_toggles() {
        let mut bins = bins_with_counts(&[2, 2, 2]);
        bins[0].selected_count = 2;
        bins[1].selected_count = 1;
        let mode = BinSelectionMode::FreeSelection;
        mode.press(Modifiers::control(), &mut bins, 0, 2);
        assert_eq!(selected(&bins), vec![0, 0, 2]);

        let mut queue = CommandQueue::new();
        mode.release(Modifiers::control(), &bins, 0, 2, &mut queue);
        assert_eq!(queue.drain(), vec![SelectionCommand::Complete { first: 0, last: 2 }]);
    }

    #[test]
    fn test_shift_release_adds() {
        let bins = bins_with_counts(&[1, 1, 1]);
        let mut queue = CommandQueue::new();
        BinSelectionMode::FreeSelection.release(Modifiers::shift(), &bins, 2, 0, &mut queue);
        assert_eq!(
            queue.drain(),
            vec![SelectionCommand::Select { first: 0, last: 2, select: true }]
        );
    }

    #[rstest]
    #[case(BinSelectionMode::FreeSelection)]
    #[case(BinSelectionMode::WithinExistingSelection)]
    #[case(BinSelectionMode::AddToExistingSelection)]
    fn test_out_of_range_is_noop(#[case] mode: BinSelectionMode) {
        let mut bins = bins_with_counts(&[1, 2]);
        bins[0].selected_count = 1;
        bins[1].activated = true;
        let original = bins.clone();
        mode.press(Modifiers::default(), &mut bins, 5, 7);
        mode.drag(Modifiers::default(), &mut bins, 5, 7, 9);
        let mut queue = CommandQueue::new();
        mode.release(Modifiers::default(), &bins, 5, 9, &mut queue);
        assert_eq!(bins, original);
        assert!(queue.is_empty());

        let mut empty: Vec<Bin> = Vec::new();
        mode.press(Modifiers::default(), &mut empty, 0, 0);
        mode.release(Modifiers::default(), &empty, 0, 0, &mut queue);
        assert!(queue.is_empty());
    }

    #[rstest]
    #[case(BinSelectionMode::WithinExistingSelection, SelectionCommand::FilterSelection)]
    #[case(BinSelectionMode::AddToExistingSelection, SelectionCommand::ExpandSelection)]
    fn test_staged_modes_activate_then_select(#[case] mode: BinSelectionMode, #[case] expected: SelectionCommand) {
        let mut bins = bins_with_counts(&[1, 1, 1, 1]);
        bins[3].selected_count = 1;
        mode.press(Modifiers::default(), &mut bins, 0, 0);
        mode.drag(Modifiers::default(), &mut bins, 0, 0, 1);
        assert_eq!(activated(&bins), vec![true, true, false, false]);
        assert_eq!(selected(&bins), vec![0, 0, 0, 1]);

        let mut queue = CommandQueue::new();
        mode.release(Modifiers::default(), &bins, 0, 1, &mut queue);
        assert!(queue.is_empty());
        mode.select(&mut queue);
        assert_eq!(queue.drain(), vec![expected]);
    }

    #[test]
    fn test_staged_control_toggles_activation() {
        let mut bins = bins_with_counts(&[1, 1, 1]);
        let mode = BinSelectionMode::AddToExistingSelection;
        mode.press(Modifiers::default(), &mut bins, 0, 1);
        mode.press(Modifiers::control(), &mut bins, 1, 2);
        assert_eq!(activated(&bins), vec![true, false, true]);
        mode.drag(Modifiers::control(), &mut bins, 1, 2, 1);
        assert_eq!(activated(&bins), vec![true, false, false]);
    }

    #[test]
    fn test_free_select_is_noop() {
        let mut queue = CommandQueue::new();
        BinSelectionMode::FreeSelection.select(&mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_labels_and_parse() -> Result<(), strum::ParseError> {
        use std::str::FromStr;
        assert_eq!(
            BinSelectionMode::from_str("within_existing_selection")?,
            BinSelectionMode::WithinExistingSelection
        );
        assert_eq!(BinSelectionMode::AddToExistingSelection.label(), "Add to Existing Selection");
        Ok(())
    }
}

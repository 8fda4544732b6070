use crate::commit::SelectionCommitter;
use crate::mode::{BinSelectionMode, Modifiers};
use histobin_bins::bin::Bin;

/// Pointer gesture state over the histogram bars.
///
/// Bars are addressed by their index in the current bin order. Positions
/// outside the bars are allowed and clamped by the selection mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BinInteraction {
    modifiers: Modifiers,
    drag_start: isize,
    drag_end: isize,
    active_bin: Option<isize>,
    dragging: bool,
}

impl BinInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The bar last clicked without dragging, used as the shift-click anchor
    pub fn active_bin(&self) -> Option<isize> {
        self.active_bin
    }

    /// Current gesture range as `(start, end)` in pointer order
    pub fn range(&self) -> (isize, isize) {
        (self.drag_start, self.drag_end)
    }

    pub fn mouse_pressed(
        &mut self,
        mode: BinSelectionMode,
        modifiers: Modifiers,
        bins: &mut [Bin],
        bar: isize,
    ) {
        self.modifiers = modifiers;
        self.drag_start = match self.active_bin {
            Some(anchor) if modifiers.shift => anchor,
            _ => bar,
        };
        self.drag_end = bar;
        self.dragging = true;
        mode.press(modifiers, bins, self.drag_start, self.drag_end);
    }

    pub fn mouse_dragged(&mut self, mode: BinSelectionMode, bins: &mut [Bin], bar: isize) {
        if !self.dragging || bar == self.drag_end {
            return;
        }
        mode.drag(self.modifiers, bins, self.drag_start, self.drag_end, bar);
        self.drag_end = bar;
    }

    pub fn mouse_released(
        &mut self,
        mode: BinSelectionMode,
        bins: &[Bin],
        committer: &mut dyn SelectionCommitter,
    ) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        mode.release(
            self.modifiers,
            bins,
            self.drag_start,
            self.drag_end,
            committer,
        );
        self.active_bin = (self.drag_start == self.drag_end).then_some(self.drag_start);
    }

    /// Forgets the anchor and any gesture in progress
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

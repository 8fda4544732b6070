use crate::bin::Bin;
use crate::comparator::BinComparator;
use crate::creator::BinCreator;
use crate::filter::ElementFilter;
use crate::formatter::BinFormatter;
use crate::selector::BinSelector;
use histobin_common::element::ElementKind;
use histobin_common::source::{AttributeId, ElementRead, ElementWrite};
use histobin_common::value::Value;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// The bins of a histogram over one element kind.
///
/// Every element admitted during construction belongs to exactly one bin.
/// Each bin's elements form a chain threaded through `next`, indexed by
/// element position, starting at `Bin::first_element`.
#[derive(Debug, Clone)]
pub struct BinCollection {
    element_kind: ElementKind,
    attribute: Option<AttributeId>,
    selector: BinSelector,
    bins: Vec<Bin>,
    next: Vec<Option<usize>>,
}

impl BinCollection {
    /// Partitions the elements of `element_kind` into bins in a single pass.
    ///
    /// Elements rejected by `filter` or without a representative are left
    /// out. Elements whose representatives only carry nulls share a single
    /// null-keyed bin.
    #[tracing::instrument(skip_all, fields(kind = %element_kind))]
    pub fn build(
        source: &dyn ElementRead,
        element_kind: ElementKind,
        attribute: Option<AttributeId>,
        creator: &BinCreator,
        filter: Option<&ElementFilter>,
        formatter: Option<&dyn BinFormatter>,
    ) -> Self {
        let element_count = source.element_count(element_kind);
        let selector = BinSelector::for_kind(source, element_kind);
        let mut next = vec![None; element_count];
        let mut bins: Vec<Bin> = Vec::new();
        let mut lookup: HashMap<Value, usize> = HashMap::new();
        let mut null_bin: Option<usize> = None;

        let mut working = match formatter {
            Some(formatter) => formatter.wrap(creator.template.create()),
            None => creator.template.create(),
        };
        working.init(source, attribute);

        for position in 0..element_count {
            let element = source.element(element_kind, position);
            if filter.is_some_and(|filter| !filter.accepts(element)) {
                continue;
            }
            let representatives = creator
                .representative
                .resolve(source, element_kind, element);
            if representatives.is_none() {
                continue;
            }

            working.clear();
            for representative in representatives.iter() {
                working.set_key(source, attribute, representative);
            }

            let key = (!working.is_only_null())
                .then(|| working.key())
                .filter(|key| !key.is_null());
            let index = match key {
                None => *null_bin.get_or_insert_with(|| {
                    bins.push(Bin::null());
                    bins.len() - 1
                }),
                Some(key) => match lookup.get(&key) {
                    Some(index) => *index,
                    None => {
                        bins.push(working.prepare_for_presentation());
                        lookup.insert(key, bins.len() - 1);
                        bins.len() - 1
                    }
                },
            };

            let bin = &mut bins[index];
            bin.element_count += 1;
            if selector.is_selected(source, element_kind, element) {
                bin.selected_count += 1;
            }
            next[position] = bin.first_element;
            bin.first_element = Some(position);
        }

        tracing::debug!(
            bins = bins.len(),
            elements = element_count,
            "Built bin collection"
        );
        Self {
            element_kind,
            attribute,
            selector,
            bins,
            next,
        }
    }

    pub fn element_kind(&self) -> ElementKind {
        self.element_kind
    }

    pub fn attribute(&self) -> Option<AttributeId> {
        self.attribute
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut [Bin] {
        &mut self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn max_element_count(&self) -> usize {
        self.bins.iter().map(|b| b.element_count).max().unwrap_or(0)
    }

    /// Element positions in the bin at `index`
    pub fn positions(&self, index: usize) -> BinPositions<'_> {
        BinPositions {
            next: &self.next,
            current: self.bins.get(index).and_then(|b| b.first_element),
        }
    }

    /// Reorders the bins and returns where each moved: the bin previously at
    /// index `i` is now at `moved[i]`
    pub fn sort(&mut self, comparator: BinComparator) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.bins.len()).collect();
        order.sort_by(|a, b| comparator.compare(&self.bins[*a], &self.bins[*b]));
        let mut moved = vec![0; order.len()];
        for (new, old) in order.iter().enumerate() {
            moved[*old] = new;
        }
        let mut slots: Vec<Option<Bin>> = std::mem::take(&mut self.bins)
            .into_iter()
            .map(Some)
            .collect();
        self.bins = order.iter().filter_map(|old| slots[*old].take()).collect();
        moved
    }

    /// Recounts selected elements after the selection changed elsewhere
    pub fn update_selection(&mut self, source: &dyn ElementRead) {
        for index in 0..self.bins.len() {
            let selected = self
                .positions(index)
                .map(|p| source.element(self.element_kind, p))
                .filter(|e| self.selector.is_selected(source, self.element_kind, *e))
                .count();
            self.bins[index].selected_count = selected;
        }
    }

    /// Selects the elements of bins `first..=last` and deselects all others
    pub fn select_only_bins(&mut self, graph: &mut dyn ElementWrite, first: usize, last: usize) {
        let range = self.clamp(first, last);
        for index in 0..self.bins.len() {
            let selected = range.as_ref().is_some_and(|r| r.contains(&index));
            self.set_bin_selected(graph, index, selected);
        }
    }

    pub fn select_bins(&mut self, graph: &mut dyn ElementWrite, first: usize, last: usize, select: bool) {
        for index in self.clamp(first, last).into_iter().flatten() {
            self.set_bin_selected(graph, index, select);
        }
    }

    /// Toggles the selection of every element in bins `first..=last`
    pub fn invert_bins(&mut self, graph: &mut dyn ElementWrite, first: usize, last: usize) {
        for index in self.clamp(first, last).into_iter().flatten() {
            let mut selected = 0;
            let mut position = self.bins[index].first_element;
            while let Some(p) = position {
                let element = graph.element(self.element_kind, p);
                let was_selected = self
                    .selector
                    .is_selected(graph.as_read(), self.element_kind, element);
                self.selector
                    .set_selected(graph, self.element_kind, element, !was_selected);
                if !was_selected {
                    selected += 1;
                }
                position = self.next[p];
            }
            self.bins[index].selected_count = selected;
        }
    }

    /// Fully selects bins in `first..=last` that have any selected element and
    /// fully deselects the rest of that range
    pub fn complete_bins(&mut self, graph: &mut dyn ElementWrite, first: usize, last: usize) {
        for index in self.clamp(first, last).into_iter().flatten() {
            let select = self.bins[index].selected_count > 0;
            self.set_bin_selected(graph, index, select);
        }
    }

    /// Selects the bins at `indices`, leaving other bins unchanged
    pub fn select_bin_indices(&mut self, graph: &mut dyn ElementWrite, indices: &[usize]) {
        for &index in indices {
            if index < self.bins.len() {
                self.set_bin_selected(graph, index, true);
            }
        }
    }

    /// Deselects every bin that is not activated, keeping the selection only
    /// where it intersects the activated bins
    pub fn filter_selection(&mut self, graph: &mut dyn ElementWrite) {
        for index in 0..self.bins.len() {
            if !self.bins[index].activated {
                self.set_bin_selected(graph, index, false);
            }
        }
    }

    /// Selects every activated bin in addition to the current selection
    pub fn expand_selection(&mut self, graph: &mut dyn ElementWrite) {
        for index in 0..self.bins.len() {
            if self.bins[index].activated {
                self.set_bin_selected(graph, index, true);
            }
        }
    }

    /// One line per bin, `label` or `label<TAB>count`
    pub fn to_text(&self, include_counts: bool, selected_only: bool) -> String {
        let mut text = String::new();
        for bin in &self.bins {
            if selected_only && bin.selected_count == 0 {
                continue;
            }
            let count = if selected_only {
                bin.selected_count
            } else {
                bin.element_count
            };
            text.push_str(bin.display_label());
            if include_counts {
                text.push_str(&format!("\t{count}"));
            }
            text.push('\n');
        }
        text
    }

    fn clamp(&self, first: usize, last: usize) -> Option<RangeInclusive<usize>> {
        let last = last.min(self.bins.len().checked_sub(1)?);
        (first <= last).then_some(first..=last)
    }

    fn set_bin_selected(&mut self, graph: &mut dyn ElementWrite, index: usize, selected: bool) {
        let mut position = self.bins[index].first_element;
        while let Some(p) = position {
            let element = graph.element(self.element_kind, p);
            self.selector
                .set_selected(graph, self.element_kind, element, selected);
            position = self.next[p];
        }
        let bin = &mut self.bins[index];
        bin.selected_count = if selected { bin.element_count } else { 0 };
    }
}

/// Walks the element chain of one bin.
#[derive(Debug, Clone)]
pub struct BinPositions<'a> {
    next: &'a [Option<usize>],
    current: Option<usize>,
}

impl Iterator for BinPositions<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let position = self.current?;
        self.current = self.next.get(position).copied().flatten();
        Some(position)
    }
}

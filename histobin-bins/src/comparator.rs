use crate::bin::Bin;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString, VariantNames};

/// Orderings available for the bars of a histogram.
///
/// Ties on counts are broken by key, and keys are unique within a
/// collection, so every ordering is total and each reverse variant is the
/// exact inverse of its partner.
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
pub enum BinComparator {
    #[default]
    Key,
    ReverseKey,
    TotalCount,
    ReverseTotalCount,
    SelectedCount,
    ReverseSelectedCount,
    SelectedProportion,
    ReverseSelectedProportion,
}

impl BinComparator {
    pub fn label(&self) -> &'static str {
        match self {
            BinComparator::Key | BinComparator::ReverseKey => "Label",
            BinComparator::TotalCount | BinComparator::ReverseTotalCount => "Total Count",
            BinComparator::SelectedCount | BinComparator::ReverseSelectedCount => "Selected Count",
            BinComparator::SelectedProportion | BinComparator::ReverseSelectedProportion => {
                "Selected Proportion"
            }
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(
            self,
            BinComparator::Key
                | BinComparator::TotalCount
                | BinComparator::SelectedCount
                | BinComparator::SelectedProportion
        )
    }

    /// Whether the ordering changes when the selection does
    pub fn uses_selection(&self) -> bool {
        matches!(
            self,
            BinComparator::SelectedCount
                | BinComparator::ReverseSelectedCount
                | BinComparator::SelectedProportion
                | BinComparator::ReverseSelectedProportion
        )
    }

    pub fn reverse(&self) -> BinComparator {
        match self {
            BinComparator::Key => BinComparator::ReverseKey,
            BinComparator::ReverseKey => BinComparator::Key,
            BinComparator::TotalCount => BinComparator::ReverseTotalCount,
            BinComparator::ReverseTotalCount => BinComparator::TotalCount,
            BinComparator::SelectedCount => BinComparator::ReverseSelectedCount,
            BinComparator::ReverseSelectedCount => BinComparator::SelectedCount,
            BinComparator::SelectedProportion => BinComparator::ReverseSelectedProportion,
            BinComparator::ReverseSelectedProportion => BinComparator::SelectedProportion,
        }
    }

    pub fn compare(&self, a: &Bin, b: &Bin) -> Ordering {
        let ascending = match self {
            BinComparator::Key | BinComparator::ReverseKey => compare_keys(a, b),
            BinComparator::TotalCount | BinComparator::ReverseTotalCount => a
                .element_count
                .cmp(&b.element_count)
                .then_with(|| compare_keys(a, b)),
            BinComparator::SelectedCount | BinComparator::ReverseSelectedCount => a
                .selected_count
                .cmp(&b.selected_count)
                .then_with(|| compare_keys(a, b)),
            BinComparator::SelectedProportion | BinComparator::ReverseSelectedProportion => {
                compare_proportions(a, b).then_with(|| compare_keys(a, b))
            }
        };
        if self.is_ascending() {
            ascending
        } else {
            ascending.reverse()
        }
    }
}

fn compare_keys(a: &Bin, b: &Bin) -> Ordering {
    a.key.compare(&b.key)
}

/// Compares `selected / total` exactly by cross multiplication
fn compare_proportions(a: &Bin, b: &Bin) -> Ordering {
    let lhs = a.selected_count as u128 * b.element_count as u128;
    let rhs = b.selected_count as u128 * a.element_count as u128;
    lhs.cmp(&rhs)
}

mod collections;
mod merge;
mod view;

pub use collections::{
    DisjointPeriods, EmptyPeriods, InvalidPeriods, MergedPeriods, OverlappingPeriods, Periods,
};
pub use merge::{merge_minimal, months_of};
pub use view::{
    has_overlapping, is_contiguous, is_sorted_by_from, span_of, NonEmptyPeriodsView, PeriodsView,
};

pub(crate) use merge::{merge_months, month_set};

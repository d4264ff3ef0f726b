use std::collections::BTreeSet;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::period::{Month, Period};

use super::{
    merge::{merge_minimal, merge_months, month_set, months_of},
    Periods,
};

// -----------------------------------------------------------------------------
// PeriodsView
// -----------------------------------------------------------------------------
/// Read-only view over an ordered sequence of periods.
///
/// This is the weakest capability in the collection hierarchy: every variant
/// implements it, and every set-style operation is provided here exactly once,
/// on top of the month decomposition. Downstream code should accept
/// `&impl PeriodsView` instead of branching on concrete variants.
pub trait PeriodsView {
    /// The member periods, in the order the collection guarantees.
    fn periods(&self) -> &[Period];

    /// Every distinct month covered by the collection, in ascending order.
    fn months(&self) -> Vec<Month> {
        months_of(self.periods().iter().copied())
    }

    /// Check that every month covered by `other` is also covered by this
    /// collection. An empty `other` is trivially contained.
    fn contains_all<P>(&self, other: &P) -> bool
    where
        P: PeriodsView + ?Sized,
    {
        month_set(other.periods().iter().copied())
            .is_subset(&month_set(self.periods().iter().copied()))
    }

    /// Check that the two collections share at least one month.
    fn overlaps<P>(&self, other: &P) -> bool
    where
        P: PeriodsView + ?Sized,
    {
        !month_set(self.periods().iter().copied())
            .is_disjoint(&month_set(other.periods().iter().copied()))
    }

    /// Remove every month covered by `other` and merge what remains.
    ///
    /// The result is always the `Empty` or `Merged` variant of [`Periods`].
    fn subtract<P>(&self, other: &P) -> Periods
    where
        P: PeriodsView + ?Sized,
    {
        let theirs = month_set(other.periods().iter().copied());
        let ours = month_set(self.periods().iter().copied());
        merge_months(ours.difference(&theirs).copied())
    }

    /// The months covered by both collections, merged.
    ///
    /// The result is always the `Empty` or `Merged` variant of [`Periods`].
    fn intersect<P>(&self, other: &P) -> Periods
    where
        P: PeriodsView + ?Sized,
    {
        let theirs = month_set(other.periods().iter().copied());
        let ours = month_set(self.periods().iter().copied());
        merge_months(ours.intersection(&theirs).copied())
    }

    /// The months covered by either collection, merged.
    ///
    /// The result is always the `Empty` or `Merged` variant of [`Periods`].
    fn union<P>(&self, other: &P) -> Periods
    where
        P: PeriodsView + ?Sized,
    {
        merge_minimal(self.periods().iter().chain(other.periods()).copied())
    }

    /// The single period covering every member, or [`None`] for an empty
    /// collection.
    fn span(&self) -> Option<Period> {
        span_of(self.periods())
    }
}

impl PeriodsView for [Period] {
    #[inline]
    fn periods(&self) -> &[Period] {
        self
    }
}

impl PeriodsView for Vec<Period> {
    #[inline]
    fn periods(&self) -> &[Period] {
        self
    }
}

// -----------------------------------------------------------------------------
// NonEmptyPeriodsView
// -----------------------------------------------------------------------------
/// Marker for collections guaranteed to hold at least one period.
///
/// The extremes are taken as min/max over the members, so they are correct
/// even for variants whose order is insertion order.
pub trait NonEmptyPeriodsView: PeriodsView {
    /// The earliest start date among the members.
    fn earliest_from(&self) -> NaiveDate {
        self.periods()
            .iter()
            .map(|p| p.from_date())
            .min()
            .expect("non-empty by construction")
    }

    /// The latest end date among the members.
    fn latest_to(&self) -> NaiveDate {
        self.periods()
            .iter()
            .map(|p| p.to_date())
            .max()
            .expect("non-empty by construction")
    }

    /// The single period from the earliest start to the latest end.
    fn covering(&self) -> Period {
        Period::unchecked(self.earliest_from(), self.latest_to())
    }
}

// -----------------------------------------------------------------------------
// slice-level checks
// -----------------------------------------------------------------------------
/// Check that the periods are sorted by their from date.
///
/// Duplicates and gaps are allowed; with overlapping members the check alone
/// says little, combine it with [`has_overlapping`].
pub fn is_sorted_by_from(periods: &[Period]) -> bool {
    periods
        .iter()
        .tuple_windows()
        .all(|(a, b)| a.from_date() <= b.from_date())
}

/// Check whether any two periods share a month.
pub fn has_overlapping(periods: &[Period]) -> bool {
    let months: Vec<Month> = periods
        .iter()
        .flat_map(|p| p.months().into_vec())
        .collect();
    let distinct: BTreeSet<&Month> = months.iter().collect();
    distinct.len() != months.len()
}

/// Check that the periods cover a gap-free range of months.
///
/// The input does not have to be sorted and may contain duplicates; an empty
/// slice counts as contiguous.
pub fn is_contiguous(periods: &[Period]) -> bool {
    let Some(span) = span_of(periods) else {
        return true;
    };
    month_set(periods.iter().copied()).len() == span.month_count() as usize
}

/// The single period covering every member, or [`None`] for an empty slice.
///
/// The input does not have to be sorted or contiguous.
pub fn span_of(periods: &[Period]) -> Option<Period> {
    let from = periods.iter().map(|p| p.from_date()).min()?;
    let to = periods.iter().map(|p| p.to_date()).max()?;
    Some(Period::unchecked(from, to))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn per(from: (i32, u32, u32), to: (i32, u32, u32)) -> Period {
        Period::new(ymd(from.0, from.1, from.2), ymd(to.0, to.1, to.2)).unwrap()
    }

    fn mon(y: i32, m: u32) -> Period {
        Month::from_parts(y, m).as_period()
    }

    #[rstest]
    #[case(vec![], true)]
    #[case(vec![mon(2021, 1)], true)]
    #[case(vec![mon(2021, 1), mon(2021, 3)], true)]
    #[case(vec![mon(2021, 1), mon(2021, 1)], true)]
    #[case(vec![mon(2021, 3), mon(2021, 1)], false)]
    fn test_is_sorted_by_from(#[case] periods: Vec<Period>, #[case] expected: bool) {
        assert_eq!(is_sorted_by_from(&periods), expected);
    }

    #[rstest]
    #[case(vec![], false)]
    #[case(vec![mon(2021, 1)], false)]
    #[case(vec![mon(2021, 1), mon(2021, 2)], false)]
    #[case(vec![mon(2021, 1), mon(2021, 1)], true)]
    #[case(vec![per((2021, 1, 1), (2021, 6, 30)), per((2021, 6, 1), (2021, 9, 30))], true)]
    fn test_has_overlapping(#[case] periods: Vec<Period>, #[case] expected: bool) {
        assert_eq!(has_overlapping(&periods), expected);
    }

    #[rstest]
    #[case(vec![], true)]
    #[case(vec![mon(2021, 1)], true)]
    #[case(vec![mon(2021, 1), mon(2021, 2)], true)]
    #[case(vec![mon(2021, 2), mon(2021, 1), mon(2021, 3)], true)]
    #[case(vec![mon(2021, 1), mon(2021, 1), mon(2021, 2)], true)]
    #[case(vec![mon(2021, 1), mon(2021, 3)], false)]
    fn test_is_contiguous(#[case] periods: Vec<Period>, #[case] expected: bool) {
        assert_eq!(is_contiguous(&periods), expected);
    }

    #[test]
    fn test_span_of() {
        let tested = span_of(&[mon(2021, 3), mon(2021, 1), mon(2021, 12)]);

        assert_eq!(tested, Some(per((2021, 1, 1), (2021, 12, 31))));

        assert_eq!(span_of(&[]), None);
    }

    #[test]
    fn test_months() {
        let tested = vec![mon(2021, 3), mon(2021, 1), mon(2021, 1)];

        assert_eq!(
            tested.months(),
            vec![Month::from_parts(2021, 1), Month::from_parts(2021, 3)]
        );
    }

    #[test]
    fn test_contains_all() {
        let year = vec![Period::year(2021)];
        let pieces = vec![mon(2021, 1), mon(2021, 12)];

        assert!(year.contains_all(&pieces));
        assert!(!pieces.contains_all(&year));
        assert!(year.contains_all(&Vec::<Period>::new()));
        // reflexive
        assert!(pieces.contains_all(&pieces));
    }

    #[rstest]
    #[case(vec![mon(2021, 1), mon(2021, 2)], vec![mon(2021, 2)], true)]
    #[case(vec![mon(2021, 1)], vec![mon(2021, 2)], false)]
    #[case(vec![], vec![mon(2021, 2)], false)]
    #[case(vec![per((2021, 1, 1), (2021, 6, 30))], vec![per((2021, 6, 1), (2021, 12, 31))], true)]
    fn test_overlaps(#[case] a: Vec<Period>, #[case] b: Vec<Period>, #[case] expected: bool) {
        assert_eq!(a.overlaps(&b), expected);
        // symmetry
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn test_subtract() {
        let a = vec![per((2021, 1, 1), (2021, 6, 30))];
        let b = vec![mon(2021, 3), mon(2021, 5)];

        let tested = a.subtract(&b);

        assert_eq!(
            tested.periods(),
            &[mon(2021, 1).merge(mon(2021, 2)).unwrap(), mon(2021, 4), mon(2021, 6)]
        );
    }

    #[test]
    fn test_intersect() {
        let a = vec![per((2021, 1, 1), (2021, 6, 30))];
        let b = vec![per((2021, 4, 1), (2021, 9, 30))];

        let tested = a.intersect(&b);

        assert_eq!(tested.periods(), &[per((2021, 4, 1), (2021, 6, 30))]);

        let disjoint = a.intersect(&vec![mon(2021, 12)]);

        assert!(disjoint.periods().is_empty());
    }

    #[test]
    fn test_union() {
        let a = vec![mon(2021, 1), mon(2021, 2)];
        let b = vec![mon(2021, 3)];

        let tested = a.union(&b);

        assert_eq!(tested.periods(), &[per((2021, 1, 1), (2021, 3, 31))]);
    }

    #[test]
    fn test_difference_union_round_trip() {
        // A and B overlap and leave no gap between them
        let a = vec![per((2021, 1, 1), (2021, 6, 30))];
        let b = vec![per((2021, 4, 1), (2021, 9, 30))];

        let a_only = a.subtract(&b);
        let b_only = b.subtract(&a);
        let both = a.intersect(&b);

        let rebuilt = a_only.union(&b_only).union(&both);

        assert_eq!(rebuilt, a.union(&b));
        assert_eq!(rebuilt.periods(), &[per((2021, 1, 1), (2021, 9, 30))]);
    }
}

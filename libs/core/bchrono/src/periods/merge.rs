use std::collections::BTreeSet;

use crate::period::{Month, Period};

use super::{EmptyPeriods, MergedPeriods, Periods};

/// The set of distinct months covered by the given periods.
pub(crate) fn month_set<I>(periods: I) -> BTreeSet<Month>
where
    I: IntoIterator<Item = Period>,
{
    periods
        .into_iter()
        .flat_map(|p| p.months().into_vec())
        .collect()
}

/// Every distinct month covered by the given periods, in ascending order.
///
/// The input does not have to be sorted or contiguous and may contain
/// duplicates; the output may be non-contiguous.
///
/// # Example
/// ```
/// use bchrono::period::Month;
/// use bchrono::periods::months_of;
///
/// let jan = Month::new(2021, chrono::Month::January);
/// let feb = Month::new(2021, chrono::Month::February);
/// let mar = Month::new(2021, chrono::Month::March);
///
/// let months = months_of([jan.as_period(), mar.as_period(), feb.as_period()]);
///
/// assert_eq!(months, vec![jan, feb, mar]);
/// ```
pub fn months_of<I>(periods: I) -> Vec<Month>
where
    I: IntoIterator<Item = Period>,
{
    month_set(periods).into_iter().collect()
}

/// Fold months into the minimal list of contiguous periods.
///
/// The input must be ascending and free of duplicates; each month either
/// merges into the accumulator's last period or, across a genuine gap, opens
/// a new one. The fold keeps the result sorted and minimal by construction.
pub(crate) fn merge_months<I>(months: I) -> Periods
where
    I: IntoIterator<Item = Month>,
{
    let mut merged: Vec<Period> = Vec::new();
    for month in months {
        let period = month.as_period();
        match merged.last_mut() {
            Some(last) => match last.merge(period) {
                Ok(joined) => *last = joined,
                Err(_) => merged.push(period),
            },
            None => merged.push(period),
        }
    }
    if merged.is_empty() {
        Periods::Empty(EmptyPeriods)
    } else {
        Periods::Merged(MergedPeriods::unchecked(merged))
    }
}

/// Normalize any bag of periods into its minimal sorted non-overlapping
/// representation.
///
/// The input may be unsorted and may contain duplicates, overlaps and gaps.
/// The output is uniquely determined by the set of months present in the
/// input: it is the `Empty` variant for empty input and the `Merged` variant
/// otherwise.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use bchrono::period::{Month, Period};
/// use bchrono::periods::{merge_minimal, PeriodsView};
///
/// let month = |m| Month::new(2021, m).as_period();
///
/// // adjacent months collapse into one period
/// let merged = merge_minimal([
///     month(chrono::Month::January),
///     month(chrono::Month::March),
///     month(chrono::Month::February),
/// ]);
/// let ymd = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(
///     merged.periods(),
///     &[Period::new(ymd(2021, 1, 1), ymd(2021, 3, 31)).unwrap()]
/// );
///
/// // a genuine gap is preserved
/// let gapped = merge_minimal([month(chrono::Month::January), month(chrono::Month::March)]);
/// assert_eq!(gapped.periods().len(), 2);
/// ```
pub fn merge_minimal<I>(periods: I) -> Periods
where
    I: IntoIterator<Item = Period>,
{
    merge_months(month_set(periods))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use crate::periods::PeriodsView;

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

    #[rstest_reuse::template]
    #[rstest]
    #[case::single(vec![mon(2021, 1)])]
    #[case::adjacent(vec![mon(2021, 1), mon(2021, 2), mon(2021, 3)])]
    #[case::gap(vec![mon(2021, 1), mon(2021, 3)])]
    #[case::unsorted(vec![mon(2021, 3), mon(2021, 1), mon(2021, 2)])]
    #[case::duplicates(vec![mon(2021, 1), mon(2021, 1), mon(2021, 2)])]
    #[case::overlapping(vec![per((2021, 1, 1), (2021, 6, 30)), per((2021, 4, 1), (2021, 9, 30))])]
    #[case::contained(vec![per((2021, 1, 1), (2021, 12, 31)), per((2021, 4, 1), (2021, 6, 30))])]
    #[case::across_years(vec![per((2020, 11, 1), (2021, 2, 28)), mon(2021, 4), mon(2022, 1)])]
    #[case::empty(vec![])]
    fn period_bags(#[case] periods: Vec<Period>) {}

    #[rstest_reuse::apply(period_bags)]
    fn test_merge_minimal_idempotent(periods: Vec<Period>) {
        let once = merge_minimal(periods.clone());

        let twice = merge_minimal(once.periods().iter().copied());

        assert_eq!(twice, once);
    }

    #[rstest_reuse::apply(period_bags)]
    fn test_merge_minimal_order_independent(periods: Vec<Period>) {
        let reversed: Vec<_> = periods.iter().rev().copied().collect();

        assert_eq!(merge_minimal(reversed), merge_minimal(periods));
    }

    #[rstest_reuse::apply(period_bags)]
    fn test_merge_minimal_duplicate_independent(periods: Vec<Period>) {
        let doubled: Vec<_> = periods.iter().chain(periods.iter()).copied().collect();

        assert_eq!(merge_minimal(doubled), merge_minimal(periods));
    }

    #[rstest_reuse::apply(period_bags)]
    fn test_merge_minimal_preserves_months(periods: Vec<Period>) {
        let merged = merge_minimal(periods.clone());

        assert_eq!(merged.months(), months_of(periods));
    }

    #[rstest_reuse::apply(period_bags)]
    fn test_merge_minimal_result_is_minimal(periods: Vec<Period>) {
        let merged = merge_minimal(periods);

        let result = merged.periods();
        for pair in result.windows(2) {
            assert!(pair[0].from_date() < pair[1].from_date());
            assert!(!pair[0].overlaps(pair[1]));
            assert!(!pair[0].touches(pair[1]));
        }
    }

    #[test]
    fn test_merge_minimal_collapses_adjacent_months() {
        let merged = merge_minimal([mon(2021, 1), mon(2021, 3), mon(2021, 2)]);

        assert_eq!(merged.periods(), &[per((2021, 1, 1), (2021, 3, 31))]);
    }

    #[test]
    fn test_merge_minimal_preserves_gap() {
        let merged = merge_minimal([mon(2021, 1), mon(2021, 3)]);

        assert_eq!(merged.periods(), &[mon(2021, 1), mon(2021, 3)]);
    }

    #[test]
    fn test_merge_minimal_empty() {
        let merged = merge_minimal(Vec::<Period>::new());

        assert_eq!(merged, Periods::empty());
    }

    #[test]
    fn test_months_of_sorted_and_distinct() {
        let months = months_of([mon(2021, 1), mon(2021, 3), mon(2021, 2), mon(2021, 1)]);

        assert_eq!(
            months,
            vec![
                Month::from_parts(2021, 1),
                Month::from_parts(2021, 2),
                Month::from_parts(2021, 3),
            ]
        );
    }

    #[test]
    fn test_months_of_empty() {
        assert!(months_of(Vec::<Period>::new()).is_empty());
    }
}

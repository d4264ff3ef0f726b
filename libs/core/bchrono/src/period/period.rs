use std::{collections::BTreeSet, fmt::Display};

use bcollections::non_empty::{NonEmpty, RequireNonEmpty};
use chrono::{Datelike, Days, NaiveDate};

use crate::{
    interval::{CannotMerge, DateInterval},
    periods::{merge_months, month_set, Periods, PeriodsView},
};

use super::Month;

// -----------------------------------------------------------------------------
// InvalidPeriod
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidPeriod {
    #[error("from date {0} is not the first day of a month")]
    FromNotStartOfMonth(NaiveDate),
    #[error("to date {0} is not the last day of a month")]
    ToNotEndOfMonth(NaiveDate),
    #[error("from date {from} must be strictly before to date {to}")]
    FromNotBeforeTo { from: NaiveDate, to: NaiveDate },
}

// -----------------------------------------------------------------------------
// Period
// -----------------------------------------------------------------------------
/// A closed date interval aligned to calendar month boundaries.
///
/// `from` is the first day of its month and `to` the last day of its month, so
/// a period always covers one or more whole calendar months. Every set-style
/// operation (difference, intersection, coverage equality) is defined on the
/// month decomposition returned by [`Period::months`], which keeps them
/// correct for irregular, non-contiguous inputs.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use bchrono::period::Period;
///
/// let ymd = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
///
/// let q1 = Period::new(ymd(2021, 1, 1), ymd(2021, 3, 31)).unwrap();
///
/// assert_eq!(q1.month_count(), 3);
/// assert!(Period::new(ymd(2021, 1, 15), ymd(2021, 3, 31)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(DateInterval);

//
// ser/de
//
#[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
struct _PeriodData {
    from: NaiveDate,
    to: NaiveDate,
}

impl Display for Period {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl serde::Serialize for Period {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        _PeriodData {
            from: self.from_date(),
            to: self.to_date(),
        }
        .serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Period, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = _PeriodData::deserialize(deserializer)?;
        Period::new(data.from, data.to).map_err(serde::de::Error::custom)
    }
}

impl schemars::JsonSchema for Period {
    fn schema_name() -> String {
        "Period".to_string()
    }
    fn schema_id() -> std::borrow::Cow<'static, str> {
        "bchrono::period::Period".into()
    }
    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <_PeriodData as schemars::JsonSchema>::json_schema(gen)
    }
}

//
// ctors
//
impl Period {
    /// Create a period from its inclusive endpoints.
    ///
    /// # Errors
    /// - [`InvalidPeriod::FromNotStartOfMonth`] if `from` is not the first day of a month
    /// - [`InvalidPeriod::ToNotEndOfMonth`] if `to` is not the last day of a month
    /// - [`InvalidPeriod::FromNotBeforeTo`] if `from` is not strictly before `to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Period, InvalidPeriod> {
        Self::validate(from, to)?;
        Ok(Period(DateInterval::new(from, to)))
    }

    /// The period covering a whole calendar year.
    pub fn year(year: i32) -> Period {
        Period::unchecked(
            NaiveDate::from_ymd_opt(year, 1, 1).expect("year within the supported date range"),
            NaiveDate::from_ymd_opt(year, 12, 31).expect("year within the supported date range"),
        )
    }

    /// Construction for endpoints already known to be month-aligned.
    #[inline]
    pub(crate) fn unchecked(from: NaiveDate, to: NaiveDate) -> Period {
        debug_assert!(Self::validate(from, to).is_ok());
        Period(DateInterval::new(from, to))
    }

    fn validate(from: NaiveDate, to: NaiveDate) -> Result<(), InvalidPeriod> {
        if from.day() != 1 {
            return Err(InvalidPeriod::FromNotStartOfMonth(from));
        }
        let to_is_last = to
            .checked_add_days(Days::new(1))
            .map_or(true, |next| next.day() == 1);
        if !to_is_last {
            return Err(InvalidPeriod::ToNotEndOfMonth(to));
        }
        if from >= to {
            return Err(InvalidPeriod::FromNotBeforeTo { from, to });
        }
        Ok(())
    }
}

//
// interval delegation
//
impl Period {
    /// The first date of the period, always the first day of a month.
    #[inline]
    pub fn from_date(&self) -> NaiveDate {
        self.0.from_date()
    }

    /// The last date of the period, always the last day of a month.
    #[inline]
    pub fn to_date(&self) -> NaiveDate {
        self.0.to_date()
    }

    /// Widen to the underlying [`DateInterval`].
    #[inline]
    pub fn interval(&self) -> DateInterval {
        self.0
    }

    #[inline]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.0.contains_date(date)
    }

    /// Check if `other` lies entirely within this period.
    #[inline]
    pub fn contains(&self, other: Period) -> bool {
        self.0.contains(other.0)
    }

    /// Check if the two periods share at least one calendar day.
    #[inline]
    pub fn overlaps(&self, other: Period) -> bool {
        self.0.overlaps(other.0)
    }

    /// See [`DateInterval::overlaps_excluding_end`].
    #[inline]
    pub fn overlaps_excluding_end(&self, other: Period) -> bool {
        self.0.overlaps_excluding_end(other.0)
    }

    /// Check adjacency: equal periods, or periods separated by exactly zero days.
    #[inline]
    pub fn touches(&self, other: Period) -> bool {
        self.0.touches(other.0)
    }

    #[inline]
    pub fn is_before(&self, other: Period) -> bool {
        self.0.is_before(other.0)
    }

    #[inline]
    pub fn is_after(&self, other: Period) -> bool {
        self.0.is_after(other.0)
    }

    /// Number of calendar days in the period.
    ///
    /// # Panics
    /// Panics on the `NaiveDate::MIN`/`MAX` open-ended sentinels, see
    /// [`DateInterval::day_count`].
    #[inline]
    pub fn day_count(&self) -> i64 {
        self.0.day_count()
    }
}

//
// month decomposition and set operations
//
impl Period {
    /// Number of whole calendar months spanned.
    ///
    /// Overflow is out of scope: periods are bounded to practical multi-decade
    /// ranges, far below `i32::MAX` months.
    ///
    /// # Panics
    /// Panics if an endpoint is the `NaiveDate::MIN`/`NaiveDate::MAX`
    /// open-ended sentinel; those markers must never reach month counting.
    pub fn month_count(&self) -> i32 {
        let (from, to) = (self.from_date(), self.to_date());
        assert!(
            from != NaiveDate::MIN && to != NaiveDate::MAX,
            "month count over an open-ended sentinel: from={from}, to={to}"
        );
        let months = i64::from(to.year()) * 12 + i64::from(to.month())
            - i64::from(from.year()) * 12
            - i64::from(from.month())
            + 1;
        i32::try_from(months).expect("month count fits in i32 for supported date ranges")
    }

    /// The month this period starts in.
    #[inline]
    pub fn first_month(&self) -> Month {
        Month::from_parts(self.from_date().year(), self.from_date().month())
    }

    /// The month this period ends in.
    #[inline]
    pub fn last_month(&self) -> Month {
        Month::from_parts(self.to_date().year(), self.to_date().month())
    }

    /// Decompose the period into its constituent months, in order, without
    /// gaps or duplicates. Every set-style operation is built on this.
    ///
    /// # Example
    /// ```
    /// use bchrono::period::Period;
    ///
    /// let months = Period::year(2021).months();
    ///
    /// assert_eq!(months.len(), 12);
    /// assert_eq!(months.first().to_string(), "2021-01");
    /// assert_eq!(months.last().to_string(), "2021-12");
    /// ```
    pub fn months(&self) -> NonEmpty<Month> {
        let first = self.first_month();
        (0..i64::from(self.month_count()))
            .map(|n| first.plus_months(n))
            .collect::<Vec<_>>()
            .require_non_empty()
            .expect("a period spans at least one month")
    }

    /// Check that this period covers exactly the same set of months as
    /// `other`, not merely that the spans touch.
    #[inline]
    pub fn full_overlap(&self, other: Period) -> bool {
        self.months() == other.months()
    }

    /// Check that this period covers exactly the same set of months as the
    /// collection.
    pub fn full_overlap_all<P>(&self, other: &P) -> bool
    where
        P: PeriodsView + ?Sized,
    {
        self.month_set() == month_set(other.periods().iter().copied())
    }

    /// Check that every month of the collection is covered by this period.
    /// An empty collection is trivially contained.
    pub fn contains_all<P>(&self, other: &P) -> bool
    where
        P: PeriodsView + ?Sized,
    {
        month_set(other.periods().iter().copied()).is_subset(&self.month_set())
    }

    /// The period covered by both `self` and `other`, or [`None`] if they do
    /// not overlap.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use bchrono::period::Period;
    ///
    /// let ymd = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    ///
    /// let a = Period::new(ymd(2021, 1, 1), ymd(2021, 6, 30)).unwrap();
    /// let b = Period::new(ymd(2021, 4, 1), ymd(2021, 9, 30)).unwrap();
    ///
    /// assert_eq!(a.intersect(b), Period::new(ymd(2021, 4, 1), ymd(2021, 6, 30)).ok());
    /// ```
    pub fn intersect(&self, other: Period) -> Option<Period> {
        if self.overlaps(other) {
            Some(Period::unchecked(
                self.from_date().max(other.from_date()),
                self.to_date().min(other.to_date()),
            ))
        } else {
            None
        }
    }

    /// Remove the months of `other` from this period and merge what remains
    /// into its minimal representation.
    ///
    /// The result is always the `Empty` or `Merged` variant of [`Periods`].
    pub fn subtract(&self, other: Period) -> Periods {
        let theirs = other.month_set();
        merge_months(self.month_set().difference(&theirs).copied())
    }

    /// Remove the months of every period in the collection from this period.
    ///
    /// The result is always the `Empty` or `Merged` variant of [`Periods`].
    pub fn subtract_all<P>(&self, other: &P) -> Periods
    where
        P: PeriodsView + ?Sized,
    {
        let theirs = month_set(other.periods().iter().copied());
        merge_months(self.month_set().difference(&theirs).copied())
    }

    /// Merge two periods into the single period spanning both.
    ///
    /// Succeeds iff the periods overlap or touch.
    #[inline]
    pub fn merge(&self, other: Period) -> Result<Period, CannotMerge> {
        self.0.merge(other.0).map(Period)
    }

    /// Extend the period so that `to` becomes the last day of the following
    /// month.
    pub fn extend_by_one_month(&self) -> Period {
        Period::unchecked(self.from_date(), self.last_month().plus_months(1).last_day())
    }

    /// Extend the period with a directly adjacent successor.
    ///
    /// Requires `adjacent` to start the day after this period ends; anything
    /// else is a [`CannotMerge`] error.
    pub fn extend_with(&self, adjacent: Period) -> Result<Period, CannotMerge> {
        if self.to_date().checked_add_days(Days::new(1)) != Some(adjacent.from_date()) {
            return Err(CannotMerge {
                lhs: self.interval(),
                rhs: adjacent.interval(),
            });
        }
        Ok(Period::unchecked(self.from_date(), adjacent.to_date()))
    }

    /// Displace the period by `months` whole months. Positive values move
    /// forward in time, negative values backward.
    pub fn shift(&self, months: i32) -> Period {
        let first = self.first_month().plus_months(i64::from(months));
        let last = self.last_month().plus_months(i64::from(months));
        Period::unchecked(first.first_day(), last.last_day())
    }

    fn month_set(&self) -> BTreeSet<Month> {
        self.months().into_iter().collect()
    }
}

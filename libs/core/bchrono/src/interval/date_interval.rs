use std::fmt::Display;

use chrono::{Days, NaiveDate};

// -----------------------------------------------------------------------------
// CannotMerge
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{lhs} and {rhs} neither overlap nor touch")]
pub struct CannotMerge {
    pub lhs: DateInterval,
    pub rhs: DateInterval,
}

// -----------------------------------------------------------------------------
// DateInterval
// -----------------------------------------------------------------------------
/// A closed interval `[from, to]` over calendar dates.
///
/// Both endpoints are included and `from <= to` always holds. Ordering is
/// lexicographic on `(from, to)`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use bchrono::interval::DateInterval;
///
/// let ymd = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
///
/// let iv = DateInterval::new(ymd(2021, 1, 5), ymd(2021, 2, 10));
///
/// assert!(iv.contains_date(ymd(2021, 1, 5)));
/// assert!(iv.contains_date(ymd(2021, 2, 10)));
/// assert!(!iv.contains_date(ymd(2021, 2, 11)));
/// assert_eq!(iv.day_count(), 37);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateInterval {
    from: NaiveDate,
    to: NaiveDate,
}

//
// ser/de
//
impl Display for DateInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

//
// ctors
//
impl DateInterval {
    /// Create a new closed interval `[from, to]`.
    ///
    /// # Panics
    /// Panics if `from > to`.
    #[inline]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        assert!(
            from <= to,
            "interval endpoints out of order: from={from}, to={to}"
        );
        Self { from, to }
    }
}

//
// methods
//
impl DateInterval {
    /// The first date of the interval, inclusive.
    #[inline]
    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    /// The last date of the interval, inclusive.
    #[inline]
    pub fn to_date(&self) -> NaiveDate {
        self.to
    }

    /// Check if the given date falls within the interval, both ends inclusive.
    #[inline]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Check if `other` lies entirely within this interval.
    #[inline]
    pub fn contains(&self, other: DateInterval) -> bool {
        self.starts_same_or_before(other) && self.ends_same_or_after(other)
    }

    /// Check if the two intervals share at least one calendar day.
    ///
    /// Both ends are inclusive, so `[Jan 1, Jan 31]` and `[Jan 31, Feb 28]`
    /// overlap.
    #[inline]
    pub fn overlaps(&self, other: DateInterval) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    /// Overlap check for callers that treat `to` as an exclusive boundary.
    ///
    /// Strict on both sides: `[Jan 1, Jan 31]` and `[Jan 31, Feb 28]` do not
    /// overlap under this variant.
    #[inline]
    pub fn overlaps_excluding_end(&self, other: DateInterval) -> bool {
        self.from < other.to && self.to > other.from
    }

    /// Check adjacency: the intervals are equal, or the end of one is the day
    /// before the start of the other. Symmetric.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use bchrono::interval::DateInterval;
    ///
    /// let ymd = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    ///
    /// let jan = DateInterval::new(ymd(2021, 1, 1), ymd(2021, 1, 31));
    /// let feb = DateInterval::new(ymd(2021, 2, 1), ymd(2021, 2, 28));
    /// let mar = DateInterval::new(ymd(2021, 3, 1), ymd(2021, 3, 31));
    ///
    /// assert!(jan.touches(feb));
    /// assert!(feb.touches(jan));
    /// assert!(!jan.touches(mar));
    /// ```
    pub fn touches(&self, other: DateInterval) -> bool {
        if self == &other {
            return true;
        }
        self.to.checked_add_days(Days::new(1)) == Some(other.from)
            || other.to.checked_add_days(Days::new(1)) == Some(self.from)
    }

    /// Merge two intervals into the single interval spanning both.
    ///
    /// Succeeds iff the intervals overlap or touch; a genuine gap is reported
    /// as [`CannotMerge`] instead of being silently bridged.
    pub fn merge(&self, other: DateInterval) -> Result<DateInterval, CannotMerge> {
        if self.overlaps(other) || self.touches(other) {
            Ok(DateInterval {
                from: self.from.min(other.from),
                to: self.to.max(other.to),
            })
        } else {
            Err(CannotMerge {
                lhs: *self,
                rhs: other,
            })
        }
    }

    /// Number of calendar days in the interval, both ends counted.
    ///
    /// # Panics
    /// Panics if an endpoint is the `NaiveDate::MIN`/`NaiveDate::MAX`
    /// open-ended sentinel; those markers must never reach day counting.
    pub fn day_count(&self) -> i64 {
        assert!(
            self.from != NaiveDate::MIN && self.to != NaiveDate::MAX,
            "day count over an open-ended sentinel: from={}, to={}",
            self.from,
            self.to
        );
        (self.to - self.from).num_days() + 1
    }

    //
    // boundary predicates
    //

    #[inline]
    pub fn starts_before(&self, other: DateInterval) -> bool {
        self.from < other.from
    }

    #[inline]
    pub fn starts_same_or_before(&self, other: DateInterval) -> bool {
        self.from <= other.from
    }

    #[inline]
    pub fn starts_after(&self, other: DateInterval) -> bool {
        self.from > other.from
    }

    #[inline]
    pub fn ends_before(&self, other: DateInterval) -> bool {
        self.to < other.to
    }

    #[inline]
    pub fn ends_same_or_after(&self, other: DateInterval) -> bool {
        self.to >= other.to
    }

    #[inline]
    pub fn ends_after(&self, other: DateInterval) -> bool {
        self.to > other.to
    }

    /// The whole interval lies strictly before `other`.
    #[inline]
    pub fn is_before(&self, other: DateInterval) -> bool {
        self.to < other.from
    }

    /// The whole interval lies strictly after `other`.
    #[inline]
    pub fn is_after(&self, other: DateInterval) -> bool {
        self.from > other.to
    }
}

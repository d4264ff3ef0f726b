use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};

use super::{cache::month_cache, Period};

// -----------------------------------------------------------------------------
// NotFirstDayOfMonth
// ParseMonthError
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{0} is not the first day of a month")]
pub struct NotFirstDayOfMonth(pub NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("invalid month string: {0:?}. Expected format is yyyy-MM")]
pub struct ParseMonthError(pub String);

// -----------------------------------------------------------------------------
// Month
// -----------------------------------------------------------------------------
/// A period spanning exactly one calendar month.
///
/// Values are interned through the process-wide [`MonthCache`]: repeated
/// construction for the same calendar month yields the cached value, which
/// keeps equality and hashing cheap in hot paths.
///
/// The canonical textual form is `yyyy-MM`; [`FromStr`] accepts nothing else.
///
/// # Example
/// ```
/// use bchrono::period::Month;
///
/// let jan = Month::new(2021, chrono::Month::January);
///
/// assert_eq!(jan.to_string(), "2021-01");
/// assert_eq!(jan, "2021-01".parse().unwrap());
/// assert_eq!(jan.plus_months(1), Month::new(2021, chrono::Month::February));
/// ```
///
/// [`MonthCache`]: super::MonthCache
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    /// Month number, `1..=12`.
    month: u32,
}

//
// ser/de
//
impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_owned());

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(err());
        }
        let (year, month) = (&s[..4], &s[5..]);
        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Month::from_parts(year, month))
    }
}

impl serde::Serialize for Month {
    #[inline]
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Month {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Month::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl schemars::JsonSchema for Month {
    fn schema_name() -> String {
        "Month".to_string()
    }
    fn schema_id() -> std::borrow::Cow<'static, str> {
        "bchrono::period::Month".into()
    }
    fn json_schema(_: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        let mut obj = schemars::schema::SchemaObject {
            instance_type: Some(schemars::schema::InstanceType::String.into()),
            ..Default::default()
        };
        obj.metadata().description = Some("A calendar month. e.g. 2021-01".to_string());
        obj.string().pattern = Some(r#"^\d{4}-(0[1-9]|1[0-2])$"#.to_string());
        obj.into()
    }
}

//
// ctors
//
impl Month {
    /// The month of the given year, resolved through the process-wide cache.
    #[inline]
    pub fn new(year: i32, month: chrono::Month) -> Self {
        Self::from_parts(year, month.number_from_month())
    }

    /// The month starting at the given date.
    ///
    /// The date must be the first day of its month. This is deliberate: a
    /// caller holding an arbitrary date has to state whether it means "the
    /// month starting at this date", and there is no permissive variant for
    /// "the month containing this date".
    pub fn from_first_day(date: NaiveDate) -> Result<Self, NotFirstDayOfMonth> {
        if date.day() != 1 {
            return Err(NotFirstDayOfMonth(date));
        }
        Ok(Self::from_parts(date.year(), date.month()))
    }

    /// Cache lookup for an already validated month number.
    #[inline]
    pub(crate) fn from_parts(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        month_cache().resolve(year, month)
    }

    /// Direct construction, bypassing the cache. Only for cache population.
    #[inline]
    pub(crate) fn raw(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

//
// methods
//
impl Month {
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, `1..=12`.
    #[inline]
    pub fn month_number(&self) -> u32 {
        self.month
    }

    /// The first day of the month.
    ///
    /// # Panics
    /// Panics for years outside the range representable by [`NaiveDate`].
    #[inline]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("year within the supported date range")
    }

    /// The last day of the month.
    ///
    /// # Panics
    /// Panics for years outside the range representable by [`NaiveDate`].
    #[inline]
    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .expect("year within the supported date range")
    }

    /// This month displaced by `n` whole months. Negative values move
    /// backwards in time.
    pub fn plus_months(&self, n: i64) -> Month {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + n;
        let year = i32::try_from(total.div_euclid(12)).expect("year fits in i32");
        let month = (total.rem_euclid(12) + 1) as u32;
        Self::from_parts(year, month)
    }

    /// Every month from this one up to, but excluding, `end`.
    ///
    /// Empty when `self >= end`.
    ///
    /// # Example
    /// ```
    /// use bchrono::period::Month;
    ///
    /// let jan = Month::new(2021, chrono::Month::January);
    /// let apr = Month::new(2021, chrono::Month::April);
    ///
    /// let months: Vec<_> = jan.until(apr).map(|m| m.to_string()).collect();
    ///
    /// assert_eq!(months, ["2021-01", "2021-02", "2021-03"]);
    /// assert_eq!(apr.until(jan).count(), 0);
    /// ```
    #[inline]
    pub fn until(self, end: Month) -> MonthIter {
        MonthIter { cur: self, end }
    }

    /// Widen to a [`Period`] covering exactly this month.
    #[inline]
    pub fn as_period(&self) -> Period {
        Period::unchecked(self.first_day(), self.last_day())
    }
}

impl From<Month> for Period {
    #[inline]
    fn from(month: Month) -> Period {
        month.as_period()
    }
}

// -----------------------------------------------------------------------------
// MonthIter
// -----------------------------------------------------------------------------
/// Iterator over consecutive months, end-exclusive. See [`Month::until`].
#[derive(Debug, Clone)]
pub struct MonthIter {
    cur: Month,
    end: Month,
}

impl Iterator for MonthIter {
    type Item = Month;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cur >= self.end {
            return None;
        }
        let ret = self.cur;
        self.cur = self.cur.plus_months(1);
        Some(ret)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cur >= self.end {
            return (0, Some(0));
        }
        let months = i64::from(self.end.year) * 12 + i64::from(self.end.month)
            - i64::from(self.cur.year) * 12
            - i64::from(self.cur.month);
        let months = months as usize;
        (months, Some(months))
    }
}

impl ExactSizeIterator for MonthIter {}

impl std::iter::FusedIterator for MonthIter {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_is_interned() {
        // two independent call sites observe the same cached value
        let a = Month::new(2021, chrono::Month::January);
        let b = Month::new(2021, chrono::Month::January);

        assert_eq!(a, b);
        assert_eq!(a.year(), 2021);
        assert_eq!(a.month_number(), 1);
    }

    #[test]
    fn test_from_first_day_ok() {
        let tested = Month::from_first_day(ymd(2021, 3, 1)).unwrap();

        assert_eq!(tested, Month::new(2021, chrono::Month::March));
    }

    #[rstest]
    #[case(ymd(2021, 3, 2))]
    #[case(ymd(2021, 3, 31))]
    #[case(ymd(2021, 2, 28))]
    fn test_from_first_day_ng(#[case] date: NaiveDate) {
        let tested = Month::from_first_day(date);

        assert_eq!(tested.unwrap_err(), NotFirstDayOfMonth(date));
    }

    #[rstest]
    #[case(Month::new(2021, chrono::Month::January), ymd(2021, 1, 1), ymd(2021, 1, 31))]
    #[case(Month::new(2021, chrono::Month::February), ymd(2021, 2, 1), ymd(2021, 2, 28))]
    #[case(Month::new(2020, chrono::Month::February), ymd(2020, 2, 1), ymd(2020, 2, 29))]
    #[case(Month::new(2021, chrono::Month::December), ymd(2021, 12, 1), ymd(2021, 12, 31))]
    fn test_first_last_day(
        #[case] month: Month,
        #[case] first: NaiveDate,
        #[case] last: NaiveDate,
    ) {
        assert_eq!(month.first_day(), first);
        assert_eq!(month.last_day(), last);
    }

    #[rstest]
    #[case(Month::new(2021, chrono::Month::January), 1, Month::new(2021, chrono::Month::February))]
    #[case(Month::new(2021, chrono::Month::December), 1, Month::new(2022, chrono::Month::January))]
    #[case(Month::new(2021, chrono::Month::January), 12, Month::new(2022, chrono::Month::January))]
    #[case(Month::new(2021, chrono::Month::January), -1, Month::new(2020, chrono::Month::December))]
    #[case(Month::new(2021, chrono::Month::June), -18, Month::new(2019, chrono::Month::December))]
    #[case(Month::new(2021, chrono::Month::June), 0, Month::new(2021, chrono::Month::June))]
    fn test_plus_months(#[case] month: Month, #[case] n: i64, #[case] expected: Month) {
        assert_eq!(month.plus_months(n), expected);
    }

    #[test]
    fn test_until() {
        let jan = Month::new(2021, chrono::Month::January);
        let mar = Month::new(2021, chrono::Month::March);

        let months: Vec<_> = jan.until(mar).collect();

        assert_eq!(
            months,
            vec![jan, Month::new(2021, chrono::Month::February)]
        );
    }

    #[test]
    fn test_until_empty() {
        let jan = Month::new(2021, chrono::Month::January);
        let mar = Month::new(2021, chrono::Month::March);

        assert_eq!(mar.until(jan).count(), 0);
        assert_eq!(jan.until(jan).count(), 0);
    }

    #[test]
    fn test_until_across_years() {
        let nov = Month::new(2021, chrono::Month::November);
        let feb = Month::new(2022, chrono::Month::February);

        let iter = nov.until(feb);

        assert_eq!(iter.len(), 3);
        assert_eq!(
            iter.collect::<Vec<_>>(),
            vec![
                nov,
                Month::new(2021, chrono::Month::December),
                Month::new(2022, chrono::Month::January),
            ]
        );
    }

    #[test]
    fn test_as_period() {
        let tested = Month::new(2021, chrono::Month::February).as_period();

        assert_eq!(tested.from_date(), ymd(2021, 2, 1));
        assert_eq!(tested.to_date(), ymd(2021, 2, 28));
    }

    #[test]
    fn test_ord() {
        let mut months = vec![
            Month::new(2022, chrono::Month::January),
            Month::new(2021, chrono::Month::March),
            Month::new(2021, chrono::Month::January),
        ];
        months.sort();

        assert_eq!(
            months,
            vec![
                Month::new(2021, chrono::Month::January),
                Month::new(2021, chrono::Month::March),
                Month::new(2022, chrono::Month::January),
            ]
        );
    }

    #[rstest]
    #[case(Month::new(2021, chrono::Month::January), "2021-01")]
    #[case(Month::new(2021, chrono::Month::December), "2021-12")]
    #[case(Month::new(987, chrono::Month::June), "0987-06")]
    fn test_display(#[case] month: Month, #[case] expected: &str) {
        assert_eq!(month.to_string(), expected);
    }

    #[rstest]
    #[case("2021-01", Some(Month::new(2021, chrono::Month::January)))]
    #[case("2021-12", Some(Month::new(2021, chrono::Month::December)))]
    #[case("0987-06", Some(Month::new(987, chrono::Month::June)))]
    #[case("2021-13", None)]
    #[case("2021-00", None)]
    #[case("2021-1", None)]
    #[case("2021-001", None)]
    #[case("202101", None)]
    #[case("21-01", None)]
    #[case("2021/01", None)]
    #[case(" 2021-01", None)]
    #[case("2021-01 ", None)]
    #[case("", None)]
    #[case("jan 2021", None)]
    fn test_from_str(#[case] s: &str, #[case] expected: Option<Month>) {
        let parsed = Month::from_str(s);

        match expected {
            Some(month) => assert_eq!(parsed.unwrap(), month),
            None => assert_eq!(parsed.unwrap_err(), ParseMonthError(s.to_owned())),
        }
    }

    #[test]
    fn test_serialize() {
        let ser = serde_json::to_value(Month::new(2021, chrono::Month::May)).unwrap();

        assert_eq!(ser, serde_json::json!("2021-05"));
    }

    #[test]
    fn test_deserialize() {
        let de: Month = serde_json::from_value(serde_json::json!("2021-05")).unwrap();

        assert_eq!(de, Month::new(2021, chrono::Month::May));

        let de: Result<Month, _> = serde_json::from_value(serde_json::json!("2021-5"));

        assert!(de.is_err());
    }
}

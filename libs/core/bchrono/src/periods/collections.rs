use std::ops::Deref;

use bcollections::non_empty::NonEmpty;
use itertools::Itertools;

use crate::period::Period;

use super::{
    has_overlapping,
    view::{NonEmptyPeriodsView, PeriodsView},
};

// -----------------------------------------------------------------------------
// InvalidPeriods
// -----------------------------------------------------------------------------
/// Violation of a precondition claimed by one of the strict collection
/// constructors.
///
/// This signals a programmer error: the caller asserted an invariant it did
/// not verify. Ordinary unvalidated input belongs in [`Periods::new`], which
/// classifies instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidPeriods {
    #[error("periods are not sorted by from date: {1} follows {0}")]
    Unsorted(Period, Period),
    #[error("periods {0} and {1} overlap")]
    Overlapping(Period, Period),
    #[error("adjacent periods {0} and {1} are not merged")]
    UnmergedAdjacent(Period, Period),
    #[error("an overlapping collection requires at least two periods, got {0}")]
    NotEnoughPeriods(usize),
    #[error("no overlapping pair among the periods")]
    NoOverlap,
}

// -----------------------------------------------------------------------------
// EmptyPeriods
// -----------------------------------------------------------------------------
/// The collection of zero periods.
///
/// Satisfies every stronger guarantee vacuously and is returned by every
/// constructor in the hierarchy when given an empty input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EmptyPeriods;

impl PeriodsView for EmptyPeriods {
    #[inline]
    fn periods(&self) -> &[Period] {
        &[]
    }
}

// -----------------------------------------------------------------------------
// OverlappingPeriods
// -----------------------------------------------------------------------------
/// At least two periods of which at least one pair overlaps, in insertion
/// order.
///
/// This type exists for timeline-style views where overlap is the expected
/// and meaningful state. Non-overlapping input is rejected; such data belongs
/// in [`DisjointPeriods`] or [`MergedPeriods`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlappingPeriods(NonEmpty<Period>);

impl OverlappingPeriods {
    /// Wrap periods known to contain an overlapping pair.
    ///
    /// # Errors
    /// - [`InvalidPeriods::NotEnoughPeriods`] for fewer than two periods
    /// - [`InvalidPeriods::NoOverlap`] when no pair of periods overlaps
    pub fn new(periods: Vec<Period>) -> Result<Self, InvalidPeriods> {
        if periods.len() < 2 {
            return Err(InvalidPeriods::NotEnoughPeriods(periods.len()));
        }
        if !has_overlapping(&periods) {
            return Err(InvalidPeriods::NoOverlap);
        }
        Ok(Self::unchecked(periods))
    }

    pub(crate) fn unchecked(periods: Vec<Period>) -> Self {
        Self(NonEmpty::new(periods).expect("at least one period"))
    }

    /// Get the inner periods.
    #[inline]
    pub fn into_vec(self) -> Vec<Period> {
        self.0.into_vec()
    }
}

impl PeriodsView for OverlappingPeriods {
    #[inline]
    fn periods(&self) -> &[Period] {
        self.0.as_slice()
    }
}

impl NonEmptyPeriodsView for OverlappingPeriods {}

// -----------------------------------------------------------------------------
// DisjointPeriods
// -----------------------------------------------------------------------------
/// Periods sorted by from date and pairwise non-overlapping.
///
/// Adjacent members may remain unmerged, e.g. January and February kept as
/// two entries even though they touch; [`MergedPeriods`] additionally rules
/// that out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisjointPeriods(NonEmpty<Period>);

impl DisjointPeriods {
    /// Wrap periods that are already sorted and non-overlapping.
    ///
    /// This constructor is for already-known-good data, not a normalizer:
    /// input violating the stated precondition is an error, never coerced.
    /// Construction yields the strongest truthful variant, so already-minimal
    /// input comes back as [`Periods::Merged`] and empty input as
    /// [`Periods::Empty`].
    ///
    /// # Errors
    /// - [`InvalidPeriods::Unsorted`] when the periods are not sorted by from date
    /// - [`InvalidPeriods::Overlapping`] when two periods overlap
    pub fn new(periods: Vec<Period>) -> Result<Periods, InvalidPeriods> {
        if periods.is_empty() {
            return Ok(Periods::Empty(EmptyPeriods));
        }
        validate_disjoint(&periods)?;
        if is_minimal(&periods) {
            Ok(Periods::Merged(MergedPeriods::unchecked(periods)))
        } else {
            Ok(Periods::Disjoint(Self::unchecked(periods)))
        }
    }

    pub(crate) fn unchecked(periods: Vec<Period>) -> Self {
        Self(NonEmpty::new(periods).expect("at least one period"))
    }

    /// Get the inner periods.
    #[inline]
    pub fn into_vec(self) -> Vec<Period> {
        self.0.into_vec()
    }
}

impl PeriodsView for DisjointPeriods {
    #[inline]
    fn periods(&self) -> &[Period] {
        self.0.as_slice()
    }
}

impl NonEmptyPeriodsView for DisjointPeriods {}

// -----------------------------------------------------------------------------
// MergedPeriods
// -----------------------------------------------------------------------------
/// Sorted, non-overlapping periods in minimal form: no two members touch.
///
/// This is the canonical normal form produced by
/// [`merge_minimal`](super::merge_minimal); every [`DisjointPeriods`]
/// guarantee holds here as well, see [`MergedPeriods::as_disjoint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergedPeriods(DisjointPeriods);

impl MergedPeriods {
    /// Wrap periods that are already sorted, non-overlapping and minimal.
    ///
    /// Construction yields the strongest truthful variant; empty input comes
    /// back as [`Periods::Empty`].
    ///
    /// # Errors
    /// - [`InvalidPeriods::Unsorted`] when the periods are not sorted by from date
    /// - [`InvalidPeriods::Overlapping`] when two periods overlap
    /// - [`InvalidPeriods::UnmergedAdjacent`] when two adjacent periods could
    ///   still be merged
    pub fn new(periods: Vec<Period>) -> Result<Periods, InvalidPeriods> {
        if periods.is_empty() {
            return Ok(Periods::Empty(EmptyPeriods));
        }
        validate_disjoint(&periods)?;
        if let Some((a, b)) = periods.iter().tuple_windows().find(|(a, b)| a.touches(**b)) {
            return Err(InvalidPeriods::UnmergedAdjacent(*a, *b));
        }
        Ok(Periods::Merged(Self::unchecked(periods)))
    }

    pub(crate) fn unchecked(periods: Vec<Period>) -> Self {
        Self(DisjointPeriods::unchecked(periods))
    }

    /// View this collection under its weaker guarantee.
    #[inline]
    pub fn as_disjoint(&self) -> &DisjointPeriods {
        &self.0
    }

    /// Discard the minimality guarantee.
    #[inline]
    pub fn into_disjoint(self) -> DisjointPeriods {
        self.0
    }

    /// Get the inner periods.
    #[inline]
    pub fn into_vec(self) -> Vec<Period> {
        self.0.into_vec()
    }
}

impl PeriodsView for MergedPeriods {
    #[inline]
    fn periods(&self) -> &[Period] {
        self.0.periods()
    }
}

impl NonEmptyPeriodsView for MergedPeriods {}

// -----------------------------------------------------------------------------
// Periods
// -----------------------------------------------------------------------------
/// A collection of periods tagged with the strongest guarantee it satisfies.
///
/// [`Periods::new`] is the "I don't know what I have" entry point: it
/// classifies any input and never fails. Code that can already prove a
/// stronger invariant uses the strict constructors on the variant types
/// instead.
///
/// # Example
/// ```
/// use bchrono::period::Month;
/// use bchrono::periods::Periods;
///
/// let month = |m| Month::new(2021, m).as_period();
///
/// let jan = month(chrono::Month::January);
/// let feb = month(chrono::Month::February);
///
/// assert!(matches!(Periods::new(vec![]), Periods::Empty(_)));
/// assert!(matches!(Periods::new(vec![jan]), Periods::Merged(_)));
/// // adjacent but unmerged periods keep their shape
/// assert!(matches!(Periods::new(vec![jan, feb]), Periods::Disjoint(_)));
/// assert!(matches!(Periods::new(vec![jan, jan]), Periods::Overlapping(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Periods {
    Empty(EmptyPeriods),
    Overlapping(OverlappingPeriods),
    Disjoint(DisjointPeriods),
    Merged(MergedPeriods),
}

//
// ctors
//
impl Periods {
    /// Classify any bag of periods into the strongest truthful variant.
    ///
    /// Overlapping input keeps its insertion order; non-overlapping input is
    /// sorted. No merging happens here: adjacent-but-unmerged input comes
    /// back as [`Periods::Disjoint`], and normalization is requested
    /// explicitly through [`merge_minimal`](super::merge_minimal).
    pub fn new(periods: impl IntoIterator<Item = Period>) -> Periods {
        let mut periods: Vec<Period> = periods.into_iter().collect();
        if periods.is_empty() {
            return Periods::Empty(EmptyPeriods);
        }
        if has_overlapping(&periods) {
            return Periods::Overlapping(OverlappingPeriods::unchecked(periods));
        }
        periods.sort();
        if is_minimal(&periods) {
            Periods::Merged(MergedPeriods::unchecked(periods))
        } else {
            Periods::Disjoint(DisjointPeriods::unchecked(periods))
        }
    }

    /// The empty collection.
    #[inline]
    pub fn empty() -> Periods {
        Periods::Empty(EmptyPeriods)
    }
}

//
// ser/de
//
impl serde::Serialize for Periods {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.periods())
    }
}

impl<'de> serde::Deserialize<'de> for Periods {
    fn deserialize<D>(deserializer: D) -> Result<Periods, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let periods = Vec::<Period>::deserialize(deserializer)?;
        Ok(Periods::new(periods))
    }
}

impl schemars::JsonSchema for Periods {
    fn schema_name() -> String {
        "Periods".to_string()
    }
    fn schema_id() -> std::borrow::Cow<'static, str> {
        "bchrono::periods::Periods".into()
    }
    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<Period> as schemars::JsonSchema>::json_schema(gen)
    }
}

//
// methods
//
impl Periods {
    /// Get the inner periods.
    pub fn into_vec(self) -> Vec<Period> {
        match self {
            Periods::Empty(_) => Vec::new(),
            Periods::Overlapping(p) => p.into_vec(),
            Periods::Disjoint(p) => p.into_vec(),
            Periods::Merged(p) => p.into_vec(),
        }
    }
}

impl PeriodsView for Periods {
    fn periods(&self) -> &[Period] {
        match self {
            Periods::Empty(p) => p.periods(),
            Periods::Overlapping(p) => p.periods(),
            Periods::Disjoint(p) => p.periods(),
            Periods::Merged(p) => p.periods(),
        }
    }
}

//
// sequence access
//
macro_rules! impl_sequence_access {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Deref for $ty {
                type Target = [Period];

                #[inline]
                fn deref(&self) -> &[Period] {
                    self.periods()
                }
            }

            impl<'a> IntoIterator for &'a $ty {
                type Item = &'a Period;
                type IntoIter = std::slice::Iter<'a, Period>;

                #[inline]
                fn into_iter(self) -> Self::IntoIter {
                    self.periods().iter()
                }
            }
        )*
    };
}

impl_sequence_access!(
    EmptyPeriods,
    OverlappingPeriods,
    DisjointPeriods,
    MergedPeriods,
    Periods,
);

//
// validation
//
fn validate_disjoint(periods: &[Period]) -> Result<(), InvalidPeriods> {
    for (a, b) in periods.iter().tuple_windows() {
        if b.from_date() < a.from_date() {
            return Err(InvalidPeriods::Unsorted(*a, *b));
        }
        if a.overlaps(*b) {
            return Err(InvalidPeriods::Overlapping(*a, *b));
        }
    }
    Ok(())
}

/// Minimality check. Only meaningful for input that is already sorted and
/// non-overlapping: there, mergeable pairs can only be consecutive.
fn is_minimal(periods: &[Period]) -> bool {
    periods.iter().tuple_windows().all(|(a, b)| !a.touches(*b))
}

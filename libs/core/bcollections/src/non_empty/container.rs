use std::{
    borrow::Borrow,
    ops::{Deref, Index},
};

use super::EmptyError;

// -----------------------------------------------------------------------------
// NonEmpty
// -----------------------------------------------------------------------------
/// A thin wrapper which guarantees that the inner vector holds at least one element.
///
/// This struct implements [`Deref`], [`Borrow`], and [`AsRef`] to access the inner
/// data immutablely. To prevent changing the length of the inner data, this struct
/// does not expose the inner vector as a mutable reference. Hence, [`NonEmpty::first`]
/// and [`NonEmpty::last`] can return references without [`Option`].
///
/// # Example
/// ```
/// use bcollections::non_empty::{NonEmpty, RequireNonEmpty};
///
/// let data: NonEmpty<usize> = vec![1, 2, 3].require_non_empty().unwrap();
///
/// assert_eq!(data.first(), &1);
/// assert_eq!(data.last(), &3);
/// assert_eq!(data.len(), 3);
///
/// assert!(Vec::<usize>::new().require_non_empty().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmpty<T>(Vec<T>);

//
// ctors
//
impl<T> NonEmpty<T> {
    /// Construct a new instance.
    /// If the given vector is empty, it returns an error.
    #[inline]
    pub fn new(data: Vec<T>) -> Result<Self, EmptyError> {
        if data.is_empty() {
            Err(EmptyError)
        } else {
            Ok(Self(data))
        }
    }

    /// Construct an instance holding exactly one element.
    #[inline]
    pub fn singleton(head: T) -> Self {
        Self(vec![head])
    }
}

pub trait RequireNonEmpty<T>: Sized {
    fn require_non_empty(self) -> Result<NonEmpty<T>, EmptyError>;
}

impl<T> RequireNonEmpty<T> for Vec<T> {
    #[inline]
    fn require_non_empty(self) -> Result<NonEmpty<T>, EmptyError> {
        NonEmpty::new(self)
    }
}

//
// ser/de
//
impl<T> std::fmt::Display for NonEmpty<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut iter = self.0.iter();
        write!(f, "{}", iter.next().expect("non-empty by construction"))?;
        for item in iter {
            write!(f, ", {}", item)?;
        }
        Ok(())
    }
}

impl<T> serde::Serialize for NonEmpty<T>
where
    T: serde::Serialize,
{
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T> serde::Deserialize<'de> for NonEmpty<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<NonEmpty<T>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Vec::<T>::deserialize(deserializer)?;
        NonEmpty::new(data).map_err(serde::de::Error::custom)
    }
}

impl<T> schemars::JsonSchema for NonEmpty<T>
where
    T: schemars::JsonSchema,
{
    fn schema_name() -> String {
        format!("NonEmpty_for_{}", T::schema_name())
    }

    fn schema_id() -> std::borrow::Cow<'static, str> {
        format!("bcollections::NonEmpty<{}>", T::schema_name()).into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        let res = <Vec<T> as schemars::JsonSchema>::json_schema(gen);
        let schemars::schema::Schema::Object(mut obj) = res else {
            return res;
        };
        obj.array().min_items = Some(1);
        schemars::schema::Schema::Object(obj)
    }
}

//
// methods
//
impl<T> Deref for NonEmpty<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> Borrow<[T]> for NonEmpty<T> {
    #[inline]
    fn borrow(&self) -> &[T] {
        &self.0
    }
}

impl<T> AsRef<[T]> for NonEmpty<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T> IntoIterator for NonEmpty<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a NonEmpty<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T> Index<usize> for NonEmpty<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T> NonEmpty<T> {
    /// Get the inner data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Get the inner data.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    /// Get the first element.
    #[inline]
    pub fn first(&self) -> &T {
        self.0.first().expect("non-empty by construction")
    }

    /// Get the last element.
    #[inline]
    pub fn last(&self) -> &T {
        self.0.last().expect("non-empty by construction")
    }

    /// Apply a function to every element, preserving the length guarantee.
    #[inline]
    pub fn map<U, F>(self, f: F) -> NonEmpty<U>
    where
        F: FnMut(T) -> U,
    {
        NonEmpty(self.0.into_iter().map(f).collect())
    }
}

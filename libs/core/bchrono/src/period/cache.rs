use std::sync::OnceLock;

use super::Month;

// -----------------------------------------------------------------------------
// MonthCache
// -----------------------------------------------------------------------------
/// Interning cache for [`Month`] values, keyed by year and month number.
///
/// The cache is populated lazily; a race to insert the same key is harmless
/// since every insert for a key produces a structurally equal value. It never
/// evicts: the set of distinct calendar months a process touches is bounded by
/// the years the system operates over.
///
/// [`Month`] constructors resolve through the process-wide instance returned
/// by [`month_cache`]. Tests which need isolation construct their own
/// instance instead of touching the shared one.
pub struct MonthCache {
    inner: moka::sync::Cache<(i32, u32), Month>,
}

impl std::fmt::Debug for MonthCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonthCache").finish_non_exhaustive()
    }
}

//
// ctors
//
impl MonthCache {
    /// Create an empty cache.
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: moka::sync::Cache::builder().build(),
        }
    }
}

impl Default for MonthCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

//
// methods
//
impl MonthCache {
    /// Get the month for the given year and month number, inserting it on
    /// first access.
    ///
    /// The month number must already be validated to `1..=12` by the caller.
    #[inline]
    pub(crate) fn resolve(&self, year: i32, month: u32) -> Month {
        self.inner
            .get_with((year, month), || Month::raw(year, month))
    }

    /// Number of months interned so far.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

/// The process-wide [`MonthCache`], created on first use and shared for the
/// lifetime of the process.
pub fn month_cache() -> &'static MonthCache {
    static CACHE: OnceLock<MonthCache> = OnceLock::new();
    CACHE.get_or_init(MonthCache::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_idempotent() {
        let cache = MonthCache::new();

        let a = cache.resolve(2021, 1);
        let b = cache.resolve(2021, 1);

        assert_eq!(a, b);
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_resolve_distinct_keys() {
        let cache = MonthCache::new();

        let jan = cache.resolve(2021, 1);
        let feb = cache.resolve(2021, 2);
        let jan_next_year = cache.resolve(2022, 1);

        assert_ne!(jan, feb);
        assert_ne!(jan, jan_next_year);
        assert_eq!(cache.entry_count(), 3);
    }

    #[test]
    fn test_isolated_instances_agree() {
        let a = MonthCache::new();
        let b = MonthCache::new();

        assert_eq!(a.resolve(2021, 6), b.resolve(2021, 6));
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(month_cache(), month_cache()));
    }
}

//! Calendar-period algebra for benefit computations.
//!
//! The building blocks are, leaves first:
//! - [`interval::DateInterval`]: a closed date interval without alignment requirements
//! - [`period::Period`]: a date interval aligned to calendar month boundaries
//! - [`period::Month`]: a period spanning exactly one calendar month, interned
//!   through a process-wide cache
//! - [`periods`]: collections of periods with progressively stronger structural
//!   guarantees, and the merge/set algorithms defined on their month decomposition

pub mod interval;
pub mod period;
pub mod periods;

// `rstest_reuse` templates expand to code that references the macro crate at the
// root of this crate, so it must be in scope there for the test build.
#[cfg(test)]
#[allow(unused_imports)]
use rstest_reuse::{self};

//! Container wrappers which carry structural guarantees at type level.

pub mod non_empty;

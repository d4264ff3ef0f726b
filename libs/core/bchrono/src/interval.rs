mod date_interval;

pub use date_interval::{CannotMerge, DateInterval};

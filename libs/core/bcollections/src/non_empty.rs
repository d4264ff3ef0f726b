mod container;
mod error;

pub use container::{NonEmpty, RequireNonEmpty};
pub use error::EmptyError;

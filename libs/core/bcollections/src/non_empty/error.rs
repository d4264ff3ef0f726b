// -----------------------------------------------------------------------------
// EmptyError
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, thiserror::Error)]
#[error("at least one element is required")]
pub struct EmptyError;

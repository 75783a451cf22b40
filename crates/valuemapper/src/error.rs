use thiserror::Error;

/// Errors surfaced to the caller of a mapping operation.
///
/// Only two conditions are fatal: a missing argument and text that names no member of the
/// destination enum. Every other conversion problem is recovered inside the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
  #[error("argument `{argument}` must not be null")]
  NullArgument { argument: &'static str },
  #[error("`{value}` is not a member of enum `{enum_name}`")]
  UnknownEnumMember {
    enum_name: &'static str,
    value: String,
  },
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Failure of a single conversion step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
  /// Propagated to the caller unchanged.
  #[error(transparent)]
  Fatal(#[from] MapError),
  #[error("value does not fit in `{target}`")]
  Overflow { target: &'static str },
  #[error("cannot parse `{text}` as `{target}`")]
  Parse { text: String, target: &'static str },
  #[error("cannot convert {found} to `{target}`")]
  Incompatible {
    found: &'static str,
    target: &'static str,
  },
}

impl ConversionError {
  pub fn is_fatal(&self) -> bool {
    matches!(self, ConversionError::Fatal(_))
  }
}

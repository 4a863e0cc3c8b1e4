//! Error types for `sitter-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed resource reference: {0:?}")]
  MalformedResourceRef(String),

  #[error("unknown account kind: {0:?}")]
  UnknownAccountKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

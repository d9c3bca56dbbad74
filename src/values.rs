//! Stored value parsing

use thiserror::Error;

/// A stored or submitted label did not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownValueError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,

    /// The rejected input.
    pub value: String,
}

impl UnknownValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

use alloc::{boxed::Box, string::String, vec::Vec};

use super::{InstantiateErrorKind, InvalidConfigErrorKind};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigErrorKind),
    #[error("Circular reference to \"{id}\" detected while building: {}", .stack.join(","))]
    CircularReference { id: String, stack: Vec<String> },
    #[error("No entry was found in container for \"{id}\"")]
    NotFound {
        id: String,
        #[source]
        source: Box<ResolveErrorKind>,
    },
    #[error("Instantiation of \"{id}\" failed")]
    Factory {
        id: String,
        #[source]
        source: InstantiateErrorKind,
    },
    #[error("Incorrect type of \"{id}\". Expected: {expected}")]
    IncorrectType { id: String, expected: &'static str },
}

impl ResolveErrorKind {
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_circular_reference(&self) -> bool {
        matches!(self, Self::CircularReference { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}

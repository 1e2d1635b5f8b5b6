use alloc::{boxed::Box, string::String};

use super::ResolveErrorKind;

/// Failure raised by user code: constructors, factories, methods and property setters
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument `{name}` not found")]
    NoArgument { name: String },
    #[error("Incorrect type of argument `{name}`. Expected: {expected}")]
    IncorrectType { name: String, expected: &'static str },
    #[error("Receiver is not of type {expected}")]
    IncorrectReceiver { expected: &'static str },
    #[error("Container was dropped")]
    ContainerDropped,
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}

impl InstantiateErrorKind {
    /// Container failures raised inside user code keep their original kind,
    /// everything else is reported as a failure of `id`
    #[must_use]
    pub(crate) fn into_resolve(self, id: &str) -> ResolveErrorKind {
        match self {
            Self::Resolve(err) => *err,
            err => ResolveErrorKind::Factory {
                id: id.into(),
                source: err,
            },
        }
    }
}

use alloc::{sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::Instance,
    arguments::ResolvedArgs,
    errors::InstantiateErrorKind,
    parameter::Parameter,
};

type CallableFn = dyn Fn(ResolvedArgs) -> Result<Instance, InstantiateErrorKind> + Send + Sync;

/// A function together with the description of its parameters.
/// Used for factory bindings and lazy values.
#[derive(Clone)]
pub struct Callable {
    parameters: Arc<[Parameter]>,
    body: Arc<CallableFn>,
}

impl Callable {
    #[must_use]
    pub fn new<F, T, E>(parameters: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(ResolvedArgs) -> Result<T, E> + Send + Sync + 'static,
        T: Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        Self::raw(parameters, move |args| match body(args) {
            Ok(value) => Ok(Arc::new(value) as Instance),
            Err(err) => Err(err.into()),
        })
    }

    /// Creates callable which body returns an already shared instance
    #[must_use]
    pub fn raw<F>(parameters: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(ResolvedArgs) -> Result<Instance, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            parameters: parameters.into(),
            body: Arc::new(body),
        }
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    pub(crate) fn call(&self, args: ResolvedArgs) -> Result<Instance, InstantiateErrorKind> {
        (self.body)(args)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("parameters", &self.parameters).finish_non_exhaustive()
    }
}

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{errors::ResolveErrorKind, Container};

/// Registers a batch of bindings into a container
pub trait ServiceProvider: Send + Sync {
    /// # Errors
    /// Errors are propagated to the caller of [`Container::provide`], or to the caller of the build
    /// that triggered a deferred registration
    fn register(&self, container: &Container) -> Result<(), ResolveErrorKind>;
}

/// Provider whose registration is postponed until one of the identifiers it provides is requested
pub trait DeferredServiceProvider: ServiceProvider {
    fn provides(&self) -> Vec<String>;
}

#[derive(Clone)]
pub enum Provider {
    Eager(Arc<dyn ServiceProvider>),
    Deferred(Arc<dyn DeferredServiceProvider>),
}

impl Provider {
    #[inline]
    #[must_use]
    pub fn eager(provider: impl ServiceProvider + 'static) -> Self {
        Self::Eager(Arc::new(provider))
    }

    #[inline]
    #[must_use]
    pub fn deferred(provider: impl DeferredServiceProvider + 'static) -> Self {
        Self::Deferred(Arc::new(provider))
    }
}

impl Debug for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(_) => f.write_str("Provider::Eager"),
            Self::Deferred(provider) => f.debug_tuple("Provider::Deferred").field(&provider.provides()).finish(),
        }
    }
}

/// Provider given directly or by the identifier of a type that builds into a [`Provider`]
#[derive(Clone, Debug)]
pub enum ProviderSource {
    Provider(Provider),
    Id(String),
}

impl From<Provider> for ProviderSource {
    #[inline]
    fn from(provider: Provider) -> Self {
        Self::Provider(provider)
    }
}

impl From<&str> for ProviderSource {
    #[inline]
    fn from(id: &str) -> Self {
        Self::Id(id.into())
    }
}

impl From<String> for ProviderSource {
    #[inline]
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// Identity of a deferred provider, independent of the trait object's vtable
#[inline]
#[must_use]
pub(crate) fn same_provider(a: &Arc<dyn DeferredServiceProvider>, b: &Arc<dyn DeferredServiceProvider>) -> bool {
    core::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

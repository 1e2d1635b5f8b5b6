use alloc::{string::String, vec::Vec};

use crate::{provider::ProviderSource, registry::Concrete};

/// Construction-time configuration of a container.
/// ## Fields
/// - `bindings`:
///   Applied in order with [`crate::Container::bind`], so the last binding for an identifier wins.
/// - `providers`:
///   Added with [`crate::Container::provide`] after all bindings.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub bindings: Vec<(String, Concrete)>,
    pub providers: Vec<ProviderSource>,
}

impl Config {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn bind(mut self, id: impl Into<String>, concrete: impl Into<Concrete>) -> Self {
        self.bindings.push((id.into(), concrete.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn provide(mut self, provider: impl Into<ProviderSource>) -> Self {
        self.providers.push(provider.into());
        self
    }
}

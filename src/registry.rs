use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::{instance, Instance},
    callable::Callable,
    definition::Definition,
    provider::{same_provider, DeferredServiceProvider},
};

/// Construction strategy registered for an identifier
#[derive(Clone)]
pub enum Concrete {
    /// Another identifier: a binding one extra hop away, or a type to build
    Alias(String),
    Instance(Instance),
    Factory(Callable),
    Definition(Definition),
    Deferred(Arc<dyn DeferredServiceProvider>),
}

impl Concrete {
    #[inline]
    #[must_use]
    pub fn alias(id: impl Into<String>) -> Self {
        Self::Alias(id.into())
    }

    #[inline]
    #[must_use]
    pub fn instance<T: Send + Sync + 'static>(val: T) -> Self {
        Self::Instance(instance(val))
    }
}

impl From<&str> for Concrete {
    #[inline]
    fn from(id: &str) -> Self {
        Self::Alias(id.into())
    }
}

impl From<String> for Concrete {
    #[inline]
    fn from(id: String) -> Self {
        Self::Alias(id)
    }
}

impl From<Instance> for Concrete {
    #[inline]
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<Callable> for Concrete {
    #[inline]
    fn from(callable: Callable) -> Self {
        Self::Factory(callable)
    }
}

impl From<Definition> for Concrete {
    #[inline]
    fn from(definition: Definition) -> Self {
        Self::Definition(definition)
    }
}

impl Debug for Concrete {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias(id) => f.debug_tuple("Alias").field(id).finish(),
            Self::Instance(_) => f.write_str("Instance"),
            Self::Factory(callable) => f.debug_tuple("Factory").field(callable).finish(),
            Self::Definition(definition) => f.debug_tuple("Definition").field(definition).finish(),
            Self::Deferred(provider) => f.debug_tuple("Deferred").field(&provider.provides()).finish(),
        }
    }
}

#[derive(Default)]
pub(crate) struct Bindings {
    map: BTreeMap<String, Concrete>,
    uncached: BTreeSet<String>,
}

impl Bindings {
    #[inline]
    pub(crate) fn insert(&mut self, id: String, concrete: Concrete) -> Option<Concrete> {
        self.uncached.remove(&id);
        self.map.insert(id, concrete)
    }

    /// Binds a factory whose result mustn't be kept in the instance cache
    #[inline]
    pub(crate) fn insert_uncached(&mut self, id: String, concrete: Concrete) {
        self.uncached.insert(id.clone());
        self.map.insert(id, concrete);
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_cacheable(&self, id: &str) -> bool {
        !self.uncached.contains(id)
    }

    /// Strategy for `id` and whether its result may be cached.
    /// Unbound identifiers are bound to themselves.
    /// An alias to another bound identifier is followed once, never further,
    /// and the result isn't cacheable if either identifier is uncached.
    #[must_use]
    pub(crate) fn concrete(&self, id: &str) -> (Concrete, bool) {
        match self.map.get(id) {
            None => (Concrete::Alias(id.into()), true),
            Some(Concrete::Alias(next)) if next != id => match self.map.get(next) {
                Some(concrete) => (concrete.clone(), self.is_cacheable(id) && self.is_cacheable(next)),
                None => (Concrete::Alias(next.clone()), self.is_cacheable(id)),
            },
            Some(concrete) => (concrete.clone(), self.is_cacheable(id)),
        }
    }

    /// Removes every binding still pointing at `provider`, returns their identifiers
    pub(crate) fn discard_provider(&mut self, provider: &Arc<dyn DeferredServiceProvider>) -> Vec<String> {
        let ids: Vec<String> = self
            .map
            .iter()
            .filter_map(|(id, concrete)| match concrete {
                Concrete::Deferred(bound) if same_provider(bound, provider) => Some(id.clone()),
                _ => None,
            })
            .collect();
        for id in &ids {
            self.map.remove(id);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::{Bindings, Concrete};
    use crate::{
        errors::ResolveErrorKind,
        provider::{DeferredServiceProvider, ServiceProvider},
        Container,
    };

    use alloc::{string::String, sync::Arc, vec, vec::Vec};

    struct NoopProvider;

    impl ServiceProvider for NoopProvider {
        fn register(&self, _container: &Container) -> Result<(), ResolveErrorKind> {
            Ok(())
        }
    }

    impl DeferredServiceProvider for NoopProvider {
        fn provides(&self) -> Vec<String> {
            vec![String::from("a"), String::from("b")]
        }
    }

    #[test]
    fn test_self_binding_fallback() {
        let bindings = Bindings::default();
        assert!(matches!(bindings.concrete("Widget"), (Concrete::Alias(id), true) if id == "Widget"));
    }

    #[test]
    fn test_alias_followed_once() {
        let mut bindings = Bindings::default();
        bindings.insert(String::from("a"), Concrete::alias("b"));
        bindings.insert(String::from("b"), Concrete::alias("c"));
        bindings.insert(String::from("c"), Concrete::instance(1u8));

        assert!(matches!(bindings.concrete("a"), (Concrete::Alias(id), true) if id == "c"));
        assert!(matches!(bindings.concrete("b"), (Concrete::Instance(_), true)));
        assert!(matches!(bindings.concrete("d"), (Concrete::Alias(id), true) if id == "d"));
    }

    #[test]
    fn test_discard_provider() {
        let provider: Arc<dyn DeferredServiceProvider> = Arc::new(NoopProvider);
        let other: Arc<dyn DeferredServiceProvider> = Arc::new(NoopProvider);

        let mut bindings = Bindings::default();
        bindings.insert(String::from("a"), Concrete::Deferred(provider.clone()));
        bindings.insert(String::from("b"), Concrete::Deferred(provider.clone()));
        bindings.insert(String::from("c"), Concrete::Deferred(other));

        assert_eq!(bindings.discard_provider(&provider), vec![String::from("a"), String::from("b")]);
        assert!(!bindings.contains("a"));
        assert!(!bindings.contains("b"));
        assert!(bindings.contains("c"));
    }

    #[test]
    fn test_rebind_makes_cacheable() {
        let mut bindings = Bindings::default();
        bindings.insert_uncached(String::from("a"), Concrete::instance(1u8));
        assert!(!bindings.is_cacheable("a"));

        bindings.insert(String::from("a"), Concrete::instance(2u8));
        assert!(bindings.is_cacheable("a"));
    }

    #[test]
    fn test_alias_to_uncached() {
        let mut bindings = Bindings::default();
        bindings.insert_uncached(String::from("self"), Concrete::instance(1u8));
        bindings.insert(String::from("app"), Concrete::alias("self"));

        assert!(matches!(bindings.concrete("app"), (Concrete::Instance(_), false)));
        assert!(matches!(bindings.concrete("self"), (Concrete::Instance(_), false)));
    }
}

use alloc::{
    boxed::Box,
    string::String,
    sync::{Arc, Weak},
    vec::Vec,
};
use core::{any::type_name, cell::RefCell};
use parking_lot::ReentrantMutex;
use tracing::{debug, error, info_span};

use crate::{
    any::{id_of, instance, Instance},
    arguments::Arguments,
    building::{BuildGuard, BuildStack},
    cache::Cache,
    callable::Callable,
    config::Config,
    errors::{InstantiateErrorKind, InvalidConfigErrorKind, ResolveErrorKind},
    injector::{Injector, Target},
    provider::{DeferredServiceProvider, Provider, ProviderSource},
    reflection::ResolutionOracle,
    registry::{Bindings, Concrete},
};

/// Binding registry and builder.
///
/// The container is a handle: clones share the same bindings, instance cache and build stack.
/// A `get` or `build` holds the container's reentrant lock for its whole duration,
/// so nested builds on the same thread proceed and builds from other threads wait.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Container {
    /// Creates container consulting `oracle` about types.
    /// The container binds itself and an [`Injector`] for itself under their type identifiers.
    #[inline]
    #[must_use]
    pub fn new(oracle: impl ResolutionOracle + 'static) -> Self {
        Self::with_shared_oracle(Arc::new(oracle))
    }

    #[must_use]
    pub fn with_shared_oracle(oracle: Arc<dyn ResolutionOracle>) -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                state: ReentrantMutex::new(RefCell::new(State::default())),
                oracle,
            }),
        };
        container.bind_self();
        container
    }

    /// Creates container and applies `config`: bindings first, providers after them
    ///
    /// # Errors
    /// Returns the first error of [`Self::provide`]
    pub fn with_config(oracle: impl ResolutionOracle + 'static, config: Config) -> Result<Self, ResolveErrorKind> {
        let container = Self::new(oracle);
        let Config { bindings, providers } = config;
        for (id, concrete) in bindings {
            container.bind(id, concrete);
        }
        for provider in providers {
            container.provide(provider)?;
        }
        Ok(container)
    }

    /// Binds `id` to `concrete`, replacing the previous binding and dropping the cached instance.
    /// The shape of `concrete` isn't checked until it's built.
    pub fn bind(&self, id: impl Into<String>, concrete: impl Into<Concrete>) {
        let id = id.into();
        let concrete = concrete.into();
        debug!(id = id.as_str(), ?concrete, "Bind");

        let stale = self.with_state(|state| (state.cache.remove(&id), state.bindings.insert(id, concrete)));
        drop(stale);
    }

    /// Adds a service provider.
    /// Eager provider is registered immediately,
    /// deferred provider is bound to every identifier it provides and registered on first build of one of them.
    ///
    /// # Errors
    /// - Returns [`InvalidConfigErrorKind::NotProvider`] if the identifier doesn't build into a [`Provider`]
    /// - Propagates errors of building the provider and of its registration
    pub fn provide(&self, provider: impl Into<ProviderSource>) -> Result<(), ResolveErrorKind> {
        let span = info_span!("provide");
        let _guard = span.enter();

        let provider = match provider.into() {
            ProviderSource::Provider(provider) => provider,
            ProviderSource::Id(id) => {
                let built = self.build(&id, &Arguments::new())?;
                let Some(provider) = built.downcast_ref::<Provider>() else {
                    let err = InvalidConfigErrorKind::NotProvider { id }.into();
                    error!("{}", err);
                    return Err(err);
                };
                provider.clone()
            }
        };

        match provider {
            Provider::Eager(provider) => {
                debug!("Register provider");
                provider.register(self)
            }
            Provider::Deferred(provider) => {
                let ids = provider.provides();
                debug!(?ids, "Defer provider");
                let stale: Vec<_> = self.with_state(|state| {
                    ids.into_iter()
                        .map(|id| (state.cache.remove(&id), state.bindings.insert(id, Concrete::Deferred(provider.clone()))))
                        .collect()
                });
                drop(stale);
                Ok(())
            }
        }
    }

    /// Builds a new instance of `id` and caches it.
    ///
    /// Unbound identifiers are built as types. An alias to another bound identifier is followed once.
    /// A deferred provider is discarded from the bindings and registered, then `id` is built again.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::CircularReference`] if `id` is already being built
    /// - Propagates errors of the injector, factories and deferred providers
    pub fn build(&self, id: &str, arguments: &Arguments) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("build", id);
        let _guard = span.enter();
        let _serial = self.inner.state.lock();

        let (concrete, cacheable) = self.with_state(|state| state.bindings.concrete(id));
        let injector = self.injector();
        let instance = match concrete {
            Concrete::Deferred(provider) => return self.register_deferred(id, &provider, arguments),
            Concrete::Instance(instance) => self.guarded(id, || Ok(instance))?,
            Concrete::Factory(callable) => self.guarded(id, || injector.invoke_factory(id, &callable, arguments))?,
            Concrete::Alias(class) => self.guarded(id, || injector.build(Target::Type(&class), arguments))?,
            Concrete::Definition(definition) => self.guarded(id, || injector.build(Target::Definition(&definition), arguments))?,
        };

        if cacheable {
            let stale = self.with_state(|state| state.cache.insert(id.into(), instance.clone()));
            drop(stale);
            debug!("Cached");
        }
        Ok(instance)
    }

    /// Gets the cached instance of `id`, building it on first request.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotFound`] wrapping the build error if the container [doesn't have](Self::has) `id`
    /// - Otherwise returns the build error as is
    pub fn get(&self, id: &str) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("get", id);
        let _guard = span.enter();
        let _serial = self.inner.state.lock();

        if let Some(instance) = self.with_state(|state| state.cache.get(id)) {
            debug!("Found in cache");
            return Ok(instance);
        }
        debug!("Not found in cache");

        self.build(id, &Arguments::new()).map_err(|err| {
            if self.has(id) {
                return err;
            }
            let err = ResolveErrorKind::NotFound {
                id: id.into(),
                source: Box::new(err),
            };
            debug!("{}", err);
            err
        })
    }

    /// Gets `id` and downcasts it to `T`
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the instance isn't a `T`
    /// - Same as [`Self::get`]
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ResolveErrorKind> {
        self.get(id)?.downcast().map_err(|_| {
            let err = ResolveErrorKind::IncorrectType {
                id: id.into(),
                expected: type_name::<T>(),
            };
            error!("{}", err);
            err
        })
    }

    /// Gets a `T` bound under its [type identifier](id_of)
    ///
    /// # Errors
    /// Same as [`Self::get_as`]
    #[inline]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        self.get_as(id_of::<T>())
    }

    /// Whether `id` is bound, cached, or names a type known to exist
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.with_state(|state| state.bindings.contains(id) || state.cache.contains(id)) || self.inner.oracle.exists(id)
    }

    #[inline]
    #[must_use]
    pub fn injector(&self) -> Injector {
        Injector::new(self.clone())
    }

    #[inline]
    #[must_use]
    pub fn oracle(&self) -> &dyn ResolutionOracle {
        &*self.inner.oracle
    }

    /// Whether both handles point to the same container
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Container {
    /// Values replaced inside `f` must be returned out of it, so their `Drop` runs after the borrow ends
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let guard = self.inner.state.lock();
        let mut state = guard.borrow_mut();
        f(&mut state)
    }

    pub(crate) fn release_building(&self, id: &str) {
        let guard = self.inner.state.lock();
        // Dropped while unwinding from a panic inside `with_state`, the state is left as is
        if let Ok(mut state) = guard.try_borrow_mut() {
            state.building.remove(id);
        };
    }

    fn guarded<F>(&self, id: &str, build: F) -> Result<Instance, ResolveErrorKind>
    where
        F: FnOnce() -> Result<Instance, ResolveErrorKind>,
    {
        let _guard = BuildGuard::enter(self, id)?;
        build()
    }

    fn register_deferred(
        &self,
        id: &str,
        provider: &Arc<dyn DeferredServiceProvider>,
        arguments: &Arguments,
    ) -> Result<Instance, ResolveErrorKind> {
        let discarded = self.with_state(|state| state.bindings.discard_provider(provider));
        debug!(?discarded, "Register deferred provider");

        provider.register(self)?;
        self.build(id, arguments)
    }

    /// The factories hold the container weakly, and their results aren't cached,
    /// otherwise the container would own itself
    fn bind_self(&self) {
        let container = Arc::downgrade(&self.inner);
        let injector = container.clone();

        self.with_state(|state| {
            state.bindings.insert_uncached(
                id_of::<Container>().into(),
                Concrete::Factory(Callable::raw(Vec::new(), move |_| upgrade(&container).map(instance))),
            );
            state.bindings.insert_uncached(
                id_of::<Injector>().into(),
                Concrete::Factory(Callable::raw(Vec::new(), move |_| {
                    upgrade(&injector).map(|container| instance(Injector::new(container)))
                })),
            );
        });
    }
}

#[inline]
fn upgrade(inner: &Weak<ContainerInner>) -> Result<Container, InstantiateErrorKind> {
    inner
        .upgrade()
        .map(|inner| Container { inner })
        .ok_or(InstantiateErrorKind::ContainerDropped)
}

pub(crate) struct ContainerInner {
    state: ReentrantMutex<RefCell<State>>,
    oracle: Arc<dyn ResolutionOracle>,
}

#[derive(Default)]
pub(crate) struct State {
    pub(crate) bindings: Bindings,
    pub(crate) cache: Cache,
    pub(crate) building: BuildStack,
}

use alloc::{collections::BTreeMap, string::String, sync::Arc, vec::Vec};
use core::any::type_name;

use crate::{
    any::{instance, Instance},
    callable::Callable,
    errors::InstantiateErrorKind,
};

/// Deferred computation evaluated through the injector at the point of use.
/// Its callable's parameters are resolved like any other signature.
#[derive(Clone, Debug)]
pub struct Lazy(pub(crate) Callable);

impl Lazy {
    #[inline]
    #[must_use]
    pub const fn new(callable: Callable) -> Self {
        Self(callable)
    }

    #[inline]
    #[must_use]
    pub fn callable(&self) -> &Callable {
        &self.0
    }
}

#[derive(Clone, Debug)]
pub enum Argument {
    Value(Instance),
    Lazy(Lazy),
}

impl Argument {
    #[inline]
    #[must_use]
    pub fn value<T: Send + Sync + 'static>(val: T) -> Self {
        Self::Value(instance(val))
    }
}

impl From<Lazy> for Argument {
    #[inline]
    fn from(lazy: Lazy) -> Self {
        Self::Lazy(lazy)
    }
}

impl From<Instance> for Argument {
    #[inline]
    fn from(instance: Instance) -> Self {
        Self::Value(instance)
    }
}

/// Caller-supplied arguments keyed by parameter name.
/// An entry always wins over type-based resolution and default values.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    map: BTreeMap<String, Argument>,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(mut self, name: impl Into<String>, val: T) -> Self {
        self.insert(name, Argument::value(val));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_instance(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.insert(name, Argument::Value(instance));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_lazy(mut self, name: impl Into<String>, lazy: Lazy) -> Self {
        self.insert(name, Argument::Lazy(lazy));
        self
    }

    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, argument: Argument) -> Option<Argument> {
        self.map.insert(name.into(), argument)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.map.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns these arguments with `overrides` applied on top
    #[must_use]
    pub fn merged_with(&self, overrides: &Arguments) -> Arguments {
        let mut map = self.map.clone();
        for (name, argument) in &overrides.map {
            map.insert(name.clone(), argument.clone());
        }
        Arguments { map }
    }
}

impl<N: Into<String>> FromIterator<(N, Argument)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (N, Argument)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|(name, argument)| (name.into(), argument)).collect(),
        }
    }
}

/// Values of a signature's parameters in declared order, ready to be passed to user code
#[derive(Clone, Debug, Default)]
pub struct ResolvedArgs {
    values: Vec<(String, Instance)>,
}

impl ResolvedArgs {
    #[inline]
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, name: String, value: Instance) {
        self.values.push((name, value));
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::NoArgument`] if the signature has no such parameter
    pub fn instance(&self, name: &str) -> Result<&Instance, InstantiateErrorKind> {
        self.values
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
            .ok_or_else(|| InstantiateErrorKind::NoArgument { name: name.into() })
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::NoArgument`] if the signature has no such parameter
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the value isn't a `T`
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, InstantiateErrorKind> {
        self.instance(name)?
            .clone()
            .downcast()
            .map_err(|_| InstantiateErrorKind::IncorrectType {
                name: name.into(),
                expected: type_name::<T>(),
            })
    }

    /// # Errors
    /// Same as [`Self::get`]
    pub fn cloned<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Result<T, InstantiateErrorKind> {
        self.get::<T>(name).map(|value| (*value).clone())
    }

    /// Gets a value by its position in the signature
    ///
    /// # Errors
    /// Same as [`Self::get`]
    pub fn at<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, InstantiateErrorKind> {
        let Some((name, value)) = self.values.get(index) else {
            return Err(InstantiateErrorKind::NoArgument {
                name: alloc::format!("#{index}"),
            });
        };
        value.clone().downcast().map_err(|_| InstantiateErrorKind::IncorrectType {
            name: name.clone(),
            expected: type_name::<T>(),
        })
    }
}

/// Creates [`Arguments`] from `name => value` pairs.
///
/// # Examples
/// ```rust
/// use bindery::arguments;
///
/// let arguments = arguments! { "size" => 5u32, "color" => "red" };
/// assert_eq!(arguments.len(), 2);
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::Arguments::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut arguments = $crate::Arguments::new();
        $(
            arguments.insert($name, $crate::Argument::value($value));
        )+
        arguments
    }};
}

use alloc::{string::String, vec::Vec};

use crate::{
    arguments::{Argument, Arguments, Lazy},
    errors::InvalidConfigErrorKind,
};

#[derive(Clone, Debug)]
pub enum DefinitionEntry {
    Call { method: String, arguments: Arguments },
    Assign { property: String, value: Argument },
}

/// Value of an entry in the key-convention form accepted by [`Definition::from_entries`]
#[derive(Clone, Debug)]
pub enum DefinitionValue {
    Target(String),
    Arguments(Arguments),
    Value(Argument),
}

/// Declarative recipe: target type, constructor arguments, then method calls
/// and property assignments applied in declaration order to the new instance
#[derive(Clone, Debug, Default)]
pub struct Definition {
    target: Option<String>,
    constructor_arguments: Arguments,
    entries: Vec<DefinitionEntry>,
}

impl Definition {
    pub const TARGET_KEY: &'static str = "class";
    pub const CONSTRUCTOR_KEY: &'static str = "__construct()";
    pub const METHOD_SUFFIX: &'static str = "()";

    #[inline]
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn arg<T: Send + Sync + 'static>(mut self, name: impl Into<String>, val: T) -> Self {
        self.constructor_arguments.insert(name, Argument::value(val));
        self
    }

    #[inline]
    #[must_use]
    pub fn lazy_arg(mut self, name: impl Into<String>, lazy: Lazy) -> Self {
        self.constructor_arguments.insert(name, Argument::Lazy(lazy));
        self
    }

    /// Replaces constructor arguments
    #[inline]
    #[must_use]
    pub fn arguments(mut self, arguments: Arguments) -> Self {
        self.constructor_arguments = arguments;
        self
    }

    #[inline]
    #[must_use]
    pub fn call(mut self, method: impl Into<String>, arguments: Arguments) -> Self {
        self.entries.push(DefinitionEntry::Call {
            method: method.into(),
            arguments,
        });
        self
    }

    #[inline]
    #[must_use]
    pub fn set<T: Send + Sync + 'static>(mut self, property: impl Into<String>, val: T) -> Self {
        self.entries.push(DefinitionEntry::Assign {
            property: property.into(),
            value: Argument::value(val),
        });
        self
    }

    #[inline]
    #[must_use]
    pub fn set_lazy(mut self, property: impl Into<String>, lazy: Lazy) -> Self {
        self.entries.push(DefinitionEntry::Assign {
            property: property.into(),
            value: Argument::Lazy(lazy),
        });
        self
    }

    /// Parses the key-convention form:
    /// - `class` names the target,
    /// - `__construct()` holds constructor arguments,
    /// - any other key ending with `()` is a method call,
    /// - the remaining keys are property assignments.
    ///
    /// A missing `class` entry isn't an error here, building such definition is.
    ///
    /// # Errors
    /// Returns [`InvalidConfigErrorKind::MalformedEntry`] if the value doesn't fit its key
    pub fn from_entries<I, K>(entries: I) -> Result<Self, InvalidConfigErrorKind>
    where
        I: IntoIterator<Item = (K, DefinitionValue)>,
        K: Into<String>,
    {
        let mut definition = Self::default();
        for (key, value) in entries {
            let key = key.into();
            match value {
                DefinitionValue::Target(target) if key == Self::TARGET_KEY => definition.target = Some(target),
                DefinitionValue::Arguments(arguments) if key == Self::CONSTRUCTOR_KEY => definition.constructor_arguments = arguments,
                DefinitionValue::Arguments(arguments) if key.ends_with(Self::METHOD_SUFFIX) => {
                    let method = String::from(&key[..key.len() - Self::METHOD_SUFFIX.len()]);
                    definition.entries.push(DefinitionEntry::Call { method, arguments });
                }
                DefinitionValue::Value(value) if key != Self::TARGET_KEY && !key.ends_with(Self::METHOD_SUFFIX) => {
                    definition.entries.push(DefinitionEntry::Assign { property: key, value });
                }
                _ => return Err(InvalidConfigErrorKind::MalformedEntry { key }),
            }
        }
        Ok(definition)
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn constructor_arguments(&self) -> &Arguments {
        &self.constructor_arguments
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[DefinitionEntry] {
        &self.entries
    }
}

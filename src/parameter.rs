use alloc::string::{String, ToString as _};
use core::any::type_name;

use crate::{
    any::{id_of, Instance},
    arguments::{Argument, Lazy},
    reflection::TypeDescriptor,
};

/// Declared type of a parameter as far as injection is concerned
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeHint {
    None,
    /// Built-in or scalar type. Never looked up in the container.
    Builtin(&'static str),
    Class(String),
    /// The type declaring the constructor or method
    SelfType,
    /// The immediate parent of the declaring type
    Parent,
}

#[derive(Clone, Debug)]
pub struct Parameter {
    name: String,
    hint: TypeHint,
    default: Option<Argument>,
}

impl Parameter {
    pub const PARENT: &'static str = "parent";

    #[inline]
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, TypeHint::None)
    }

    #[inline]
    #[must_use]
    pub fn builtin(name: impl Into<String>, ty: &'static str) -> Self {
        Self::new(name, TypeHint::Builtin(ty))
    }

    /// Parameter of a scalar Rust type, resolved only from arguments or default
    #[inline]
    #[must_use]
    pub fn scalar<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeHint::Builtin(type_name::<T>()))
    }

    /// Parameter injected by the identifier of a Rust type
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeHint::Class(id_of::<T>().to_string()))
    }

    #[inline]
    #[must_use]
    pub fn class(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(name, TypeHint::Class(id.into()))
    }

    #[inline]
    #[must_use]
    pub fn self_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeHint::SelfType)
    }

    #[inline]
    #[must_use]
    pub fn parent(name: impl Into<String>) -> Self {
        Self::new(name, TypeHint::Parent)
    }

    #[inline]
    #[must_use]
    pub fn with_default<T: Send + Sync + 'static>(mut self, val: T) -> Self {
        self.default = Some(Argument::value(val));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_default_instance(mut self, instance: Instance) -> Self {
        self.default = Some(Argument::Value(instance));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_lazy_default(mut self, lazy: Lazy) -> Self {
        self.default = Some(Argument::Lazy(lazy));
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn hint(&self) -> &TypeHint {
        &self.hint
    }

    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&Argument> {
        self.default.as_ref()
    }

    /// Identifier to ask the container for, `None` if the parameter takes no part in injection.
    /// `declaring` is `None` for bare callables.
    /// A parent hint on a type without parent asks for the literal [`Self::PARENT`] identifier.
    #[must_use]
    pub(crate) fn class_name(&self, declaring: Option<&TypeDescriptor>) -> Option<String> {
        match &self.hint {
            TypeHint::None | TypeHint::Builtin(_) => None,
            TypeHint::Class(id) => Some(id.clone()),
            TypeHint::SelfType => declaring.map(|descriptor| descriptor.name().to_string()),
            TypeHint::Parent => declaring.map(|descriptor| String::from(descriptor.parent().unwrap_or(Self::PARENT))),
        }
    }

    #[inline]
    #[must_use]
    fn new(name: impl Into<String>, hint: TypeHint) -> Self {
        Self {
            name: name.into(),
            hint,
            default: None,
        }
    }
}

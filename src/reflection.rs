//! Self-description of injectable types.
//!
//! Rust has no runtime reflection, so every type the container is expected to build on its own
//! describes its constructor, methods and properties through a [`TypeDescriptor`].
//! The container consults the descriptors through the [`ResolutionOracle`] trait,
//! [`Catalog`] being the default implementation.

use alloc::{
    boxed::Box,
    collections::BTreeMap,
    string::{String, ToString as _},
    sync::Arc,
    vec::Vec,
};
use core::{
    any::{type_name, Any, TypeId},
    fmt::{self, Debug, Formatter},
};

use crate::{
    any::{BoxedInstance, Instance, TypeInfo},
    arguments::ResolvedArgs,
    errors::InstantiateErrorKind,
    parameter::Parameter,
};

type ConstructorFn = dyn Fn(ResolvedArgs) -> Result<BoxedInstance, InstantiateErrorKind> + Send + Sync;
type MethodFn = dyn Fn(&mut (dyn Any + Send + Sync), ResolvedArgs) -> Result<Option<Instance>, InstantiateErrorKind> + Send + Sync;
type SetterFn = dyn Fn(&mut (dyn Any + Send + Sync), Instance) -> Result<(), InstantiateErrorKind> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    AbstractClass,
    Interface,
}

#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<Parameter>,
    body: Arc<ConstructorFn>,
}

impl Constructor {
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    pub(crate) fn call(&self, args: ResolvedArgs) -> Result<BoxedInstance, InstantiateErrorKind> {
        (self.body)(args)
    }
}

#[derive(Clone)]
pub struct Method {
    parameters: Vec<Parameter>,
    body: Arc<MethodFn>,
}

impl Method {
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    pub(crate) fn call(&self, receiver: &mut (dyn Any + Send + Sync), args: ResolvedArgs) -> Result<Option<Instance>, InstantiateErrorKind> {
        (self.body)(receiver, args)
    }
}

#[derive(Clone)]
pub struct Property {
    setter: Arc<SetterFn>,
}

impl Property {
    #[inline]
    pub(crate) fn assign(&self, receiver: &mut (dyn Any + Send + Sync), value: Instance) -> Result<(), InstantiateErrorKind> {
        (self.setter)(receiver, value)
    }
}

#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    type_id: Option<TypeId>,
    kind: TypeKind,
    parent: Option<String>,
    constructor: Option<Constructor>,
    public_constructor: bool,
    methods: BTreeMap<String, Method>,
    properties: BTreeMap<String, Property>,
}

impl TypeDescriptor {
    /// Describes a class without declared constructor, instantiated with [`Default`]
    #[must_use]
    pub fn of<T: Default + Send + Sync + 'static>() -> Self {
        Self::with_constructor(Vec::new(), |_| Ok::<_, InstantiateErrorKind>(T::default()))
    }

    #[must_use]
    pub fn with_constructor<T, F, E>(parameters: Vec<Parameter>, body: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(ResolvedArgs) -> Result<T, E> + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        let info = TypeInfo::of::<T>();
        Self {
            name: info.name.to_string(),
            type_id: Some(info.id),
            kind: TypeKind::Class,
            parent: None,
            constructor: Some(Constructor {
                parameters,
                body: Arc::new(move |args: ResolvedArgs| -> Result<BoxedInstance, InstantiateErrorKind> {
                    match body(args) {
                        Ok(value) => Ok(Box::new(value) as BoxedInstance),
                        Err(err) => Err(err.into()),
                    }
                }),
            }),
            public_constructor: true,
            methods: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::nominal(name.into(), TypeKind::AbstractClass)
    }

    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::nominal(name.into(), TypeKind::Interface)
    }

    /// Overrides the identifier the type is known by
    #[inline]
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Marks the constructor as not accessible to the container
    #[inline]
    #[must_use]
    pub fn private_constructor(mut self) -> Self {
        self.public_constructor = false;
        self
    }

    /// Adds a method without meaningful return value
    #[must_use]
    pub fn method<T, F, E>(self, name: impl Into<String>, parameters: Vec<Parameter>, body: F) -> Self
    where
        T: 'static,
        F: Fn(&mut T, ResolvedArgs) -> Result<(), E> + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        self.method_raw::<T, _>(name, parameters, move |this, args| match body(this, args) {
            Ok(()) => Ok(None),
            Err(err) => Err(err.into()),
        })
    }

    #[must_use]
    pub fn method_returning<T, R, F, E>(self, name: impl Into<String>, parameters: Vec<Parameter>, body: F) -> Self
    where
        T: 'static,
        R: Send + Sync + 'static,
        F: Fn(&mut T, ResolvedArgs) -> Result<R, E> + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        self.method_raw::<T, _>(name, parameters, move |this, args| match body(this, args) {
            Ok(value) => Ok(Some(Arc::new(value) as Instance)),
            Err(err) => Err(err.into()),
        })
    }

    /// Adds an assignable property holding a `V`
    #[must_use]
    pub fn property<T, V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        T: 'static,
        V: Clone + Send + Sync + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let name = name.into();
        let property = name.clone();
        self.properties.insert(
            name,
            Property {
                setter: Arc::new(move |receiver: &mut (dyn Any + Send + Sync), value: Instance| -> Result<(), InstantiateErrorKind> {
                    let this = receiver
                        .downcast_mut::<T>()
                        .ok_or(InstantiateErrorKind::IncorrectReceiver { expected: type_name::<T>() })?;
                    let value = value.downcast_ref::<V>().ok_or_else(|| InstantiateErrorKind::IncorrectType {
                        name: property.clone(),
                        expected: type_name::<V>(),
                    })?;
                    setter(this, value.clone());
                    Ok(())
                }),
            },
        );
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        self.kind == TypeKind::Class && self.public_constructor && self.constructor.is_some()
    }

    #[inline]
    #[must_use]
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn method_of(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    #[inline]
    #[must_use]
    pub fn property_of(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    fn method_raw<T, F>(mut self, name: impl Into<String>, parameters: Vec<Parameter>, body: F) -> Self
    where
        T: 'static,
        F: Fn(&mut T, ResolvedArgs) -> Result<Option<Instance>, InstantiateErrorKind> + Send + Sync + 'static,
    {
        self.methods.insert(
            name.into(),
            Method {
                parameters,
                body: Arc::new(move |receiver: &mut (dyn Any + Send + Sync), args: ResolvedArgs| -> Result<Option<Instance>, InstantiateErrorKind> {
                    let this = receiver
                        .downcast_mut::<T>()
                        .ok_or(InstantiateErrorKind::IncorrectReceiver { expected: type_name::<T>() })?;
                    body(this, args)
                }),
            },
        );
        self
    }

    fn nominal(name: String, kind: TypeKind) -> Self {
        Self {
            name,
            type_id: None,
            kind,
            parent: None,
            constructor: None,
            public_constructor: true,
            methods: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("instantiable", &self.is_instantiable())
            .field("methods", &self.methods.keys())
            .field("properties", &self.properties.keys())
            .finish_non_exhaustive()
    }
}

/// A type that describes its own injectable signature
pub trait Injectable: Send + Sync + Sized + 'static {
    fn descriptor() -> TypeDescriptor;
}

/// Answers the container's questions about types: whether they exist,
/// whether they can be instantiated and what their signatures look like
pub trait ResolutionOracle: Send + Sync {
    fn reflect(&self, id: &str) -> Option<&TypeDescriptor>;

    /// Descriptor of an already built object's concrete type
    fn reflect_type(&self, type_id: TypeId) -> Option<&TypeDescriptor>;

    /// Nominal existence check. Interfaces don't count as existing types.
    fn exists(&self, id: &str) -> bool {
        self.reflect(id).is_some_and(|descriptor| descriptor.kind() != TypeKind::Interface)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    descriptors: BTreeMap<String, TypeDescriptor>,
    by_type: BTreeMap<TypeId, String>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with<T: Injectable>(self) -> Self {
        self.with_descriptor(T::descriptor())
    }

    #[inline]
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Adds a descriptor, replacing the one with the same identifier
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        if let Some(type_id) = descriptor.type_id {
            self.by_type.insert(type_id, descriptor.name.clone());
        }
        self.descriptors.insert(descriptor.name.clone(), descriptor)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl ResolutionOracle for Catalog {
    #[inline]
    fn reflect(&self, id: &str) -> Option<&TypeDescriptor> {
        self.descriptors.get(id)
    }

    #[inline]
    fn reflect_type(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
        self.by_type.get(&type_id).and_then(|id| self.descriptors.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Injectable, ResolutionOracle as _, TypeDescriptor, TypeKind};
    use crate::{
        any::{id_of, instance},
        arguments::ResolvedArgs,
        errors::InstantiateErrorKind,
        parameter::Parameter,
    };

    use alloc::{boxed::Box, string::String, vec, vec::Vec};
    use core::any::{Any, TypeId};

    #[derive(Default)]
    struct Widget {
        size: u32,
        color: String,
    }

    impl Injectable for Widget {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::with_constructor(vec![Parameter::scalar::<u32>("size")], |args: ResolvedArgs| {
                Ok::<_, InstantiateErrorKind>(Widget {
                    size: *args.get::<u32>("size")?,
                    color: String::new(),
                })
            })
            .method("set_color", vec![Parameter::scalar::<String>("color")], |this: &mut Widget, args| {
                this.color = args.cloned("color")?;
                Ok::<_, InstantiateErrorKind>(())
            })
            .property("size", |this: &mut Widget, size: u32| this.size = size)
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new()
            .with::<Widget>()
            .with_descriptor(TypeDescriptor::interface("Shape"))
            .with_descriptor(TypeDescriptor::abstract_class("AbstractShape"));

        assert_eq!(catalog.len(), 3);
        assert!(catalog.exists(id_of::<Widget>()));
        assert!(catalog.exists("AbstractShape"));
        assert!(!catalog.exists("Shape"));
        assert!(!catalog.exists("Missing"));
        assert_eq!(
            catalog.reflect_type(TypeId::of::<Widget>()).map(TypeDescriptor::name),
            Some(id_of::<Widget>())
        );
        assert_eq!(catalog.reflect("Shape").map(TypeDescriptor::kind), Some(TypeKind::Interface));
    }

    #[test]
    fn test_instantiable() {
        assert!(Widget::descriptor().is_instantiable());
        assert!(!Widget::descriptor().private_constructor().is_instantiable());
        assert!(!TypeDescriptor::abstract_class("AbstractShape").is_instantiable());
        assert!(!TypeDescriptor::interface("Shape").is_instantiable());
    }

    #[test]
    fn test_method_and_property() {
        let descriptor = Widget::descriptor();
        let mut widget: Box<dyn Any + Send + Sync> = Box::new(Widget::default());

        let mut args = ResolvedArgs::with_capacity(1);
        args.push(String::from("color"), instance(String::from("red")));
        let returned = descriptor.method_of("set_color").unwrap().call(&mut *widget, args).unwrap();
        assert!(returned.is_none());

        descriptor.property_of("size").unwrap().assign(&mut *widget, instance(9u32)).unwrap();
        let err = descriptor.property_of("size").unwrap().assign(&mut *widget, instance("nine"));
        assert!(matches!(err, Err(InstantiateErrorKind::IncorrectType { .. })));

        let widget = widget.downcast::<Widget>().unwrap();
        assert_eq!(widget.color, "red");
        assert_eq!(widget.size, 9);

        let mut other: Box<dyn Any + Send + Sync> = Box::new(0u8);
        let err = descriptor.method_of("set_color").unwrap().call(&mut *other, ResolvedArgs::with_capacity(0));
        assert!(matches!(err, Err(InstantiateErrorKind::IncorrectReceiver { .. })));

        let _: Vec<Parameter> = descriptor.constructor().unwrap().parameters().to_vec();
    }
}

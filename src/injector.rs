use alloc::{
    format,
    string::{String, ToString as _},
    sync::Arc,
};
use core::any::Any;
use tracing::{debug, error};

use crate::{
    any::Instance,
    arguments::{Argument, Arguments, ResolvedArgs},
    callable::Callable,
    definition::{Definition, DefinitionEntry},
    errors::{InstantiateErrorKind, InvalidConfigErrorKind, ResolveErrorKind},
    parameter::Parameter,
    reflection::TypeDescriptor,
    Container,
};

/// What the injector is asked to build
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    Type(&'a str),
    Definition(&'a Definition),
}

/// Builds objects and calls methods, supplying every parameter from caller arguments,
/// the container or the parameter's default value
#[derive(Clone)]
pub struct Injector {
    container: Container,
}

impl Injector {
    /// Method name used to call an object as a function
    pub const CALL: &'static str = "__invoke";

    #[inline]
    #[must_use]
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Builds an instance of a type or of a definition.
    /// Caller arguments take precedence over a definition's constructor arguments.
    ///
    /// # Errors
    /// - Returns [`InvalidConfigErrorKind::NoTarget`] if the definition has no target
    /// - Returns [`InvalidConfigErrorKind::TargetNotFound`] if the target isn't described
    /// - Returns [`InvalidConfigErrorKind::NotInstantiable`] if the target can't be constructed
    /// - Propagates failures of parameters resolution, method calls and property assignments
    pub fn build(&self, target: Target<'_>, arguments: &Arguments) -> Result<Instance, ResolveErrorKind> {
        let (class, constructor_arguments, entries) = match target {
            Target::Type(class) => (class, None, &[][..]),
            Target::Definition(definition) => {
                let Some(class) = definition.target() else {
                    let err = InvalidConfigErrorKind::NoTarget;
                    error!("{}", err);
                    return Err(err.into());
                };
                (
                    class,
                    Some(definition.constructor_arguments().merged_with(arguments)),
                    definition.entries(),
                )
            }
        };

        let Some(descriptor) = self.container.oracle().reflect(class) else {
            let err = InvalidConfigErrorKind::TargetNotFound { target: class.into() };
            debug!("{}", err);
            return Err(err.into());
        };
        let Some(constructor) = descriptor.constructor().filter(|_| descriptor.is_instantiable()) else {
            let err = InvalidConfigErrorKind::NotInstantiable { target: class.into() };
            debug!("{}", err);
            return Err(err.into());
        };

        let args = self.resolve_dependencies(
            constructor.parameters(),
            Some(descriptor),
            constructor_arguments.as_ref().unwrap_or(arguments),
        )?;
        let mut object = constructor.call(args).map_err(|err| err.into_resolve(class))?;
        debug!(class, "Constructed");

        for entry in entries {
            match entry {
                DefinitionEntry::Call { method, arguments } => {
                    self.call_method(&mut *object, descriptor, method, arguments)?;
                }
                DefinitionEntry::Assign { property, value } => {
                    self.assign(&mut *object, descriptor, property, value)?;
                }
            }
        }

        Ok(Arc::from(object))
    }

    /// Calls a described method of an object
    ///
    /// # Errors
    /// - Returns [`InvalidConfigErrorKind::Reflection`] if the object's type isn't described
    /// - Returns [`InvalidConfigErrorKind::NoMethod`] if the type has no such method
    /// - Propagates failures of parameters resolution and of the method itself
    pub fn invoke(
        &self,
        object: &mut (dyn Any + Send + Sync),
        method: &str,
        arguments: &Arguments,
    ) -> Result<Option<Instance>, ResolveErrorKind> {
        let erased: &dyn Any = &*object;
        let type_id = erased.type_id();

        let Some(descriptor) = self.container.oracle().reflect_type(type_id) else {
            let err = InvalidConfigErrorKind::Reflection {
                target: format!("{type_id:?}"),
            };
            error!("{}", err);
            return Err(err.into());
        };

        self.call_method(object, descriptor, method, arguments)
    }

    /// Calls a bare callable, resolving its own parameters
    ///
    /// # Errors
    /// Propagates failures of parameters resolution and of the callable itself
    #[inline]
    pub fn invoke_callable(&self, callable: &Callable, arguments: &Arguments) -> Result<Instance, ResolveErrorKind> {
        self.invoke_factory("closure", callable, arguments)
    }

    pub(crate) fn invoke_factory(&self, id: &str, callable: &Callable, arguments: &Arguments) -> Result<Instance, ResolveErrorKind> {
        let args = self.resolve_dependencies(callable.parameters(), None, arguments)?;
        callable.call(args).map_err(|err| err.into_resolve(id))
    }

    fn call_method(
        &self,
        object: &mut (dyn Any + Send + Sync),
        descriptor: &TypeDescriptor,
        method: &str,
        arguments: &Arguments,
    ) -> Result<Option<Instance>, ResolveErrorKind> {
        let Some(target_method) = descriptor.method_of(method) else {
            let err = InvalidConfigErrorKind::NoMethod {
                method: method.into(),
                target: descriptor.name().into(),
            };
            error!("{}", err);
            return Err(err.into());
        };

        let args = self.resolve_dependencies(target_method.parameters(), Some(descriptor), arguments)?;
        let returned = target_method
            .call(object, args)
            .map_err(|err| err.into_resolve(&format!("{}::{method}", descriptor.name())))?;
        debug!(method, "Method called");
        Ok(returned)
    }

    fn assign(
        &self,
        object: &mut (dyn Any + Send + Sync),
        descriptor: &TypeDescriptor,
        property: &str,
        value: &Argument,
    ) -> Result<(), ResolveErrorKind> {
        let Some(target_property) = descriptor.property_of(property) else {
            let err = InvalidConfigErrorKind::NoProperty {
                property: property.into(),
                target: descriptor.name().into(),
            };
            error!("{}", err);
            return Err(err.into());
        };

        self.evaluate(value.clone())
            .map_err(InstantiateErrorKind::from)
            .and_then(|value| target_property.assign(object, value))
            .map_err(|source| {
                let err = InvalidConfigErrorKind::PropertyAssignment {
                    property: property.into(),
                    target: descriptor.name().into(),
                    source,
                };
                error!("{}", err);
                err.into()
            })
    }

    fn resolve_dependencies(
        &self,
        parameters: &[Parameter],
        declaring: Option<&TypeDescriptor>,
        arguments: &Arguments,
    ) -> Result<ResolvedArgs, ResolveErrorKind> {
        let mut resolved = ResolvedArgs::with_capacity(parameters.len());
        for parameter in parameters {
            let value = self.resolve_dependency(parameter, declaring, arguments)?;
            resolved.push(parameter.name().to_string(), value);
        }
        Ok(resolved)
    }

    fn resolve_dependency(
        &self,
        parameter: &Parameter,
        declaring: Option<&TypeDescriptor>,
        arguments: &Arguments,
    ) -> Result<Instance, ResolveErrorKind> {
        let argument = if let Some(argument) = arguments.get(parameter.name()) {
            argument.clone()
        } else if let Some(class) = parameter.class_name(declaring) {
            match self.container.get(&class) {
                Ok(instance) => Argument::Value(instance),
                Err(err) if err.is_not_found() => match parameter.default_value() {
                    Some(default) => {
                        debug!(parameter = parameter.name(), class = class.as_str(), "Not found in container, default value used");
                        default.clone()
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            }
        } else if let Some(default) = parameter.default_value() {
            default.clone()
        } else {
            let err = InvalidConfigErrorKind::UnresolvableParameter {
                parameter: parameter.name().into(),
                declaring: declaring.map_or_else(|| String::from("closure"), |descriptor| format!("class {}", descriptor.name())),
            };
            error!("{}", err);
            return Err(err.into());
        };

        self.evaluate(argument)
    }

    fn evaluate(&self, argument: Argument) -> Result<Instance, ResolveErrorKind> {
        match argument {
            Argument::Value(instance) => Ok(instance),
            Argument::Lazy(lazy) => {
                debug!("Evaluating lazy value");
                self.invoke_callable(lazy.callable(), &Arguments::new())
            }
        }
    }
}

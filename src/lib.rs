#![no_std]

extern crate alloc;

pub(crate) mod any;
#[macro_use]
pub(crate) mod arguments;
pub(crate) mod building;
pub(crate) mod cache;
pub(crate) mod callable;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod definition;
pub(crate) mod injector;
pub(crate) mod parameter;
pub(crate) mod provider;
pub(crate) mod registry;

pub mod errors;
pub mod reflection;

pub use any::{id_of, instance, BoxedInstance, Instance, TypeInfo};
pub use arguments::{Argument, Arguments, Lazy, ResolvedArgs};
pub use callable::Callable;
pub use config::Config;
pub use container::Container;
pub use definition::{Definition, DefinitionEntry, DefinitionValue};
pub use errors::{InstantiateErrorKind, InvalidConfigErrorKind, ResolveErrorKind};
pub use injector::{Injector, Target};
pub use parameter::{Parameter, TypeHint};
pub use provider::{DeferredServiceProvider, Provider, ProviderSource, ServiceProvider};
pub use reflection::{Catalog, Constructor, Injectable, Method, Property, ResolutionOracle, TypeDescriptor, TypeKind};
pub use registry::Concrete;

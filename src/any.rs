use alloc::{boxed::Box, sync::Arc};
use core::any::{type_name, Any, TypeId};

/// Shared, fully built object as stored in the instance cache
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Object under construction, before method calls and property assignments are applied
pub type BoxedInstance = Box<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// Identifier under which a Rust type is bound, resolved and described
#[inline]
#[must_use]
pub fn id_of<T: ?Sized + 'static>() -> &'static str {
    type_name::<T>()
}

/// Wraps a value created outside the container
#[inline]
#[must_use]
pub fn instance<T: Send + Sync + 'static>(val: T) -> Instance {
    Arc::new(val)
}

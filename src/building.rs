use alloc::{string::String, vec::Vec};
use tracing::error;

use crate::{errors::ResolveErrorKind, Container};

/// Identifiers under construction on the current call stack, in entry order
#[derive(Default)]
pub(crate) struct BuildStack {
    ids: Vec<String>,
}

impl BuildStack {
    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|building| building == id)
    }

    #[inline]
    pub(crate) fn push(&mut self, id: String) {
        self.ids.push(id);
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().rposition(|building| building == id) {
            self.ids.remove(pos);
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// Holds `id` in the container's build stack until dropped, whatever way the build ends
pub(crate) struct BuildGuard<'a> {
    container: &'a Container,
    id: String,
}

impl<'a> BuildGuard<'a> {
    /// # Errors
    /// Returns [`ResolveErrorKind::CircularReference`] if `id` is already being built
    pub(crate) fn enter(container: &'a Container, id: &str) -> Result<Self, ResolveErrorKind> {
        container.with_state(|state| {
            if state.building.contains(id) {
                return Err(ResolveErrorKind::CircularReference {
                    id: id.into(),
                    stack: state.building.ids().to_vec(),
                });
            }
            state.building.push(id.into());
            Ok(())
        })
        .map_err(|err| {
            error!("{}", err);
            err
        })?;

        Ok(Self {
            container,
            id: id.into(),
        })
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.container.release_building(&self.id);
    }
}

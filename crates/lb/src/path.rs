use crate::{Backend, PathRegistry, SelectError};

/// Path-exact-match policy. Stateless; reads an immutable map.
pub struct PathMatch<B> {
    registry: PathRegistry<B>,
}

impl<B: Backend> PathMatch<B> {
    pub fn new(registry: PathRegistry<B>) -> Self {
        Self { registry }
    }

    pub fn select(&self, path: &str) -> Result<&B, SelectError> {
        self.registry
            .lookup(path)
            .ok_or_else(|| SelectError::RouteNotFound(path.to_string()))
    }

    pub fn registry(&self) -> &PathRegistry<B> {
        &self.registry
    }
}

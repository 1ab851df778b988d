use std::collections::HashMap;

#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    Empty,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Empty => write!(f, "rotation registry needs at least one backend"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Backends keyed by the exact request path they serve.
pub struct PathRegistry<B> {
    routes: HashMap<String, B>,
}

impl<B> PathRegistry<B> {
    pub fn new<I>(routes: I) -> Self
    where
        I: IntoIterator<Item = (String, B)>,
    {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    /// Exact match only; `/trip/1` does not hit a `/trip` entry.
    pub fn lookup(&self, path: &str) -> Option<&B> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

/// Ordered backends; position defines the rotation sequence.
pub struct RotationRegistry<B> {
    backends: Vec<B>,
}

impl<B> RotationRegistry<B> {
    pub fn new(backends: Vec<B>) -> Result<Self, RegistryError> {
        if backends.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { backends })
    }

    pub fn all(&self) -> &[B] {
        &self.backends
    }

    /// Never zero.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn get(&self, index: usize) -> Option<&B> {
        self.backends.get(index)
    }
}

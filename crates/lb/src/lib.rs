//! Backend selection for switchyard.
//!
//! A deployment runs exactly one policy: exact path lookup or round-robin over an ordered
//! list that skips dead backends.

pub mod backend;
pub mod path;
pub mod registry;
pub mod round_robin;

pub use backend::{AlwaysAlive, Backend, Liveness, ProxyBody};
pub use path::PathMatch;
pub use registry::{PathRegistry, RegistryError, RotationRegistry};
pub use round_robin::RoundRobin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    RouteNotFound(String),
    AllBackendsUnavailable,
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::RouteNotFound(path) => write!(f, "no route for path {path}"),
            SelectError::AllBackendsUnavailable => write!(f, "all backends are unavailable"),
        }
    }
}

impl std::error::Error for SelectError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Path,
    RoundRobin,
}

impl Strategy {
    pub fn from_config(value: &str) -> Result<Self, String> {
        let mode = value.trim().to_lowercase();
        match mode.as_str() {
            "path" | "path-exact" | "path_exact" => Ok(Self::Path),
            "round-robin" | "round_robin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(format!("unsupported load balancing type: {value}")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Path => "path",
            Strategy::RoundRobin => "round-robin",
        }
    }
}

pub enum LoadBalancing<B> {
    Path(PathMatch<B>),
    RoundRobin(RoundRobin<B>),
}

impl<B: Backend> LoadBalancing<B> {
    pub fn path(registry: PathRegistry<B>) -> Self {
        Self::Path(PathMatch::new(registry))
    }

    pub fn round_robin(registry: RotationRegistry<B>) -> Self {
        Self::RoundRobin(RoundRobin::new(registry))
    }

    /// `path` is only consulted by the path policy.
    pub fn select(&self, path: &str) -> Result<&B, SelectError> {
        match self {
            LoadBalancing::Path(selector) => selector.select(path),
            LoadBalancing::RoundRobin(selector) => selector.select(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            LoadBalancing::Path(_) => Strategy::Path,
            LoadBalancing::RoundRobin(_) => Strategy::RoundRobin,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LoadBalancing::Path(selector) => selector.registry().len(),
            LoadBalancing::RoundRobin(selector) => selector.registry().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        convert::Infallible,
        future::Future,
        sync::atomic::{AtomicBool, Ordering},
    };

    use bytes::Bytes;
    use http::{Request, Response, Uri};
    use http_body_util::{BodyExt, Full};

    use crate::{Backend, Liveness, ProxyBody};

    pub struct StubBackend {
        address: Uri,
        alive: AtomicBool,
    }

    impl StubBackend {
        pub fn alive(address: &str) -> Self {
            Self {
                address: address.parse().unwrap(),
                alive: AtomicBool::new(true),
            }
        }

        pub fn dead(address: &str) -> Self {
            let backend = Self::alive(address);
            backend.set_alive(false);
            backend
        }

        pub fn set_alive(&self, alive: bool) {
            self.alive.store(alive, Ordering::Release);
        }
    }

    impl Backend for StubBackend {
        type Body = ();
        type Error = Infallible;

        fn address(&self) -> &Uri {
            &self.address
        }

        fn is_alive(&self) -> bool {
            Liveness::is_alive(&self.alive)
        }

        fn forward(
            &self,
            _req: Request<()>,
        ) -> impl Future<Output = Result<Response<ProxyBody>, Infallible>> + Send {
            let body = Bytes::from(self.address.to_string());
            async move {
                Ok(Response::new(
                    Full::new(body).map_err(|never| match never {}).boxed_unsync(),
                ))
            }
        }
    }
}

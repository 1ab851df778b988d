use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use bytes::Bytes;
use http::{Request, Response, Uri};
use http_body_util::combinators::UnsyncBoxBody;

/// Body type of every response the balancer hands back to a client.
pub type ProxyBody = UnsyncBoxBody<Bytes, hyper::Error>;

/// One upstream service the balancer can forward to.
///
/// Selectors only ever look at `address` and `is_alive`; `forward` is invoked by the
/// balancer once a target has been chosen.
pub trait Backend: Send + Sync + 'static {
    /// Request body accepted by `forward`.
    type Body: Send + 'static;
    /// Transport failure reported by `forward`.
    type Error: std::error::Error + Send + Sync + 'static;

    fn address(&self) -> &Uri;

    /// Must be a pure query; rotation scans call it from many tasks at once.
    fn is_alive(&self) -> bool;

    fn forward(
        &self,
        req: Request<Self::Body>,
    ) -> impl Future<Output = Result<Response<ProxyBody>, Self::Error>> + Send;
}

/// Liveness signal attached to a backend.
///
/// Only `AlwaysAlive` is wired up today; a periodic probe or passive failure tracker can
/// implement this without touching the selectors.
pub trait Liveness: Send + Sync {
    fn is_alive(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAlive;

impl Liveness for AlwaysAlive {
    fn is_alive(&self) -> bool {
        true
    }
}

impl Liveness for AtomicBool {
    fn is_alive(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<L: Liveness + ?Sized> Liveness for Arc<L> {
    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_is_always_alive() {
        let liveness = AlwaysAlive;
        assert!((0..3).all(|_| liveness.is_alive()));
    }

    #[test]
    fn shared_flag_reflects_updates() {
        let flag = Arc::new(AtomicBool::new(true));
        let liveness: Box<dyn Liveness> = Box::new(flag.clone());
        assert!(liveness.is_alive());

        flag.store(false, Ordering::Release);
        assert!(!liveness.is_alive());
    }
}

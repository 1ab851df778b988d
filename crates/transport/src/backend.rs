use std::future::Future;

use http_body_util::BodyExt;
use hyper::{Request, Response, Uri, body::Incoming};
use log::debug;

use switchyard_bridge::{BridgeError, prepare_request, strip_hop_headers};
use switchyard_lb::{AlwaysAlive, Backend, Liveness, ProxyBody};

use crate::client::HttpClient;

#[derive(Debug)]
pub enum ForwardError {
    Bridge(BridgeError),
    Send(hyper_util::client::legacy::Error),
}

impl std::fmt::Display for ForwardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForwardError::Bridge(err) => write!(f, "bridge error: {err}"),
            ForwardError::Send(err) => write!(f, "send failed: {err}"),
        }
    }
}

impl std::error::Error for ForwardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForwardError::Bridge(err) => Some(err),
            ForwardError::Send(err) => Some(err),
        }
    }
}

/// Reverse proxy to a single upstream base URI.
pub struct HttpBackend<B = Incoming> {
    address: Uri,
    client: HttpClient<B>,
    liveness: Box<dyn Liveness>,
}

impl<B> HttpBackend<B> {
    pub fn new(address: Uri, client: HttpClient<B>) -> Self {
        Self {
            address,
            client,
            liveness: Box::new(AlwaysAlive),
        }
    }

    pub fn with_liveness<L: Liveness + 'static>(mut self, liveness: L) -> Self {
        self.liveness = Box::new(liveness);
        self
    }
}

impl<B> Backend for HttpBackend<B>
where
    B: hyper::body::Body + Send + Unpin + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Body = B;
    type Error = ForwardError;

    fn address(&self) -> &Uri {
        &self.address
    }

    fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    fn forward(
        &self,
        req: Request<B>,
    ) -> impl Future<Output = Result<Response<ProxyBody>, ForwardError>> + Send {
        async move {
            let req = prepare_request(&self.address, req).map_err(ForwardError::Bridge)?;
            debug!("Sending {} {}", req.method(), req.uri());

            let mut response = self.client.send(req).await.map_err(ForwardError::Send)?;
            strip_hop_headers(response.headers_mut());
            Ok(response.map(|body| body.boxed_unsync()))
        }
    }
}

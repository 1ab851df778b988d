use bytes::Bytes;
use http::{
    HeaderValue, Request, Response, StatusCode,
    header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
};
use http_body_util::{BodyExt, Empty, Full};
use log::{debug, info, warn};
use percent_encoding::percent_decode_str;

use switchyard_lb::{Backend, LoadBalancing, ProxyBody, SelectError};

/// Front door: picks a backend for each request and forwards to it.
///
/// `handle` takes `&self` and may be called from any number of tasks at once.
pub struct Balancer<B> {
    load_balancing: LoadBalancing<B>,
}

impl<B: Backend> Balancer<B> {
    pub fn new(load_balancing: LoadBalancing<B>) -> Self {
        Self { load_balancing }
    }

    /// Resolves to a forwarded response, a 404 or a 503. A failed forward is returned
    /// as the backend's error untouched.
    pub async fn handle(&self, req: Request<B::Body>) -> Result<Response<ProxyBody>, B::Error> {
        // Routes are keyed by the decoded path, so `/tr%69p` reaches `/trip`.
        let path = match percent_decode_str(req.uri().path()).decode_utf8() {
            Ok(path) => path.into_owned(),
            Err(_) => {
                let err = SelectError::RouteNotFound(req.uri().path().to_string());
                debug!("{err} (path is not valid UTF-8 once decoded)");
                return Ok(select_error_response(&err));
            }
        };

        let backend = match self.load_balancing.select(&path) {
            Ok(backend) => backend,
            Err(err) => {
                match &err {
                    SelectError::RouteNotFound(_) => debug!("{err}"),
                    SelectError::AllBackendsUnavailable => warn!("{err}"),
                }
                return Ok(select_error_response(&err));
            }
        };

        info!(
            "forwarding request to address \"{}\"",
            backend.address()
        );
        backend.forward(req).await
    }

    pub fn load_balancing(&self) -> &LoadBalancing<B> {
        &self.load_balancing
    }
}

fn text_response(status: StatusCode, body: &'static str) -> Response<ProxyBody> {
    let mut response = Response::new(
        Full::new(Bytes::from_static(body.as_bytes()))
            .map_err(|never| match never {})
            .boxed_unsync(),
    );
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

pub fn select_error_response(err: &SelectError) -> Response<ProxyBody> {
    match err {
        SelectError::RouteNotFound(_) => text_response(StatusCode::NOT_FOUND, "Not Found\n"),
        SelectError::AllBackendsUnavailable => {
            text_response(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable\n")
        }
    }
}

/// Response for a forward that failed at the transport level.
pub fn bad_gateway() -> Response<ProxyBody> {
    let mut response = Response::new(Empty::new().map_err(|never| match never {}).boxed_unsync());
    *response.status_mut() = StatusCode::BAD_GATEWAY;
    response
}

use std::net::SocketAddr;

use http::{
    HeaderMap, HeaderName, HeaderValue, Request, Uri,
    header::{CONNECTION, TE},
    uri::PathAndQuery,
};

/// Peer address of the inbound connection, stored in request extensions by the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub SocketAddr);

#[derive(Debug)]
pub enum BridgeError {
    InvalidUri,
    InvalidHeader,
    Build(http::Error),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::InvalidUri => write!(f, "invalid uri"),
            BridgeError::InvalidHeader => write!(f, "invalid header"),
            BridgeError::Build(e) => write!(f, "request build error: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {}

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

fn is_hop_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Removes hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_headers(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in listed {
        headers.remove(name);
    }

    let remaining: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_header(name))
        .cloned()
        .collect();
    for name in remaining {
        headers.remove(name);
    }
}

/// True when any `TE` value lists the `trailers` token.
fn accepts_trailers(headers: &HeaderMap) -> bool {
    headers
        .get_all(TE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("trailers"))
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

/// Maps an inbound request URI onto a backend base URI.
///
/// Scheme and authority come from `base`; paths are joined with a single slash and
/// queries with `&`.
pub fn upstream_uri(base: &Uri, incoming: &Uri) -> Result<Uri, BridgeError> {
    let scheme = base.scheme().ok_or(BridgeError::InvalidUri)?.clone();
    let authority = base.authority().ok_or(BridgeError::InvalidUri)?.clone();

    let mut path_and_query = join_paths(base.path(), incoming.path());
    match (base.query(), incoming.query()) {
        (Some(b), Some(i)) if !b.is_empty() && !i.is_empty() => {
            path_and_query.push('?');
            path_and_query.push_str(b);
            path_and_query.push('&');
            path_and_query.push_str(i);
        }
        (Some(q), _) | (_, Some(q)) if !q.is_empty() => {
            path_and_query.push('?');
            path_and_query.push_str(q);
        }
        _ => {}
    }

    let path_and_query =
        PathAndQuery::try_from(path_and_query).map_err(|_| BridgeError::InvalidUri)?;
    Uri::builder()
        .scheme(scheme)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .map_err(BridgeError::Build)
}

/// Rewrites `req` so it can be sent to `base`. The inbound `Host` header is kept.
pub fn prepare_request<B>(base: &Uri, req: Request<B>) -> Result<Request<B>, BridgeError> {
    let (mut parts, body) = req.into_parts();

    parts.uri = upstream_uri(base, &parts.uri)?;
    let trailers = accepts_trailers(&parts.headers);
    strip_hop_headers(&mut parts.headers);
    // `TE: trailers` is the one `TE` value forwarded upstream.
    if trailers {
        parts.headers.insert(TE, HeaderValue::from_static("trailers"));
    }

    if let Some(ClientAddr(peer)) = parts.extensions.get::<ClientAddr>().copied() {
        let prior: Vec<&str> = parts
            .headers
            .get_all(&X_FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        let forwarded = if prior.is_empty() {
            peer.ip().to_string()
        } else {
            format!("{}, {}", prior.join(", "), peer.ip())
        };
        let value = HeaderValue::try_from(forwarded).map_err(|_| BridgeError::InvalidHeader)?;
        parts.headers.insert(X_FORWARDED_FOR, value);
    }

    Ok(Request::from_parts(parts, body))
}

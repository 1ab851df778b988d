//! Request plumbing between the listener and an upstream backend.

pub mod upstream;

pub use upstream::{BridgeError, ClientAddr, prepare_request, strip_hop_headers, upstream_uri};

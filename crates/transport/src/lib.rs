//! HTTP/1.1 upstream transport.

pub mod backend;
pub mod client;

pub use backend::{ForwardError, HttpBackend};
pub use client::HttpClient;

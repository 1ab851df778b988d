use std::sync::Arc;

use tokio::net::TcpListener;

use switchyard_transport::HttpBackend;

pub mod balancer;
pub mod builder;
pub mod listener;

pub use balancer::Balancer;
pub use builder::{BuildError, build_load_balancing};
pub use listener::{ServerError, serve};

pub struct Server {
    pub listener: TcpListener,
    pub balancer: Arc<Balancer<HttpBackend>>,
}
